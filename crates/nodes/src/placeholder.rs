//! `{{field}}` placeholder tokens.
//!
//! A webhook value may reference trigger event fields with tokens of the
//! exact form `{{field_name}}`.  Substitution happens at execution time,
//! which is outside this workspace; here we only produce and recognise
//! tokens.

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// The placeholder token for `field`, with no surrounding characters.
pub fn placeholder(field: &str) -> String {
    format!("{OPEN}{field}{CLOSE}")
}

/// Field names referenced by placeholder tokens in `value`, in order of
/// appearance.  Unterminated or empty tokens are ignored.
pub fn placeholders_in(value: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = value;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };

        let inner = &after_open[..end];
        // `{{{{x}}` style noise: restart the scan from the innermost opener.
        if let Some(nested) = inner.rfind('{') {
            rest = &after_open[nested + 1..];
            continue;
        }

        let name = inner.trim();
        if !name.is_empty() {
            found.push(name);
        }
        rest = &after_open[end + CLOSE.len()..];
    }

    found
}
