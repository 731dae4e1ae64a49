//! Webhook action configuration.

use serde::{Deserialize, Serialize};

use crate::placeholder::placeholders_in;
use crate::FieldSpec;

/// One query parameter, header, or body field.
///
/// Lists of pairs keep insertion order, which is also the order they are
/// sent in.  Keys are not required to be unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Parameters of a webhook action node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub webhook_url: String,
    #[serde(default)]
    pub query_params: Vec<KeyValuePair>,
    #[serde(default)]
    pub headers: Vec<KeyValuePair>,
    #[serde(default)]
    pub body: Vec<KeyValuePair>,
}

impl WebhookConfig {
    /// The config a freshly picked webhook action starts with: no URL and a
    /// JSON content-type header.
    pub fn default_for_new_action() -> Self {
        Self {
            headers: vec![KeyValuePair::new("Content-Type", "application/json")],
            ..Self::default()
        }
    }

    /// Every field name referenced by a `{{field}}` token, in the order URL,
    /// query params, headers, body.  Duplicates are kept.
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut refs = placeholders_in(&self.webhook_url);
        for pair in self.query_params.iter().chain(&self.headers).chain(&self.body) {
            refs.extend(placeholders_in(&pair.value));
        }
        refs
    }

    /// Referenced field names that the given event schema does not carry.
    pub fn unknown_fields<'a>(&'a self, schema: &[FieldSpec]) -> Vec<&'a str> {
        let mut unknown: Vec<&str> = Vec::new();
        for name in self.referenced_fields() {
            let known = schema.iter().any(|f| f.field == name);
            if !known && !unknown.contains(&name) {
                unknown.push(name);
            }
        }
        unknown
    }
}
