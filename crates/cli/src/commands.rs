//! The offline sub-commands: checking and rendering an automation file.

use anyhow::Context;

use builder::{render_pipeline, AutomationDraft, PipelineItem};
use nodes::NodeProperties;

/// Parse an automation file.  Accepts both `workflow_nodes` and
/// `workflowNodes` for the node list.
pub fn parse_draft(content: &str) -> anyhow::Result<AutomationDraft> {
    serde_json::from_str(content).context("invalid automation JSON")
}

/// Run every save rule on `draft`.  On success, returns one warning per
/// webhook placeholder that names a field the trigger does not provide.
pub fn check(draft: &AutomationDraft) -> anyhow::Result<Vec<String>> {
    draft.validate()?;

    let schema = match draft.workflow_nodes.first().map(|n| &n.properties) {
        Some(NodeProperties::Trigger(p)) => p.event_schema.as_slice(),
        _ => &[],
    };

    let mut warnings = Vec::new();
    for node in &draft.workflow_nodes {
        if let Some(config) = node.properties.webhook_config() {
            for field in config.unknown_fields(schema) {
                warnings.push(format!(
                    "step '{}' references {{{{{field}}}}}, which the trigger does not provide",
                    node.name
                ));
            }
        }
    }
    Ok(warnings)
}

/// The pipeline as text: one line per card, `↓` between them.
pub fn render(draft: &AutomationDraft) -> String {
    let mut out = String::new();
    for item in render_pipeline(&draft.workflow_nodes, true) {
        match item {
            PipelineItem::Node(card) => {
                out.push_str(&format!("[{}] {}\n", card.badge, card.title));
                out.push_str(&format!("    {}\n", card.summary));
            }
            PipelineItem::Arrow => out.push_str("    ↓\n"),
        }
    }
    out
}
