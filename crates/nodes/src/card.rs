//! Display summary of a single node in the builder pipeline.

use serde::Serialize;

use crate::{Icon, NodeProperties, NodeType, WorkflowNode};

/// Accent colour of a node card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Accent {
    Blue,
    Green,
}

/// Everything needed to draw one node: icon, badge, title, and a one-line
/// summary, plus which of the edit/delete affordances are offered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeCard {
    pub node_id: String,
    pub node_type: NodeType,
    pub icon: Icon,
    pub accent: Accent,
    pub badge: &'static str,
    pub title: String,
    pub summary: String,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl NodeCard {
    /// Render `node`.  A read-only builder offers neither edit nor delete;
    /// triggers never offer delete.
    pub fn for_node(node: &WorkflowNode, read_only: bool) -> Self {
        let (icon, accent, badge) = match node.node_type() {
            NodeType::Trigger => (Icon::Zap, Accent::Blue, "Trigger"),
            NodeType::Action => (Icon::Play, Accent::Green, "Action"),
        };

        let title = if node.name.trim().is_empty() {
            node.properties.definition_display_name().to_owned()
        } else {
            node.name.clone()
        };

        Self {
            node_id: node.id.clone(),
            node_type: node.node_type(),
            icon,
            accent,
            badge,
            title,
            summary: summary(&node.properties),
            can_edit: !read_only,
            can_delete: !read_only && !node.is_trigger(),
        }
    }
}

fn summary(properties: &NodeProperties) -> String {
    match properties {
        NodeProperties::Trigger(p) => {
            let n = p.event_schema.len();
            let noun = if n == 1 { "field" } else { "fields" };
            format!("Event: {} · {n} {noun}", p.event_name)
        }
        NodeProperties::WebhookAction(p) => {
            let url = match p.webhook_config.webhook_url.trim() {
                "" => "no URL",
                url => url,
            };
            let n = p.webhook_config.body.len();
            let noun = if n == 1 { "body param" } else { "body params" };
            format!("Type: webhook · {url} · {n} {noun}")
        }
        NodeProperties::GenericAction(p) => format!("Type: {}", p.action_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mock, KeyValuePair};

    #[test]
    fn trigger_card_is_blue_zap_without_delete() {
        let node = WorkflowNode::new("Lead Intake", NodeProperties::for_trigger(mock::lead_created_trigger()));
        let card = NodeCard::for_node(&node, false);

        assert_eq!(card.icon, Icon::Zap);
        assert_eq!(card.accent, Accent::Blue);
        assert_eq!(card.badge, "Trigger");
        assert_eq!(card.summary, "Event: lead.created · 2 fields");
        assert!(card.can_edit);
        assert!(!card.can_delete);
    }

    #[test]
    fn webhook_card_shows_url_and_body_count() {
        let mut props = NodeProperties::for_action(mock::webhook_action());
        if let NodeProperties::WebhookAction(p) = &mut props {
            p.webhook_config.webhook_url = "https://x.com/hook".into();
            p.webhook_config.body.push(KeyValuePair::new("email", "{{email}}"));
        }
        let node = WorkflowNode::new("Notify", props);
        let card = NodeCard::for_node(&node, false);

        assert_eq!(card.accent, Accent::Green);
        assert_eq!(card.summary, "Type: webhook · https://x.com/hook · 1 body param");
        assert!(card.can_delete);
    }

    #[test]
    fn read_only_card_offers_nothing() {
        let node = WorkflowNode::new("Email", NodeProperties::for_action(mock::send_email_action()));
        let card = NodeCard::for_node(&node, true);

        assert_eq!(card.summary, "Type: email");
        assert!(!card.can_edit);
        assert!(!card.can_delete);
    }

    #[test]
    fn blank_name_falls_back_to_definition_name() {
        let node = WorkflowNode::new("  ", NodeProperties::for_action(mock::add_tag_action()));
        assert_eq!(NodeCard::for_node(&node, false).title, "Add Tag");
    }
}
