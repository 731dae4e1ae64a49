//! Workflow nodes and their typed configuration payloads.
//!
//! The persisted form of a node is a loosely-shaped JSON object:
//!
//! ```json
//! { "id": "…", "type": "action", "name": "Notify CRM",
//!   "properties": { "actionDefinition": { … }, "action_type": "webhook",
//!                   "webhook_config": { … } } }
//! ```
//!
//! In memory the `properties` bag is a [`NodeProperties`] sum type keyed on
//! the node type and the action type, so a node can never be missing the
//! fields its kind requires.  The serde impls map between the two shapes.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ActionDefinition, FieldSpec, NodeError, TriggerDefinition, WebhookConfig};

// ---------------------------------------------------------------------------
// NodeType
// ---------------------------------------------------------------------------

/// Whether a node starts the workflow or is a downstream step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Trigger,
    Action,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trigger => write!(f, "trigger"),
            Self::Action => write!(f, "action"),
        }
    }
}

/// Canvas coordinates.  Optional; the linear pipeline view ignores them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A fresh node identifier.
///
/// Only needs to be unique within one automation's node list, but a v4
/// UUID keeps two nodes created in the same millisecond apart.
pub fn generate_node_id() -> String {
    Uuid::new_v4().to_string()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

/// Configuration of a trigger node.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerProperties {
    pub trigger_definition: TriggerDefinition,
    /// Copied out of the definition when the trigger is picked.
    pub event_name: String,
    /// Copied out of the definition when the trigger is picked.
    pub event_schema: Vec<FieldSpec>,
}

impl TriggerProperties {
    pub fn from_definition(definition: TriggerDefinition) -> Self {
        Self {
            event_name: definition.event_name.clone(),
            event_schema: definition.event_schema.clone(),
            trigger_definition: definition,
        }
    }
}

/// Configuration of a webhook action node.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookActionProperties {
    pub action_definition: ActionDefinition,
    pub webhook_config: WebhookConfig,
}

/// Configuration of any non-webhook action node.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericActionProperties {
    pub action_definition: ActionDefinition,
    pub action_type: String,
}

/// The typed `properties` bag of a [`WorkflowNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProperties", into = "RawProperties")]
pub enum NodeProperties {
    Trigger(TriggerProperties),
    WebhookAction(WebhookActionProperties),
    GenericAction(GenericActionProperties),
}

impl NodeProperties {
    /// Seed the properties of a freshly picked trigger.
    pub fn for_trigger(definition: TriggerDefinition) -> Self {
        Self::Trigger(TriggerProperties::from_definition(definition))
    }

    /// Seed the properties of a freshly picked action.  Webhook actions get
    /// [`WebhookConfig::default_for_new_action`].
    pub fn for_action(definition: ActionDefinition) -> Self {
        if definition.is_webhook() {
            Self::WebhookAction(WebhookActionProperties {
                action_definition: definition,
                webhook_config: WebhookConfig::default_for_new_action(),
            })
        } else {
            Self::GenericAction(GenericActionProperties {
                action_type: definition.action_type.clone(),
                action_definition: definition,
            })
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Trigger(_) => NodeType::Trigger,
            Self::WebhookAction(_) | Self::GenericAction(_) => NodeType::Action,
        }
    }

    /// The `action_type` of an action node; `None` for triggers.
    pub fn action_type(&self) -> Option<&str> {
        match self {
            Self::Trigger(_) => None,
            Self::WebhookAction(_) => Some(crate::WEBHOOK_ACTION_TYPE),
            Self::GenericAction(p) => Some(&p.action_type),
        }
    }

    /// Display name of the definition this node was built from.
    pub fn definition_display_name(&self) -> &str {
        match self {
            Self::Trigger(p) => &p.trigger_definition.display_name,
            Self::WebhookAction(p) => &p.action_definition.display_name,
            Self::GenericAction(p) => &p.action_definition.display_name,
        }
    }

    pub fn trigger_definition(&self) -> Option<&TriggerDefinition> {
        match self {
            Self::Trigger(p) => Some(&p.trigger_definition),
            _ => None,
        }
    }

    pub fn action_definition(&self) -> Option<&ActionDefinition> {
        match self {
            Self::Trigger(_) => None,
            Self::WebhookAction(p) => Some(&p.action_definition),
            Self::GenericAction(p) => Some(&p.action_definition),
        }
    }

    pub fn webhook_config(&self) -> Option<&WebhookConfig> {
        match self {
            Self::WebhookAction(p) => Some(&p.webhook_config),
            _ => None,
        }
    }
}

/// The persisted shape of the properties bag.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawProperties {
    #[serde(rename = "triggerDefinition", default, skip_serializing_if = "Option::is_none")]
    trigger_definition: Option<TriggerDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event_schema: Option<Vec<FieldSpec>>,
    #[serde(rename = "actionDefinition", default, skip_serializing_if = "Option::is_none")]
    action_definition: Option<ActionDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    webhook_config: Option<WebhookConfig>,
}

impl TryFrom<RawProperties> for NodeProperties {
    type Error = NodeError;

    fn try_from(raw: RawProperties) -> Result<Self, Self::Error> {
        if let Some(definition) = raw.trigger_definition {
            return Ok(Self::Trigger(TriggerProperties {
                event_name: raw.event_name.unwrap_or_else(|| definition.event_name.clone()),
                event_schema: raw
                    .event_schema
                    .unwrap_or_else(|| definition.event_schema.clone()),
                trigger_definition: definition,
            }));
        }

        let definition = raw.action_definition.ok_or(NodeError::MissingDefinition)?;
        let action_type = raw
            .action_type
            .unwrap_or_else(|| definition.action_type.clone());

        if action_type == crate::WEBHOOK_ACTION_TYPE {
            Ok(Self::WebhookAction(WebhookActionProperties {
                action_definition: definition,
                webhook_config: raw.webhook_config.unwrap_or_default(),
            }))
        } else {
            Ok(Self::GenericAction(GenericActionProperties {
                action_definition: definition,
                action_type,
            }))
        }
    }
}

impl From<NodeProperties> for RawProperties {
    fn from(properties: NodeProperties) -> Self {
        match properties {
            NodeProperties::Trigger(p) => Self {
                trigger_definition: Some(p.trigger_definition),
                event_name: Some(p.event_name),
                event_schema: Some(p.event_schema),
                ..Self::default()
            },
            NodeProperties::WebhookAction(p) => Self {
                action_definition: Some(p.action_definition),
                action_type: Some(crate::WEBHOOK_ACTION_TYPE.to_owned()),
                webhook_config: Some(p.webhook_config),
                ..Self::default()
            },
            NodeProperties::GenericAction(p) => Self {
                action_definition: Some(p.action_definition),
                action_type: Some(p.action_type),
                ..Self::default()
            },
        }
    }
}

// ---------------------------------------------------------------------------
// WorkflowNode
// ---------------------------------------------------------------------------

/// One trigger or action inside an automation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub struct WorkflowNode {
    pub id: String,
    pub name: String,
    pub properties: NodeProperties,
    pub position: Option<Position>,
}

impl WorkflowNode {
    /// Build a node with a freshly generated id.
    pub fn new(name: impl Into<String>, properties: NodeProperties) -> Self {
        Self {
            id: generate_node_id(),
            name: name.into(),
            properties,
            position: None,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.properties.node_type()
    }

    pub fn is_trigger(&self) -> bool {
        self.node_type() == NodeType::Trigger
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type")]
    node_type: NodeType,
    #[serde(default)]
    name: String,
    properties: NodeProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
}

impl TryFrom<RawNode> for WorkflowNode {
    type Error = NodeError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let actual = raw.properties.node_type();
        if raw.node_type != actual {
            return Err(NodeError::TypeMismatch {
                node_id: raw.id,
                declared: raw.node_type,
                actual,
            });
        }
        Ok(Self {
            id: raw.id,
            name: raw.name,
            properties: raw.properties,
            position: raw.position,
        })
    }
}

impl From<WorkflowNode> for RawNode {
    fn from(node: WorkflowNode) -> Self {
        Self {
            node_type: node.node_type(),
            id: node.id,
            name: node.name,
            properties: node.properties,
            position: node.position,
        }
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock;
    use serde_json::json;

    #[test]
    fn picking_a_trigger_copies_event_fields_out() {
        let props = NodeProperties::for_trigger(mock::lead_created_trigger());
        let NodeProperties::Trigger(p) = &props else {
            panic!("expected trigger properties");
        };
        assert_eq!(p.event_name, "lead.created");
        assert_eq!(p.event_schema.len(), 2);
        assert_eq!(props.node_type(), NodeType::Trigger);
    }

    #[test]
    fn picking_a_webhook_action_seeds_default_config() {
        let props = NodeProperties::for_action(mock::webhook_action());
        assert_eq!(props.action_type(), Some("webhook"));
        assert_eq!(
            props.webhook_config(),
            Some(&WebhookConfig::default_for_new_action())
        );
    }

    #[test]
    fn picking_another_action_keeps_only_definition_and_type() {
        let props = NodeProperties::for_action(mock::send_email_action());
        assert!(matches!(props, NodeProperties::GenericAction(_)));
        assert_eq!(props.action_type(), Some("email"));
        assert!(props.webhook_config().is_none());

        let json = serde_json::to_value(&props).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"actionDefinition") && keys.contains(&"action_type"));
    }

    #[test]
    fn trigger_node_serialises_with_original_bag_keys() {
        let mut node = WorkflowNode::new(
            "Lead Intake",
            NodeProperties::for_trigger(mock::lead_created_trigger()),
        );
        node.id = "n1".into();

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "trigger");
        assert_eq!(json["name"], "Lead Intake");
        assert_eq!(json["properties"]["event_name"], "lead.created");
        assert_eq!(json["properties"]["triggerDefinition"]["id"], "trg-lead-created");
        assert!(json.get("position").is_none());
    }

    #[test]
    fn node_graph_round_trips_through_json() {
        let nodes = vec![
            WorkflowNode::new("Lead Intake", NodeProperties::for_trigger(mock::lead_created_trigger())),
            WorkflowNode::new("Notify CRM", NodeProperties::for_action(mock::webhook_action())),
            WorkflowNode::new("Welcome Email", NodeProperties::for_action(mock::send_email_action())),
        ];

        let stored = serde_json::to_value(&nodes).unwrap();
        let loaded: Vec<WorkflowNode> = serde_json::from_value(stored).unwrap();
        assert_eq!(loaded, nodes);
    }

    #[test]
    fn declared_type_must_match_properties() {
        let bad = json!({
            "id": "n1",
            "type": "trigger",
            "name": "oops",
            "properties": {
                "actionDefinition": serde_json::to_value(mock::send_email_action()).unwrap(),
                "action_type": "email"
            }
        });
        let err = serde_json::from_value::<WorkflowNode>(bad).unwrap_err();
        assert!(err.to_string().contains("declared as trigger"));
    }

    #[test]
    fn properties_without_definition_are_rejected() {
        let bad = json!({ "id": "n1", "type": "action", "name": "x", "properties": {} });
        assert!(serde_json::from_value::<WorkflowNode>(bad).is_err());
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(generate_node_id(), generate_node_id());
    }
}
