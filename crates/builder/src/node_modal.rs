//! The dialog that creates or edits a single workflow node.
//!
//! Two stages.  While `Selecting`, the caller shows a trigger or action
//! selector and hands the picked definition to [`NodeConfigModal::pick_trigger`]
//! or [`NodeConfigModal::pick_action`].  While `Configuring`, the name field
//! and, for webhook actions, the [`WebhookEditor`] are live.  Nothing leaves
//! the modal until [`NodeConfigModal::save`] succeeds.

use nodes::{
    ActionDefinition, FieldSpec, GenericActionProperties, NodeProperties, NodeType, Position,
    TriggerDefinition, TriggerProperties, WebhookActionProperties, WebhookConfig, WorkflowNode,
    generate_node_id,
};

use crate::webhook::WebhookEditor;
use crate::{BuilderError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalStage {
    /// No definition chosen; the selector is showing.
    Selecting,
    /// A definition is chosen; name and config fields are showing.
    Configuring,
}

/// What has been picked so far, with its in-progress configuration.
#[derive(Debug, Clone)]
enum Draft {
    Empty,
    Trigger(TriggerProperties),
    Webhook {
        definition: ActionDefinition,
        editor: WebhookEditor,
    },
    Generic(GenericActionProperties),
}

#[derive(Debug, Clone)]
pub struct NodeConfigModal {
    node_type: NodeType,
    node_id: String,
    is_new: bool,
    name: String,
    position: Option<Position>,
    draft: Draft,
    /// Fields of the workflow's trigger event, offered to webhook bodies.
    trigger_fields: Vec<FieldSpec>,
}

impl NodeConfigModal {
    /// Open the modal for a new node (`existing = None`, starts `Selecting`)
    /// or for editing `existing` (starts `Configuring`, pre-populated).
    ///
    /// `trigger_fields` is the event schema of the workflow's trigger; it
    /// feeds the field chips of a webhook body.
    pub fn open(
        node_type: NodeType,
        existing: Option<&WorkflowNode>,
        trigger_fields: Vec<FieldSpec>,
    ) -> Self {
        let Some(node) = existing else {
            return Self {
                node_type,
                node_id: generate_node_id(),
                is_new: true,
                name: String::new(),
                position: None,
                draft: Draft::Empty,
                trigger_fields,
            };
        };

        let draft = match &node.properties {
            NodeProperties::Trigger(p) => Draft::Trigger(p.clone()),
            NodeProperties::WebhookAction(p) => Draft::Webhook {
                definition: p.action_definition.clone(),
                editor: WebhookEditor::new(p.webhook_config.clone(), trigger_fields.clone()),
            },
            NodeProperties::GenericAction(p) => Draft::Generic(p.clone()),
        };

        Self {
            node_type: node.node_type(),
            node_id: node.id.clone(),
            is_new: false,
            name: node.name.clone(),
            position: node.position,
            draft,
            trigger_fields,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn stage(&self) -> ModalStage {
        match self.draft {
            Draft::Empty => ModalStage::Selecting,
            _ => ModalStage::Configuring,
        }
    }

    /// Display name of the picked definition, if any.
    pub fn definition_name(&self) -> Option<&str> {
        match &self.draft {
            Draft::Empty => None,
            Draft::Trigger(p) => Some(&p.trigger_definition.display_name),
            Draft::Webhook { definition, .. } => Some(&definition.display_name),
            Draft::Generic(p) => Some(&p.action_definition.display_name),
        }
    }

    // ------------------------------------------------------------------
    // Stage transitions
    // ------------------------------------------------------------------

    pub fn pick_trigger(&mut self, definition: TriggerDefinition) -> Result<(), BuilderError> {
        if self.node_type != NodeType::Trigger {
            return Err(BuilderError::DefinitionKindMismatch { expected: self.node_type });
        }
        self.prefill_name(&definition.display_name);
        self.draft = Draft::Trigger(TriggerProperties::from_definition(definition));
        Ok(())
    }

    pub fn pick_action(&mut self, definition: ActionDefinition) -> Result<(), BuilderError> {
        if self.node_type != NodeType::Action {
            return Err(BuilderError::DefinitionKindMismatch { expected: self.node_type });
        }
        self.prefill_name(&definition.display_name);
        self.draft = if definition.is_webhook() {
            Draft::Webhook {
                definition,
                editor: WebhookEditor::new(
                    WebhookConfig::default_for_new_action(),
                    self.trigger_fields.clone(),
                ),
            }
        } else {
            Draft::Generic(GenericActionProperties {
                action_type: definition.action_type.clone(),
                action_definition: definition,
            })
        };
        Ok(())
    }

    /// "Change Trigger" / "Change Action": back to the selector.  The
    /// picked definition and its config are dropped; the name is kept.
    pub fn change_definition(&mut self) {
        self.draft = Draft::Empty;
    }

    fn prefill_name(&mut self, display_name: &str) {
        if self.name.trim().is_empty() {
            self.name = display_name.to_owned();
        }
    }

    // ------------------------------------------------------------------
    // Fields
    // ------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The webhook editor, when the picked action is a webhook.
    pub fn webhook(&self) -> Option<&WebhookEditor> {
        match &self.draft {
            Draft::Webhook { editor, .. } => Some(editor),
            _ => None,
        }
    }

    pub fn webhook_mut(&mut self) -> Option<&mut WebhookEditor> {
        match &mut self.draft {
            Draft::Webhook { editor, .. } => Some(editor),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Exit
    // ------------------------------------------------------------------

    /// Validate and build the node.  On failure the modal is untouched and
    /// the error names the first unmet rule.
    pub fn save(&self) -> Result<WorkflowNode, ValidationError> {
        let properties = match &self.draft {
            Draft::Empty => {
                return Err(match self.node_type {
                    NodeType::Trigger => ValidationError::MissingTrigger,
                    NodeType::Action => ValidationError::MissingAction,
                });
            }
            Draft::Trigger(p) => NodeProperties::Trigger(p.clone()),
            Draft::Webhook { definition, editor } => {
                NodeProperties::WebhookAction(WebhookActionProperties {
                    action_definition: definition.clone(),
                    webhook_config: editor.config().clone(),
                })
            }
            Draft::Generic(p) => NodeProperties::GenericAction(p.clone()),
        };

        let node = WorkflowNode {
            id: self.node_id.clone(),
            name: self.name.trim().to_owned(),
            properties,
            position: self.position,
        };
        validate_node(&node)?;
        Ok(node)
    }

    /// Close without emitting anything.
    pub fn cancel(self) {}
}

/// The per-node save rules that still apply once a definition is attached:
/// a webhook needs a URL, and every node needs a name.
pub fn validate_node(node: &WorkflowNode) -> Result<(), ValidationError> {
    if let Some(config) = node.properties.webhook_config() {
        if config.webhook_url.trim().is_empty() {
            return Err(ValidationError::MissingWebhookUrl);
        }
    }
    if node.name.trim().is_empty() {
        return Err(ValidationError::MissingNodeName);
    }
    Ok(())
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::Section;
    use nodes::mock;

    fn lead_fields() -> Vec<FieldSpec> {
        mock::lead_created_trigger().event_schema
    }

    #[test]
    fn new_node_starts_selecting_and_existing_starts_configuring() {
        let modal = NodeConfigModal::open(NodeType::Trigger, None, vec![]);
        assert_eq!(modal.stage(), ModalStage::Selecting);
        assert!(modal.is_new());

        let node = WorkflowNode::new("Welcome", NodeProperties::for_action(mock::send_email_action()));
        let modal = NodeConfigModal::open(NodeType::Action, Some(&node), vec![]);
        assert_eq!(modal.stage(), ModalStage::Configuring);
        assert_eq!(modal.node_id(), node.id);
        assert_eq!(modal.name(), "Welcome");
        assert_eq!(modal.definition_name(), Some("Send Email"));
    }

    #[test]
    fn picking_lead_trigger_builds_expected_node() {
        let mut modal = NodeConfigModal::open(NodeType::Trigger, None, vec![]);
        modal.pick_trigger(mock::lead_created_trigger()).unwrap();
        modal.set_name("Lead Intake");

        let node = modal.save().unwrap();
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "trigger");
        assert_eq!(json["name"], "Lead Intake");
        assert_eq!(json["properties"]["event_name"], "lead.created");
        assert_eq!(json["properties"]["event_schema"][0]["field"], "email");
        assert_eq!(json["properties"]["event_schema"][1]["field"], "name");
        assert_eq!(json["properties"]["triggerDefinition"]["id"], "trg-lead-created");
    }

    #[test]
    fn wrong_definition_kind_is_refused() {
        let mut modal = NodeConfigModal::open(NodeType::Action, None, vec![]);
        assert!(matches!(
            modal.pick_trigger(mock::lead_created_trigger()),
            Err(BuilderError::DefinitionKindMismatch { expected: NodeType::Action })
        ));
        assert_eq!(modal.stage(), ModalStage::Selecting);
    }

    #[test]
    fn empty_name_is_prefilled_from_definition_only_once() {
        let mut modal = NodeConfigModal::open(NodeType::Action, None, vec![]);
        modal.pick_action(mock::send_email_action()).unwrap();
        assert_eq!(modal.name(), "Send Email");

        modal.set_name("Welcome");
        modal.change_definition();
        assert_eq!(modal.stage(), ModalStage::Selecting);
        modal.pick_action(mock::add_tag_action()).unwrap();
        assert_eq!(modal.name(), "Welcome");
    }

    #[test]
    fn webhook_without_url_is_blocked() {
        let mut modal = NodeConfigModal::open(NodeType::Action, None, lead_fields());
        modal.pick_action(mock::webhook_action()).unwrap();

        assert_eq!(modal.save(), Err(ValidationError::MissingWebhookUrl));
        assert_eq!(
            ValidationError::MissingWebhookUrl.to_string(),
            "Please enter a webhook URL"
        );
        assert_eq!(modal.stage(), ModalStage::Configuring);
    }

    #[test]
    fn webhook_chip_writes_placeholder_into_saved_node() {
        let mut modal = NodeConfigModal::open(NodeType::Action, None, lead_fields());
        modal.pick_action(mock::webhook_action()).unwrap();

        let editor = modal.webhook_mut().unwrap();
        editor.set_url("https://x.com/hook");
        editor.add_row(Section::Body);
        editor.set_key(Section::Body, 0, "email").unwrap();
        editor.insert_trigger_field(0, "email").unwrap();
        assert_eq!(editor.available_fields().len(), 2);

        let node = modal.save().unwrap();
        let config = node.properties.webhook_config().unwrap();
        assert_eq!(config.webhook_url, "https://x.com/hook");
        assert_eq!(config.body[0].value, "{{email}}");
        assert_eq!(config.headers[0].key, "Content-Type");
    }

    #[test]
    fn edit_keeps_id_and_new_node_gets_fresh_id() {
        let mut first = NodeConfigModal::open(NodeType::Action, None, vec![]);
        first.pick_action(mock::add_tag_action()).unwrap();
        let saved = first.save().unwrap();

        let mut again = NodeConfigModal::open(NodeType::Action, Some(&saved), vec![]);
        again.set_name("Tag as lead");
        let edited = again.save().unwrap();
        assert_eq!(edited.id, saved.id);
        assert_eq!(edited.name, "Tag as lead");

        let other = NodeConfigModal::open(NodeType::Action, None, vec![]);
        assert_ne!(other.node_id(), saved.id);
    }

    #[test]
    fn saved_name_is_trimmed() {
        let mut modal = NodeConfigModal::open(NodeType::Action, None, vec![]);
        modal.pick_action(mock::add_tag_action()).unwrap();
        modal.set_name("  Tag  ");
        assert_eq!(modal.save().unwrap().name, "Tag");
    }

    /// Every combination of the four rules: `save` emits exactly when all
    /// hold, otherwise it reports the first one broken.
    #[test]
    fn save_gate_over_all_rule_combinations() {
        for node_type in [NodeType::Trigger, NodeType::Action] {
            for picked in [false, true] {
                for webhook in [false, true] {
                    for url in ["", "   ", "https://x.com/hook"] {
                        for name in ["", "  ", "Step"] {
                            let mut modal = NodeConfigModal::open(node_type, None, vec![]);
                            if picked {
                                match node_type {
                                    NodeType::Trigger => {
                                        modal.pick_trigger(mock::lead_created_trigger()).unwrap()
                                    }
                                    NodeType::Action if webhook => {
                                        modal.pick_action(mock::webhook_action()).unwrap()
                                    }
                                    NodeType::Action => {
                                        modal.pick_action(mock::send_email_action()).unwrap()
                                    }
                                }
                                if let Some(editor) = modal.webhook_mut() {
                                    editor.set_url(url);
                                }
                            }
                            modal.set_name(name);

                            let is_webhook = picked && webhook && node_type == NodeType::Action;
                            let expected = if !picked {
                                Err(match node_type {
                                    NodeType::Trigger => ValidationError::MissingTrigger,
                                    NodeType::Action => ValidationError::MissingAction,
                                })
                            } else if is_webhook && url.trim().is_empty() {
                                Err(ValidationError::MissingWebhookUrl)
                            } else if name.trim().is_empty() {
                                Err(ValidationError::MissingNodeName)
                            } else {
                                Ok(())
                            };

                            assert_eq!(
                                modal.save().map(|_| ()),
                                expected,
                                "{node_type} picked={picked} webhook={webhook} url={url:?} name={name:?}"
                            );
                        }
                    }
                }
            }
        }
    }
}
