//! The automation builder: metadata form plus a linear trigger → actions
//! pipeline.
//!
//! `WorkflowBuilder` owns the node list being edited.  Nodes only enter it
//! through [`WorkflowBuilder::save_node`] (usually via
//! [`WorkflowBuilder::commit_node_modal`]), which keeps the trigger unique
//! and in first position.

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use nodes::{FieldSpec, NodeCard, NodeProperties, NodeType, WorkflowNode};

use crate::models::{Automation, AutomationDraft, AutomationMetadata, AutomationStatus};
use crate::node_modal::NodeConfigModal;
use crate::BuilderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuilderMode {
    Create,
    Edit,
    /// Everything disabled; only "Close" is available.
    View,
}

/// One row of the rendered pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineItem {
    Node(NodeCard),
    /// The connector drawn between two consecutive nodes.
    Arrow,
}

#[derive(Debug, Clone)]
pub struct WorkflowBuilder {
    mode: BuilderMode,
    automation_id: Option<Uuid>,
    metadata: AutomationMetadata,
    nodes: Vec<WorkflowNode>,
    modal: Option<NodeConfigModal>,
}

impl WorkflowBuilder {
    /// An empty builder for a new automation.
    pub fn create(created_by: impl Into<String>) -> Self {
        Self {
            mode: BuilderMode::Create,
            automation_id: None,
            metadata: AutomationMetadata {
                created_by: created_by.into(),
                ..AutomationMetadata::default()
            },
            nodes: Vec::new(),
            modal: None,
        }
    }

    pub fn edit(automation: &Automation) -> Self {
        Self::load(BuilderMode::Edit, automation)
    }

    pub fn view(automation: &Automation) -> Self {
        Self::load(BuilderMode::View, automation)
    }

    fn load(mode: BuilderMode, automation: &Automation) -> Self {
        Self {
            mode,
            automation_id: Some(automation.id),
            metadata: automation.metadata(),
            nodes: automation.workflow_nodes.clone(),
            modal: None,
        }
    }

    pub fn mode(&self) -> BuilderMode {
        self.mode
    }

    /// Id of the automation being edited or viewed; `None` when creating.
    pub fn automation_id(&self) -> Option<Uuid> {
        self.automation_id
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == BuilderMode::View
    }

    fn ensure_editable(&self) -> Result<(), BuilderError> {
        if self.is_read_only() {
            return Err(BuilderError::ReadOnly);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    pub fn metadata(&self) -> &AutomationMetadata {
        &self.metadata
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), BuilderError> {
        self.ensure_editable()?;
        self.metadata.name = name.into();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), BuilderError> {
        self.ensure_editable()?;
        self.metadata.description = description.into();
        Ok(())
    }

    pub fn set_status(&mut self, status: AutomationStatus) -> Result<(), BuilderError> {
        self.ensure_editable()?;
        self.metadata.status = status;
        Ok(())
    }

    pub fn set_category(&mut self, category: impl Into<String>) -> Result<(), BuilderError> {
        self.ensure_editable()?;
        self.metadata.category = category.into();
        Ok(())
    }

    pub fn set_tags(&mut self, tags: Vec<String>) -> Result<(), BuilderError> {
        self.ensure_editable()?;
        self.metadata.tags = tags;
        Ok(())
    }

    /// The tags text box: comma-separated, blanks dropped.
    pub fn set_tags_from_input(&mut self, input: &str) -> Result<(), BuilderError> {
        let tags = input
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .collect();
        self.set_tags(tags)
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    pub fn nodes(&self) -> &[WorkflowNode] {
        &self.nodes
    }

    pub fn trigger(&self) -> Option<&WorkflowNode> {
        self.nodes.first().filter(|n| n.is_trigger())
    }

    pub fn actions(&self) -> impl Iterator<Item = &WorkflowNode> {
        self.nodes.iter().filter(|n| !n.is_trigger())
    }

    /// Label of the trigger button.
    pub fn trigger_button(&self) -> &'static str {
        if self.trigger().is_some() {
            "Edit Trigger"
        } else {
            "Add Trigger"
        }
    }

    pub fn can_add_trigger(&self) -> bool {
        !self.is_read_only() && self.trigger().is_none()
    }

    pub fn can_add_action(&self) -> bool {
        !self.is_read_only() && self.trigger().is_some()
    }

    fn trigger_fields(&self) -> Vec<FieldSpec> {
        match self.trigger().map(|n| &n.properties) {
            Some(NodeProperties::Trigger(p)) => p.event_schema.clone(),
            _ => Vec::new(),
        }
    }

    /// Merge a saved node into the list.
    ///
    /// A node whose id is already present replaces it in place.  Otherwise
    /// a trigger is put first and every other trigger is dropped, and an
    /// action is appended.
    pub fn save_node(&mut self, node: WorkflowNode) -> Result<(), BuilderError> {
        self.ensure_editable()?;

        let existing = self.nodes.iter().position(|n| n.id == node.id);
        match existing {
            Some(idx) if self.nodes[idx].node_type() == node.node_type() => {
                debug!(node_id = %node.id, "replacing node");
                self.nodes[idx] = node;
            }
            _ => {
                if let Some(idx) = existing {
                    self.nodes.remove(idx);
                }
                if node.is_trigger() {
                    debug!(node_id = %node.id, "setting trigger");
                    self.nodes.retain(|n| !n.is_trigger());
                    self.nodes.insert(0, node);
                } else {
                    debug!(node_id = %node.id, "appending action");
                    self.nodes.push(node);
                }
            }
        }
        Ok(())
    }

    pub fn delete_node(&mut self, node_id: &str) -> Result<WorkflowNode, BuilderError> {
        self.ensure_editable()?;
        let idx = self
            .nodes
            .iter()
            .position(|n| n.id == node_id)
            .ok_or_else(|| BuilderError::NodeNotFound(node_id.to_owned()))?;
        if self.nodes[idx].is_trigger() {
            return Err(BuilderError::TriggerNotDeletable);
        }
        Ok(self.nodes.remove(idx))
    }

    // ------------------------------------------------------------------
    // Node modal
    // ------------------------------------------------------------------

    /// "Add Trigger" / "Edit Trigger".
    pub fn open_trigger_modal(&mut self) -> Result<&mut NodeConfigModal, BuilderError> {
        self.ensure_editable()?;
        let modal = NodeConfigModal::open(NodeType::Trigger, self.trigger(), Vec::new());
        Ok(self.modal.insert(modal))
    }

    /// "Add Action".
    pub fn open_action_modal(&mut self) -> Result<&mut NodeConfigModal, BuilderError> {
        self.ensure_editable()?;
        if self.trigger().is_none() {
            return Err(BuilderError::TriggerRequired);
        }
        let modal = NodeConfigModal::open(NodeType::Action, None, self.trigger_fields());
        Ok(self.modal.insert(modal))
    }

    /// The edit control on a node card.
    pub fn open_node_modal(&mut self, node_id: &str) -> Result<&mut NodeConfigModal, BuilderError> {
        self.ensure_editable()?;
        let node = self
            .nodes
            .iter()
            .find(|n| n.id == node_id)
            .ok_or_else(|| BuilderError::NodeNotFound(node_id.to_owned()))?;
        let modal = NodeConfigModal::open(node.node_type(), Some(node), self.trigger_fields());
        Ok(self.modal.insert(modal))
    }

    pub fn node_modal(&self) -> Option<&NodeConfigModal> {
        self.modal.as_ref()
    }

    pub fn node_modal_mut(&mut self) -> Option<&mut NodeConfigModal> {
        self.modal.as_mut()
    }

    pub fn cancel_node_modal(&mut self) {
        if let Some(modal) = self.modal.take() {
            modal.cancel();
        }
    }

    /// Save the open modal and merge its node.  On a validation failure the
    /// modal stays open with its edits.
    pub fn commit_node_modal(&mut self) -> Result<(), BuilderError> {
        let modal = self.modal.as_ref().ok_or(BuilderError::NoNodeModal)?;
        let node = modal.save()?;
        self.modal = None;
        self.save_node(node)
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Node cards in order with an arrow between each pair.
    pub fn pipeline(&self) -> Vec<PipelineItem> {
        render_pipeline(&self.nodes, self.is_read_only())
    }

    pub fn submit_label(&self) -> Option<&'static str> {
        match self.mode {
            BuilderMode::Create => Some("Create Automation"),
            BuilderMode::Edit => Some("Update Automation"),
            BuilderMode::View => None,
        }
    }

    /// The metadata and node list to hand to the store, once the
    /// automation has a name and a trigger.
    pub fn submit(&self) -> Result<AutomationDraft, BuilderError> {
        self.ensure_editable()?;
        let draft = AutomationDraft {
            metadata: self.metadata.clone(),
            workflow_nodes: self.nodes.clone(),
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// Cards and arrows for `nodes`, as the builder draws them.
pub fn render_pipeline(nodes: &[WorkflowNode], read_only: bool) -> Vec<PipelineItem> {
    let mut items = Vec::with_capacity(nodes.len() * 2);
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            items.push(PipelineItem::Arrow);
        }
        items.push(PipelineItem::Node(NodeCard::for_node(node, read_only)));
    }
    items
}
