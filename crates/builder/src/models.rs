//! Automation records as the builder and the automations page see them.
//!
//! The store keeps automations as rows with the node graph in an opaque
//! JSON column; the conversions here are the only place the two shapes
//! meet.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use db::models::{AutomationPatch, AutomationRow, NewAutomation, TemplateRow};
use nodes::{NodeType, WorkflowNode};

use crate::node_modal::validate_node;
use crate::{BuilderError, ValidationError};

// ---------------------------------------------------------------------------
// AutomationStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutomationStatus {
    #[default]
    Draft,
    Active,
    Paused,
}

impl AutomationStatus {
    /// The status the play/pause control switches to.
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Paused,
            Self::Draft | Self::Paused => Self::Active,
        }
    }
}

impl fmt::Display for AutomationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "Draft"),
            Self::Active => write!(f, "Active"),
            Self::Paused => write!(f, "Paused"),
        }
    }
}

impl FromStr for AutomationStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Draft"  => Ok(Self::Draft),
            "Active" => Ok(Self::Active),
            "Paused" => Ok(Self::Paused),
            other    => Err(format!("unknown automation status: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Draft (what the builder produces)
// ---------------------------------------------------------------------------

/// The editable metadata of an automation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: AutomationStatus,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_by: String,
}

/// Metadata plus node graph, as submitted by the builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationDraft {
    #[serde(flatten)]
    pub metadata: AutomationMetadata,
    #[serde(default, alias = "workflowNodes")]
    pub workflow_nodes: Vec<WorkflowNode>,
}

impl AutomationDraft {
    /// Check the rules guarding a save: a name, exactly one trigger in
    /// first position, and every node individually valid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.metadata.name.trim().is_empty() {
            return Err(ValidationError::MissingAutomationName);
        }
        validate_graph(&self.workflow_nodes)?;
        self.workflow_nodes.iter().try_for_each(validate_node)
    }

    pub fn to_new_automation(&self) -> Result<NewAutomation, BuilderError> {
        Ok(NewAutomation {
            name: self.metadata.name.trim().to_owned(),
            description: self.metadata.description.clone(),
            status: self.metadata.status.to_string(),
            category: self.metadata.category.clone(),
            tags: self.metadata.tags.clone(),
            created_by: self.metadata.created_by.clone(),
            workflow_nodes: serde_json::to_value(&self.workflow_nodes)?,
        })
    }

    /// A patch replacing every editable field.  `created_by` is immutable.
    pub fn to_patch(&self) -> Result<AutomationPatch, BuilderError> {
        Ok(AutomationPatch {
            name: Some(self.metadata.name.trim().to_owned()),
            description: Some(self.metadata.description.clone()),
            status: Some(self.metadata.status.to_string()),
            category: Some(self.metadata.category.clone()),
            tags: Some(self.metadata.tags.clone()),
            workflow_nodes: Some(serde_json::to_value(&self.workflow_nodes)?),
        })
    }
}

/// Structural rules of a node list: one trigger, and it comes first.
pub fn validate_graph(nodes: &[WorkflowNode]) -> Result<(), ValidationError> {
    let triggers = nodes.iter().filter(|n| n.node_type() == NodeType::Trigger).count();
    match triggers {
        0 => Err(ValidationError::MissingWorkflowTrigger),
        1 if !nodes[0].is_trigger() => Err(ValidationError::TriggerNotFirst),
        1 => Ok(()),
        _ => Err(ValidationError::MultipleTriggers),
    }
}

// ---------------------------------------------------------------------------
// Automation (what the store holds)
// ---------------------------------------------------------------------------

/// A persisted automation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Automation {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: AutomationStatus,
    pub category: String,
    pub tags: Vec<String>,
    pub created_by: String,
    pub workflow_nodes: Vec<WorkflowNode>,
    pub runs_count: i64,
    pub success_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Automation {
    pub fn metadata(&self) -> AutomationMetadata {
        AutomationMetadata {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            category: self.category.clone(),
            tags: self.tags.clone(),
            created_by: self.created_by.clone(),
        }
    }

    pub fn draft(&self) -> AutomationDraft {
        AutomationDraft {
            metadata: self.metadata(),
            workflow_nodes: self.workflow_nodes.clone(),
        }
    }

    pub fn trigger(&self) -> Option<&WorkflowNode> {
        self.workflow_nodes.first().filter(|n| n.is_trigger())
    }
}

impl TryFrom<AutomationRow> for Automation {
    type Error = BuilderError;

    fn try_from(row: AutomationRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| BuilderError::CorruptRecord {
            id: row.id.to_string(),
            reason,
        };
        let status: AutomationStatus = row.status.parse().map_err(corrupt)?;
        let workflow_nodes = serde_json::from_value(row.workflow_nodes.clone())
            .map_err(|e| corrupt(e.to_string()))?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            status,
            category: row.category,
            tags: row.tags,
            created_by: row.created_by,
            workflow_nodes,
            runs_count: row.runs_count,
            success_count: row.success_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// A reusable node graph new automations can start from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationTemplate {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub workflow_nodes: Vec<WorkflowNode>,
    pub usage_count: i64,
}

impl AutomationTemplate {
    /// The insert for a new `Draft` automation copied from this template.
    pub fn instantiate(&self, created_by: &str) -> Result<NewAutomation, BuilderError> {
        Ok(NewAutomation {
            name: self.name.clone(),
            description: self.description.clone(),
            status: AutomationStatus::Draft.to_string(),
            category: self.category.clone(),
            tags: self.tags.clone(),
            created_by: created_by.to_owned(),
            workflow_nodes: serde_json::to_value(&self.workflow_nodes)?,
        })
    }
}

impl TryFrom<TemplateRow> for AutomationTemplate {
    type Error = BuilderError;

    fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
        let workflow_nodes =
            serde_json::from_value(row.workflow_nodes).map_err(|e| BuilderError::CorruptRecord {
                id: row.id.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            category: row.category,
            tags: row.tags,
            workflow_nodes,
            usage_count: row.usage_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodes::{mock, NodeProperties};

    fn trigger() -> WorkflowNode {
        WorkflowNode::new("Lead Intake", NodeProperties::for_trigger(mock::lead_created_trigger()))
    }

    fn email() -> WorkflowNode {
        WorkflowNode::new("Welcome", NodeProperties::for_action(mock::send_email_action()))
    }

    fn draft(name: &str, nodes: Vec<WorkflowNode>) -> AutomationDraft {
        AutomationDraft {
            metadata: AutomationMetadata {
                name: name.into(),
                ..AutomationMetadata::default()
            },
            workflow_nodes: nodes,
        }
    }

    #[test]
    fn status_toggle_flips_active_and_paused() {
        assert_eq!(AutomationStatus::Active.toggled(), AutomationStatus::Paused);
        assert_eq!(AutomationStatus::Paused.toggled(), AutomationStatus::Active);
        assert_eq!(AutomationStatus::Draft.toggled(), AutomationStatus::Active);
    }

    #[test]
    fn status_round_trips_through_its_column_text() {
        for status in [AutomationStatus::Draft, AutomationStatus::Active, AutomationStatus::Paused] {
            assert_eq!(status.to_string().parse::<AutomationStatus>(), Ok(status));
        }
        assert!("Archived".parse::<AutomationStatus>().is_err());
    }

    #[test]
    fn draft_without_name_is_rejected_first() {
        let err = draft("   ", vec![]).validate().unwrap_err();
        assert_eq!(err, ValidationError::MissingAutomationName);
    }

    #[test]
    fn draft_without_trigger_is_rejected() {
        let err = draft("Welcome Flow", vec![email()]).validate().unwrap_err();
        assert_eq!(err.to_string(), "Please add a trigger to start the workflow");
    }

    #[test]
    fn trigger_must_be_first_and_unique() {
        assert_eq!(
            validate_graph(&[email(), trigger()]),
            Err(ValidationError::TriggerNotFirst)
        );
        assert_eq!(
            validate_graph(&[trigger(), trigger()]),
            Err(ValidationError::MultipleTriggers)
        );
        assert_eq!(validate_graph(&[trigger(), email()]), Ok(()));
    }

    #[test]
    fn draft_accepts_camel_case_node_key() {
        let json = serde_json::json!({
            "name": "Welcome Flow",
            "status": "Active",
            "workflowNodes": serde_json::to_value(vec![trigger()]).unwrap()
        });
        let parsed: AutomationDraft = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.metadata.status, AutomationStatus::Active);
        assert_eq!(parsed.workflow_nodes.len(), 1);
    }

    #[test]
    fn row_with_unknown_status_is_reported_corrupt() {
        let now = Utc::now();
        let row = AutomationRow {
            id: Uuid::new_v4(),
            name: "x".into(),
            description: String::new(),
            status: "Archived".into(),
            category: String::new(),
            tags: vec![],
            created_by: String::new(),
            workflow_nodes: serde_json::json!([]),
            runs_count: 0,
            success_count: 0,
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(
            Automation::try_from(row),
            Err(BuilderError::CorruptRecord { .. })
        ));
    }
}
