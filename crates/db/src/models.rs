//! Row structs that map 1-to-1 onto database tables.
//!
//! These are *persistence* models; they carry no domain behaviour.
//! Domain types live in the `nodes` and `builder` crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// automations
// ---------------------------------------------------------------------------

/// A persisted automation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AutomationRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// `Draft`, `Active` or `Paused`.
    pub status: String,
    pub category: String,
    pub tags: Vec<String>,
    pub created_by: String,
    /// The full node graph (trigger first, then actions) as a JSON array.
    pub workflow_nodes: serde_json::Value,
    pub runs_count: i64,
    pub success_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when inserting an automation.  Ids, timestamps and run
/// counters are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAutomation {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_by: String,
    pub workflow_nodes: serde_json::Value,
}

/// A partial update.  `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutomationPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub workflow_nodes: Option<serde_json::Value>,
}

impl AutomationPatch {
    /// A patch touching only `status`.
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    /// Apply this patch to an in-memory row.
    pub fn apply_to(&self, row: &mut AutomationRow) {
        if let Some(name) = &self.name {
            row.name = name.clone();
        }
        if let Some(description) = &self.description {
            row.description = description.clone();
        }
        if let Some(status) = &self.status {
            row.status = status.clone();
        }
        if let Some(category) = &self.category {
            row.category = category.clone();
        }
        if let Some(tags) = &self.tags {
            row.tags = tags.clone();
        }
        if let Some(nodes) = &self.workflow_nodes {
            row.workflow_nodes = nodes.clone();
        }
    }
}

// ---------------------------------------------------------------------------
// automation_templates
// ---------------------------------------------------------------------------

/// A reusable starting point for new automations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TemplateRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub workflow_nodes: serde_json::Value,
    pub usage_count: i64,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// trigger_definitions / action_definitions
// ---------------------------------------------------------------------------

/// A registry row describing an available trigger kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TriggerDefinitionRow {
    pub id: String,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub event_name: String,
    /// JSON array of `{ field, description }` objects.
    #[serde(default)]
    pub event_schema: serde_json::Value,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

/// A registry row describing an available action kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ActionDefinitionRow {
    pub id: String,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub action_type: String,
    #[serde(default)]
    pub config_schema: serde_json::Value,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}
