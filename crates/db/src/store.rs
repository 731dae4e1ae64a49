//! The storage contracts the builder talks to.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    ActionDefinitionRow, AutomationPatch, AutomationRow, NewAutomation, TemplateRow,
    TriggerDefinitionRow,
};
use crate::DbError;

/// Read-only catalog of trigger and action definitions.
#[async_trait]
pub trait DefinitionRegistry: Send + Sync {
    /// Active trigger definitions, ordered by category.
    async fn triggers(&self) -> Result<Vec<TriggerDefinitionRow>, DbError>;

    /// Active action definitions, ordered by category.
    async fn actions(&self) -> Result<Vec<ActionDefinitionRow>, DbError>;
}

/// Persistence for automations and automation templates.
#[async_trait]
pub trait AutomationStore: Send + Sync {
    /// All automations, newest first.
    async fn list(&self) -> Result<Vec<AutomationRow>, DbError>;

    /// A single automation by id.
    async fn get(&self, id: Uuid) -> Result<AutomationRow, DbError>;

    /// Insert an automation; the store assigns the id and timestamps.
    async fn create(&self, new: NewAutomation) -> Result<AutomationRow, DbError>;

    /// Merge `patch` into an existing automation.
    async fn update(&self, id: Uuid, patch: AutomationPatch) -> Result<AutomationRow, DbError>;

    /// Permanently delete an automation.
    async fn delete(&self, id: Uuid) -> Result<(), DbError>;

    /// All templates, most used first.
    async fn list_templates(&self) -> Result<Vec<TemplateRow>, DbError>;

    /// Insert `new` and bump the template's usage count as one atomic
    /// write: either both happen or neither does.
    async fn instantiate_template(
        &self,
        template_id: Uuid,
        new: NewAutomation,
    ) -> Result<AutomationRow, DbError>;
}
