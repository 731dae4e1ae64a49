//! Postgres-backed [`AutomationStore`] and [`DefinitionRegistry`].

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{
    ActionDefinitionRow, AutomationPatch, AutomationRow, NewAutomation, TemplateRow,
    TriggerDefinitionRow,
};
use crate::repository::{automations, definitions, templates};
use crate::store::{AutomationStore, DefinitionRegistry};
use crate::DbError;

/// Type alias for the shared Postgres pool used across the whole application.
pub type DbPool = PgPool;

/// Thin adapter from the store traits onto the repository functions.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url` with at most `max_connections`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, DbError> {
        info!(max_connections, "connecting to database");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply the embedded migrations from the workspace `migrations/` dir.
    pub async fn migrate(&self) -> Result<(), DbError> {
        info!("running database migrations");
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl AutomationStore for PgStore {
    async fn list(&self) -> Result<Vec<AutomationRow>, DbError> {
        automations::list_automations(&self.pool).await
    }

    async fn get(&self, id: Uuid) -> Result<AutomationRow, DbError> {
        automations::get_automation(&self.pool, id).await
    }

    #[instrument(skip(self, new), fields(name = %new.name))]
    async fn create(&self, new: NewAutomation) -> Result<AutomationRow, DbError> {
        automations::create_automation(&self.pool, &new).await
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: Uuid, patch: AutomationPatch) -> Result<AutomationRow, DbError> {
        automations::update_automation(&self.pool, id, &patch).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        automations::delete_automation(&self.pool, id).await
    }

    async fn list_templates(&self) -> Result<Vec<TemplateRow>, DbError> {
        templates::list_templates(&self.pool).await
    }

    #[instrument(skip(self, new))]
    async fn instantiate_template(
        &self,
        template_id: Uuid,
        new: NewAutomation,
    ) -> Result<AutomationRow, DbError> {
        templates::instantiate_template(&self.pool, template_id, &new).await
    }
}

#[async_trait]
impl DefinitionRegistry for PgStore {
    async fn triggers(&self) -> Result<Vec<TriggerDefinitionRow>, DbError> {
        definitions::list_active_triggers(&self.pool).await
    }

    async fn actions(&self) -> Result<Vec<ActionDefinitionRow>, DbError> {
        definitions::list_active_actions(&self.pool).await
    }
}
