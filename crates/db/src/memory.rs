//! `MemoryStore`: an in-process backend for both store traits.
//!
//! Used when the server runs without a database and as the test double
//! for the builder and api crates.  Failures can be injected per
//! operation so the error paths of callers can be exercised.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    ActionDefinitionRow, AutomationPatch, AutomationRow, NewAutomation, TemplateRow,
    TriggerDefinitionRow,
};
use crate::store::{AutomationStore, DefinitionRegistry};
use crate::{DbError, StoreOp};

/// Initial contents of a [`MemoryStore`], loadable from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub triggers: Vec<TriggerDefinitionRow>,
    #[serde(default)]
    pub actions: Vec<ActionDefinitionRow>,
    #[serde(default)]
    pub templates: Vec<SeedTemplate>,
    #[serde(default)]
    pub automations: Vec<NewAutomation>,
}

/// A template entry of a [`Seed`]; the id and timestamp are assigned on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub workflow_nodes: serde_json::Value,
    #[serde(default)]
    pub usage_count: i64,
}

#[derive(Debug, Default)]
struct State {
    /// Insertion order; `list` reverses it to get newest first.
    automations: Vec<AutomationRow>,
    templates: Vec<TemplateRow>,
    triggers: Vec<TriggerDefinitionRow>,
    actions: Vec<ActionDefinitionRow>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
    failures: Mutex<HashSet<StoreOp>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: Seed) -> Self {
        let now = Utc::now();
        let mut state = State {
            triggers: seed.triggers,
            actions: seed.actions,
            ..State::default()
        };

        state.templates = seed
            .templates
            .into_iter()
            .map(|t| TemplateRow {
                id: Uuid::new_v4(),
                name: t.name,
                description: t.description,
                category: t.category,
                tags: t.tags,
                workflow_nodes: t.workflow_nodes,
                usage_count: t.usage_count,
                created_at: now,
            })
            .collect();

        state.automations = seed
            .automations
            .into_iter()
            .map(|new| new_row(new, now))
            .collect();

        Self {
            state: RwLock::new(state),
            failures: Mutex::default(),
        }
    }

    /// Make every subsequent call of `op` fail until cleared.
    pub fn fail_on(&self, op: StoreOp) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(op);
    }

    pub fn clear_failures(&self) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn check(&self, op: StoreOp) -> Result<(), DbError> {
        let failing = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&op);
        if failing {
            debug!(%op, "injected store failure");
            return Err(DbError::Injected(op));
        }
        Ok(())
    }
}

fn new_row(new: NewAutomation, now: chrono::DateTime<Utc>) -> AutomationRow {
    AutomationRow {
        id: Uuid::new_v4(),
        name: new.name,
        description: new.description,
        status: new.status,
        category: new.category,
        tags: new.tags,
        created_by: new.created_by,
        workflow_nodes: new.workflow_nodes,
        runs_count: 0,
        success_count: 0,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl AutomationStore for MemoryStore {
    async fn list(&self) -> Result<Vec<AutomationRow>, DbError> {
        self.check(StoreOp::List)?;
        let state = self.state.read().await;
        Ok(state.automations.iter().rev().cloned().collect())
    }

    async fn get(&self, id: Uuid) -> Result<AutomationRow, DbError> {
        self.check(StoreOp::Get)?;
        let state = self.state.read().await;
        state
            .automations
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or(DbError::NotFound)
    }

    async fn create(&self, new: NewAutomation) -> Result<AutomationRow, DbError> {
        self.check(StoreOp::Create)?;
        let row = new_row(new, Utc::now());
        self.state.write().await.automations.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: AutomationPatch) -> Result<AutomationRow, DbError> {
        self.check(StoreOp::Update)?;
        let mut state = self.state.write().await;
        let row = state
            .automations
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(DbError::NotFound)?;
        patch.apply_to(row);
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        self.check(StoreOp::Delete)?;
        let mut state = self.state.write().await;
        let before = state.automations.len();
        state.automations.retain(|row| row.id != id);
        if state.automations.len() == before {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn list_templates(&self) -> Result<Vec<TemplateRow>, DbError> {
        self.check(StoreOp::ListTemplates)?;
        let mut templates = self.state.read().await.templates.clone();
        templates.sort_by(|a, b| {
            b.usage_count
                .cmp(&a.usage_count)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(templates)
    }

    async fn instantiate_template(
        &self,
        template_id: Uuid,
        new: NewAutomation,
    ) -> Result<AutomationRow, DbError> {
        // Both checks run before anything is written.
        self.check(StoreOp::InstantiateTemplate)?;
        self.check(StoreOp::IncrementTemplateUsage)?;

        let mut state = self.state.write().await;
        let template_idx = state
            .templates
            .iter()
            .position(|t| t.id == template_id)
            .ok_or(DbError::NotFound)?;

        let row = new_row(new, Utc::now());
        state.automations.push(row.clone());
        state.templates[template_idx].usage_count += 1;
        Ok(row)
    }
}

#[async_trait]
impl DefinitionRegistry for MemoryStore {
    async fn triggers(&self) -> Result<Vec<TriggerDefinitionRow>, DbError> {
        self.check(StoreOp::ListTriggers)?;
        let mut rows: Vec<_> = self
            .state
            .read()
            .await
            .triggers
            .iter()
            .filter(|row| row.is_active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(rows)
    }

    async fn actions(&self) -> Result<Vec<ActionDefinitionRow>, DbError> {
        self.check(StoreOp::ListActions)?;
        let mut rows: Vec<_> = self
            .state
            .read()
            .await
            .actions
            .iter()
            .filter(|row| row.is_active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(rows)
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_automation(name: &str) -> NewAutomation {
        NewAutomation {
            name: name.into(),
            description: String::new(),
            status: "Draft".into(),
            category: "Sales".into(),
            tags: vec!["onboarding".into()],
            created_by: "admin".into(),
            workflow_nodes: json!([{ "id": "n1", "type": "trigger" }]),
        }
    }

    fn seeded_with_template() -> (MemoryStore, Uuid) {
        let store = MemoryStore::with_seed(Seed {
            templates: vec![SeedTemplate {
                name: "Welcome Series".into(),
                description: String::new(),
                category: "Leads".into(),
                tags: vec![],
                workflow_nodes: json!([]),
                usage_count: 4,
            }],
            ..Seed::default()
        });
        let id = store.state.try_read().unwrap().templates[0].id;
        (store, id)
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryStore::new();
        store.create(new_automation("first")).await.unwrap();
        store.create(new_automation("second")).await.unwrap();

        let names: Vec<String> = store.list().await.unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn create_assigns_id_and_zeroes_counters() {
        let store = MemoryStore::new();
        let row = store.create(new_automation("x")).await.unwrap();
        assert_eq!(row.runs_count, 0);
        assert_eq!(row.success_count, 0);
        assert_eq!(store.get(row.id).await.unwrap(), row);
    }

    #[tokio::test]
    async fn update_merges_only_present_fields() {
        let store = MemoryStore::new();
        let row = store.create(new_automation("x")).await.unwrap();

        let updated = store
            .update(row.id, AutomationPatch::status("Active"))
            .await
            .unwrap();
        assert_eq!(updated.status, "Active");
        assert_eq!(updated.name, "x");
        assert_eq!(updated.workflow_nodes, row.workflow_nodes);
    }

    #[tokio::test]
    async fn missing_rows_report_not_found() {
        let store = MemoryStore::new();
        let ghost = Uuid::new_v4();
        assert!(matches!(store.get(ghost).await, Err(DbError::NotFound)));
        assert!(matches!(store.delete(ghost).await, Err(DbError::NotFound)));
        assert!(matches!(
            store.update(ghost, AutomationPatch::default()).await,
            Err(DbError::NotFound)
        ));
    }

    #[tokio::test]
    async fn injected_failure_is_returned_until_cleared() {
        let store = MemoryStore::new();
        store.fail_on(StoreOp::Create);
        assert!(matches!(
            store.create(new_automation("x")).await,
            Err(DbError::Injected(StoreOp::Create))
        ));

        store.clear_failures();
        assert!(store.create(new_automation("x")).await.is_ok());
    }

    #[tokio::test]
    async fn instantiate_template_writes_both_or_neither() {
        let (store, template_id) = seeded_with_template();

        store.fail_on(StoreOp::IncrementTemplateUsage);
        assert!(store
            .instantiate_template(template_id, new_automation("from template"))
            .await
            .is_err());
        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(store.list_templates().await.unwrap()[0].usage_count, 4);

        store.clear_failures();
        store
            .instantiate_template(template_id, new_automation("from template"))
            .await
            .unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert_eq!(store.list_templates().await.unwrap()[0].usage_count, 5);
    }

    #[tokio::test]
    async fn instantiate_unknown_template_inserts_nothing() {
        let (store, _) = seeded_with_template();
        let result = store
            .instantiate_template(Uuid::new_v4(), new_automation("x"))
            .await;
        assert!(matches!(result, Err(DbError::NotFound)));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn registry_returns_active_definitions_by_category() {
        let trigger = |id: &str, category: &str, active: bool| TriggerDefinitionRow {
            id: id.into(),
            name: id.into(),
            display_name: id.into(),
            description: String::new(),
            event_name: format!("{id}.fired"),
            event_schema: json!([]),
            category: category.into(),
            icon: String::new(),
            is_active: active,
        };
        let store = MemoryStore::with_seed(Seed {
            triggers: vec![
                trigger("b", "Sales", true),
                trigger("a", "Leads", true),
                trigger("off", "Alpha", false),
            ],
            ..Seed::default()
        });

        let ids: Vec<String> = store.triggers().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
