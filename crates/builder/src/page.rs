//! The automations page: list, filters, rollups, and every write the page
//! can trigger against the store.
//!
//! The page keeps a local copy of the list.  Writes go to the store first
//! and only touch the local copy once the store has accepted them.  Read
//! failures are logged and leave the page empty; write failures are logged
//! and returned to the caller.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use db::models::AutomationPatch;
use db::{AutomationStore, DbError};

use crate::models::{Automation, AutomationDraft, AutomationStatus, AutomationTemplate};
use crate::BuilderError;

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Search box plus the status and category dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: Option<AutomationStatus>,
    #[serde(default)]
    pub category: Option<String>,
}

impl AutomationFilter {
    /// Case-insensitive search over name, description and tags, AND the
    /// status and category dropdowns when set.
    pub fn admits(&self, automation: &Automation) -> bool {
        let term = self.search.trim().to_lowercase();
        let term_matches = term.is_empty()
            || automation.name.to_lowercase().contains(&term)
            || automation.description.to_lowercase().contains(&term)
            || automation.tags.iter().any(|t| t.to_lowercase().contains(&term));

        let status_matches = self.status.map_or(true, |s| s == automation.status);
        let category_matches = self
            .category
            .as_deref()
            .map_or(true, |c| c == automation.category);

        term_matches && status_matches && category_matches
    }
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

/// The stat tiles above the list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Analytics {
    pub total: usize,
    pub active: usize,
    pub paused: usize,
    pub draft: usize,
    pub total_runs: i64,
    pub total_successes: i64,
    /// Percent of runs that succeeded; 0 when nothing has run.
    pub success_rate: f64,
}

impl Analytics {
    pub fn compute(automations: &[Automation]) -> Self {
        let count = |status: AutomationStatus| automations.iter().filter(|a| a.status == status).count();
        let total_runs: i64 = automations.iter().map(|a| a.runs_count).sum();
        let total_successes: i64 = automations.iter().map(|a| a.success_count).sum();
        let success_rate = if total_runs > 0 {
            total_successes as f64 * 100.0 / total_runs as f64
        } else {
            0.0
        };

        Self {
            total: automations.len(),
            active: count(AutomationStatus::Active),
            paused: count(AutomationStatus::Paused),
            draft: count(AutomationStatus::Draft),
            total_runs,
            total_successes,
            success_rate,
        }
    }
}

// ---------------------------------------------------------------------------
// AutomationsPage
// ---------------------------------------------------------------------------

pub struct AutomationsPage {
    store: Arc<dyn AutomationStore>,
    automations: Vec<Automation>,
    templates: Vec<AutomationTemplate>,
    filter: AutomationFilter,
}

impl AutomationsPage {
    /// An empty page; call [`AutomationsPage::refresh`] to populate it.
    pub fn new(store: Arc<dyn AutomationStore>) -> Self {
        Self {
            store,
            automations: Vec::new(),
            templates: Vec::new(),
            filter: AutomationFilter::default(),
        }
    }

    /// Reload the list from the store, newest first.  Rows that cannot be
    /// decoded are skipped.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) {
        self.automations = match self.store.list().await {
            Ok(rows) => rows
                .into_iter()
                .filter_map(|row| match Automation::try_from(row) {
                    Ok(a) => Some(a),
                    Err(e) => {
                        warn!("skipping automation: {e}");
                        None
                    }
                })
                .collect(),
            Err(e) => {
                warn!("failed to load automations: {e}");
                Vec::new()
            }
        };
    }

    pub fn automations(&self) -> &[Automation] {
        &self.automations
    }

    pub fn get(&self, id: Uuid) -> Option<&Automation> {
        self.automations.iter().find(|a| a.id == id)
    }

    // ------------------------------------------------------------------
    // Filters and rollups
    // ------------------------------------------------------------------

    pub fn filter(&self) -> &AutomationFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: AutomationFilter) {
        self.filter = filter;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    pub fn set_status_filter(&mut self, status: Option<AutomationStatus>) {
        self.filter.status = status;
    }

    pub fn set_category_filter(&mut self, category: Option<String>) {
        self.filter.category = category;
    }

    pub fn visible(&self) -> Vec<&Automation> {
        self.automations
            .iter()
            .filter(|a| self.filter.admits(a))
            .collect()
    }

    /// Distinct non-empty categories of the loaded automations, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self
            .automations
            .iter()
            .map(|a| a.category.as_str())
            .filter(|c| !c.is_empty())
            .collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Rollups over every loaded automation, ignoring the filters.
    pub fn analytics(&self) -> Analytics {
        Analytics::compute(&self.automations)
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    #[instrument(skip(self, draft), fields(name = %draft.metadata.name))]
    pub async fn create(&mut self, draft: &AutomationDraft) -> Result<Automation, BuilderError> {
        draft.validate()?;
        let new = draft.to_new_automation()?;

        let row = self.store.create(new).await.map_err(|e| {
            error!("failed to create automation: {e}");
            BuilderError::from(e)
        })?;
        let automation = Automation::try_from(row)?;

        info!(id = %automation.id, "automation created");
        self.automations.insert(0, automation.clone());
        Ok(automation)
    }

    #[instrument(skip(self, draft))]
    pub async fn update(&mut self, id: Uuid, draft: &AutomationDraft) -> Result<Automation, BuilderError> {
        draft.validate()?;
        self.write_patch(id, draft.to_patch()?).await
    }

    /// Flip Active ↔ Paused (a Draft becomes Active).  Only the status is
    /// sent to the store.
    #[instrument(skip(self))]
    pub async fn toggle_status(&mut self, id: Uuid) -> Result<Automation, BuilderError> {
        let current = self.load(id).await?;
        let next = current.status.toggled();
        self.write_patch(id, AutomationPatch::status(next.to_string())).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&mut self, id: Uuid) -> Result<(), BuilderError> {
        self.store.delete(id).await.map_err(|e| write_error(id, "delete", e))?;
        info!(%id, "automation deleted");
        self.automations.retain(|a| a.id != id);
        Ok(())
    }

    /// Copy an automation as `"<name> (Copy)"`: status `Draft`, counters at
    /// zero, node graph unchanged.
    #[instrument(skip(self))]
    pub async fn duplicate(&mut self, id: Uuid) -> Result<Automation, BuilderError> {
        let source = self.load(id).await?;

        let mut draft = source.draft();
        draft.metadata.name = format!("{} (Copy)", source.name);
        draft.metadata.status = AutomationStatus::Draft;

        let row = self
            .store
            .create(draft.to_new_automation()?)
            .await
            .map_err(|e| write_error(id, "duplicate", e))?;
        let copy = Automation::try_from(row)?;

        info!(source = %id, id = %copy.id, "automation duplicated");
        self.automations.insert(0, copy.clone());
        Ok(copy)
    }

    // ------------------------------------------------------------------
    // Templates
    // ------------------------------------------------------------------

    /// Reload and return the templates, most used first.  A failed read
    /// yields an empty list.
    #[instrument(skip(self))]
    pub async fn templates(&mut self) -> &[AutomationTemplate] {
        self.templates = match self.store.list_templates().await {
            Ok(rows) => rows
                .into_iter()
                .filter_map(|row| match AutomationTemplate::try_from(row) {
                    Ok(t) => Some(t),
                    Err(e) => {
                        warn!("skipping template: {e}");
                        None
                    }
                })
                .collect(),
            Err(e) => {
                warn!("failed to load templates: {e}");
                Vec::new()
            }
        };
        &self.templates
    }

    /// Create a `Draft` automation from a template and bump its usage
    /// count, as one store write.
    #[instrument(skip(self, created_by))]
    pub async fn instantiate_template(
        &mut self,
        template_id: Uuid,
        created_by: &str,
    ) -> Result<Automation, BuilderError> {
        let template = match self.templates.iter().find(|t| t.id == template_id) {
            Some(t) => t.clone(),
            None => {
                self.templates().await;
                self.templates
                    .iter()
                    .find(|t| t.id == template_id)
                    .cloned()
                    .ok_or(BuilderError::TemplateNotFound(template_id))?
            }
        };

        let new = template.instantiate(created_by)?;
        let row = self
            .store
            .instantiate_template(template_id, new)
            .await
            .map_err(|e| match e {
                DbError::NotFound => BuilderError::TemplateNotFound(template_id),
                e => {
                    error!(%template_id, "failed to instantiate template: {e}");
                    BuilderError::from(e)
                }
            })?;
        let automation = Automation::try_from(row)?;

        info!(%template_id, id = %automation.id, "automation created from template");
        if let Some(t) = self.templates.iter_mut().find(|t| t.id == template_id) {
            t.usage_count += 1;
        }
        self.automations.insert(0, automation.clone());
        Ok(automation)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// The automation from the local list, or from the store when the page
    /// has not loaded it.
    async fn load(&self, id: Uuid) -> Result<Automation, BuilderError> {
        if let Some(a) = self.get(id) {
            return Ok(a.clone());
        }
        let row = self.store.get(id).await.map_err(|e| match e {
            DbError::NotFound => BuilderError::AutomationNotFound(id),
            e => {
                warn!(%id, "failed to load automation: {e}");
                BuilderError::from(e)
            }
        })?;
        Automation::try_from(row)
    }

    async fn write_patch(&mut self, id: Uuid, patch: AutomationPatch) -> Result<Automation, BuilderError> {
        let row = self
            .store
            .update(id, patch)
            .await
            .map_err(|e| write_error(id, "update", e))?;
        let updated = Automation::try_from(row)?;

        info!(%id, status = %updated.status, "automation updated");
        match self.automations.iter_mut().find(|a| a.id == id) {
            Some(slot) => *slot = updated.clone(),
            None => self.automations.insert(0, updated.clone()),
        }
        Ok(updated)
    }
}

fn write_error(id: Uuid, op: &str, e: DbError) -> BuilderError {
    match e {
        DbError::NotFound => BuilderError::AutomationNotFound(id),
        e => {
            error!(%id, "failed to {op} automation: {e}");
            BuilderError::from(e)
        }
    }
}
