//! Trigger and action catalog browsers.
//!
//! A selector loads the active definitions from the registry once per
//! open, then narrows them with a search term and a category chip.
//! Picking a card commits immediately; there is no confirm step.

use async_trait::async_trait;
use tracing::{debug, warn};

use db::DefinitionRegistry;
use nodes::{ActionDefinition, Icon, TriggerDefinition};

use crate::catalog::{action_from_row, trigger_from_row};
use crate::BuilderError;

/// A definition a selector can list.
#[async_trait]
pub trait CatalogEntry: Clone + Send + Sync + Sized {
    /// Human label used in log lines.
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn display_name(&self) -> &str;
    fn description(&self) -> &str;
    /// The third searchable field: `event_name` or `action_type`.
    fn search_field(&self) -> &str;
    fn category(&self) -> &str;
    fn icon(&self) -> Icon;

    /// Fetch the active set from the registry, ordered by category.
    async fn fetch(registry: &dyn DefinitionRegistry) -> Result<Vec<Self>, BuilderError>;
}

#[async_trait]
impl CatalogEntry for TriggerDefinition {
    const KIND: &'static str = "trigger";

    fn id(&self) -> &str {
        &self.id
    }
    fn display_name(&self) -> &str {
        &self.display_name
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn search_field(&self) -> &str {
        &self.event_name
    }
    fn category(&self) -> &str {
        &self.category
    }
    fn icon(&self) -> Icon {
        TriggerDefinition::icon(self)
    }

    async fn fetch(registry: &dyn DefinitionRegistry) -> Result<Vec<Self>, BuilderError> {
        let mut definitions = Vec::new();
        for row in registry.triggers().await? {
            match trigger_from_row(row) {
                Ok(def) => definitions.push(def),
                Err(e) => warn!("skipping unreadable trigger definition: {e}"),
            }
        }
        Ok(definitions)
    }
}

#[async_trait]
impl CatalogEntry for ActionDefinition {
    const KIND: &'static str = "action";

    fn id(&self) -> &str {
        &self.id
    }
    fn display_name(&self) -> &str {
        &self.display_name
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn search_field(&self) -> &str {
        &self.action_type
    }
    fn category(&self) -> &str {
        &self.category
    }
    fn icon(&self) -> Icon {
        ActionDefinition::icon(self)
    }

    async fn fetch(registry: &dyn DefinitionRegistry) -> Result<Vec<Self>, BuilderError> {
        Ok(registry.actions().await?.into_iter().map(action_from_row).collect())
    }
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// The category chip row: an implicit "All" plus one chip per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Parse a chip label; `"All"` and the empty string select everything.
    pub fn from_label(label: &str) -> Self {
        match label {
            "" | "All" => Self::All,
            other => Self::Named(other.to_owned()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Named(name) => name,
        }
    }

    fn admits(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == category,
        }
    }
}

/// Whether `entry` is visible for the given search term and category.
///
/// The term matches case-insensitively as a substring of the display
/// name, the description, or the type-specific search field.  An empty
/// term matches everything.
pub fn matches<D: CatalogEntry>(entry: &D, search: &str, category: &CategoryFilter) -> bool {
    let term = search.to_lowercase();
    let term_matches = term.is_empty()
        || [entry.display_name(), entry.description(), entry.search_field()]
            .iter()
            .any(|field| field.to_lowercase().contains(&term));

    term_matches && category.admits(entry.category())
}

/// Result of interacting with a selector.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorOutcome<D> {
    Selected(D),
    Cancelled,
}

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// A searchable, category-filtered list of catalog definitions.
#[derive(Debug, Clone)]
pub struct Selector<D> {
    definitions: Vec<D>,
    search: String,
    category: CategoryFilter,
    loading: bool,
}

pub type TriggerSelector = Selector<TriggerDefinition>;
pub type ActionSelector = Selector<ActionDefinition>;

impl<D: CatalogEntry> Default for Selector<D> {
    fn default() -> Self {
        Self {
            definitions: Vec::new(),
            search: String::new(),
            category: CategoryFilter::All,
            loading: true,
        }
    }
}

impl<D: CatalogEntry> Selector<D> {
    /// An empty selector waiting for [`Selector::load`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A selector over an already-fetched list.
    pub fn with_definitions(definitions: Vec<D>) -> Self {
        Self {
            definitions,
            loading: false,
            ..Self::default()
        }
    }

    /// Fetch the active definitions.  A failed fetch is logged and leaves
    /// the list empty; the selector stays usable.
    pub async fn load(&mut self, registry: &dyn DefinitionRegistry) {
        self.loading = true;
        match D::fetch(registry).await {
            Ok(definitions) => {
                debug!(kind = D::KIND, count = definitions.len(), "definitions loaded");
                self.definitions = definitions;
            }
            Err(e) => {
                warn!(kind = D::KIND, "failed to load definitions: {e}");
                self.definitions.clear();
            }
        }
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn definitions(&self) -> &[D] {
        &self.definitions
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
    }

    /// The chip row: `All`, then each distinct category in registry order.
    pub fn categories(&self) -> Vec<CategoryFilter> {
        let mut chips = vec![CategoryFilter::All];
        for def in &self.definitions {
            let chip = CategoryFilter::Named(def.category().to_owned());
            if !chips.contains(&chip) {
                chips.push(chip);
            }
        }
        chips
    }

    /// Definitions passing the current search term and category chip.
    pub fn visible(&self) -> Vec<&D> {
        self.definitions
            .iter()
            .filter(|def| matches(*def, &self.search, &self.category))
            .collect()
    }

    /// Commit the card with `id`.  `None` if no such card is listed.
    pub fn select(&self, id: &str) -> Option<SelectorOutcome<D>> {
        self.definitions
            .iter()
            .find(|def| def.id() == id)
            .map(|def| SelectorOutcome::Selected(def.clone()))
    }

    pub fn cancel(&self) -> SelectorOutcome<D> {
        SelectorOutcome::Cancelled
    }
}
