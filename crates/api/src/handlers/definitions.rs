use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use builder::{CatalogEntry, CategoryFilter, Selector};
use db::DefinitionRegistry;
use nodes::{ActionDefinition, TriggerDefinition};
use super::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub search: String,
    /// A category chip label; `All` or absent for every category.
    #[serde(default)]
    pub category: String,
}

/// Load the active set and apply the selector's search and category
/// filter.  A failed registry read yields an empty list.
async fn filtered<D: CatalogEntry>(registry: &dyn DefinitionRegistry, query: CatalogQuery) -> Vec<D> {
    let mut selector = Selector::<D>::new();
    selector.load(registry).await;
    selector.set_search(query.search);
    selector.set_category(CategoryFilter::from_label(&query.category));
    selector.visible().into_iter().cloned().collect()
}

pub async fn triggers(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<Vec<TriggerDefinition>> {
    Json(filtered(state.registry.as_ref(), query).await)
}

pub async fn actions(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<Vec<ActionDefinition>> {
    Json(filtered(state.registry.as_ref(), query).await)
}
