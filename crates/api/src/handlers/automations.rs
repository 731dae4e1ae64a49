use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use builder::{Analytics, Automation, AutomationDraft, AutomationFilter, AutomationStatus, BuilderError};
use db::AutomationStore;
use super::AppState;
use crate::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    /// `Draft`, `Active`, `Paused`, or `All` / absent for every status.
    pub status: Option<String>,
    pub category: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> Result<AutomationFilter, ApiError> {
        let status = match self.status.as_deref() {
            None | Some("") | Some("All") => None,
            Some(s) => Some(s.parse::<AutomationStatus>().map_err(ApiError::BadRequest)?),
        };
        let category = self.category.filter(|c| !c.is_empty() && c != "All");

        Ok(AutomationFilter {
            search: self.search.unwrap_or_default(),
            status,
            category,
        })
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Automation>>, ApiError> {
    let filter = query.into_filter()?;
    let mut page = state.page();
    page.refresh().await;
    page.set_filter(filter);
    Ok(Json(page.visible().into_iter().cloned().collect()))
}

pub async fn analytics(State(state): State<AppState>) -> Json<Analytics> {
    let mut page = state.page();
    page.refresh().await;
    Json(page.analytics())
}

pub async fn get(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Automation>, ApiError> {
    let row = state.store.get(id).await.map_err(|e| match e {
        db::DbError::NotFound => BuilderError::AutomationNotFound(id),
        e => BuilderError::from(e),
    })?;
    Ok(Json(Automation::try_from(row)?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<AutomationDraft>,
) -> Result<(StatusCode, Json<Automation>), ApiError> {
    let automation = state.page().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(automation)))
}

pub async fn update(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(draft): Json<AutomationDraft>,
) -> Result<Json<Automation>, ApiError> {
    Ok(Json(state.page().update(id, &draft).await?))
}

pub async fn delete(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state.page().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Automation>, ApiError> {
    Ok(Json(state.page().toggle_status(id).await?))
}

pub async fn duplicate(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Automation>), ApiError> {
    let copy = state.page().duplicate(id).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}
