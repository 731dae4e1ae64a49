use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use builder::{Automation, AutomationTemplate};
use super::AppState;
use crate::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct InstantiateTemplateDto {
    #[serde(default)]
    pub created_by: String,
}

pub async fn list(State(state): State<AppState>) -> Json<Vec<AutomationTemplate>> {
    let mut page = state.page();
    Json(page.templates().await.to_vec())
}

pub async fn instantiate(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<InstantiateTemplateDto>,
) -> Result<(StatusCode, Json<Automation>), ApiError> {
    let automation = state
        .page()
        .instantiate_template(id, &payload.created_by)
        .await?;
    Ok((StatusCode::CREATED, Json(automation)))
}
