//! Mapping of builder errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use builder::BuilderError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Builder(#[from] BuilderError),

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Builder(e) => match e {
                BuilderError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                BuilderError::AutomationNotFound(_)
                | BuilderError::TemplateNotFound(_)
                | BuilderError::NodeNotFound(_)
                | BuilderError::Store(db::DbError::NotFound) => StatusCode::NOT_FOUND,
                BuilderError::Store(_)
                | BuilderError::Encode(_)
                | BuilderError::CorruptRecord { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
