//! `api` crate: HTTP REST API over the automations page and the
//! definition registry.
//!
//! Exposes:
//!   GET    /api/v1/automations?search&status&category
//!   POST   /api/v1/automations
//!   GET    /api/v1/automations/analytics
//!   GET    /api/v1/automations/:id
//!   PUT    /api/v1/automations/:id
//!   DELETE /api/v1/automations/:id
//!   POST   /api/v1/automations/:id/toggle
//!   POST   /api/v1/automations/:id/duplicate
//!   GET    /api/v1/templates
//!   POST   /api/v1/templates/:id/instantiate
//!   GET    /api/v1/definitions/triggers?search&category
//!   GET    /api/v1/definitions/actions?search&category

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use builder::AutomationsPage;
use db::{AutomationStore, DefinitionRegistry};

pub mod error;
pub mod handlers;

pub use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AutomationStore>,
    pub registry: Arc<dyn DefinitionRegistry>,
}

impl AppState {
    pub fn new(store: Arc<dyn AutomationStore>, registry: Arc<dyn DefinitionRegistry>) -> Self {
        Self { store, registry }
    }

    /// A page controller for one request.
    pub fn page(&self) -> AutomationsPage {
        AutomationsPage::new(Arc::clone(&self.store))
    }
}

pub fn router(state: AppState) -> Router {
    use handlers::{automations, definitions, templates};

    Router::new()
        .route("/api/v1/automations", get(automations::list).post(automations::create))
        .route("/api/v1/automations/analytics", get(automations::analytics))
        .route(
            "/api/v1/automations/:id",
            get(automations::get)
                .put(automations::update)
                .delete(automations::delete),
        )
        .route("/api/v1/automations/:id/toggle", post(automations::toggle))
        .route("/api/v1/automations/:id/duplicate", post(automations::duplicate))
        .route("/api/v1/templates", get(templates::list))
        .route("/api/v1/templates/:id/instantiate", post(templates::instantiate))
        .route("/api/v1/definitions/triggers", get(definitions::triggers))
        .route("/api/v1/definitions/actions", get(definitions::actions))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await
}

#[cfg(test)]
mod router_tests;
