//! Contacts API: a small contact-book REST service on axum and PostgreSQL.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod schema;
pub mod sql;
pub mod state;
pub mod store;
pub mod validation;

pub use config::{Settings, StorageKind};
pub use db::Database;
pub use error::{AppError, ConfigError};
pub use routes::{common_routes, contacts_router};
pub use state::AppState;
pub use store::{ContactStore, MemoryContactStore, PgContactStore};

use axum::{middleware::map_response, Router};
use error::json_error_responses;
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Largest accepted request body.
pub const BODY_LIMIT: usize = 64 * 1024;

async fn fallback() -> AppError {
    AppError::NotFound("route".into())
}

/// Full application router. `api_prefix` is either empty or starts with `/`.
pub fn app(state: AppState, api_prefix: &str) -> Router {
    let contacts = contacts_router(state);
    let api = if api_prefix.is_empty() {
        contacts
    } else {
        Router::new().nest(api_prefix, contacts)
    };
    Router::new()
        .merge(common_routes())
        .merge(api)
        .fallback(fallback)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(map_response(json_error_responses))
        .layer(TraceLayer::new_for_http())
}

/// Build state for the configured backend. Postgres connects lazily on first request.
pub fn state_from_settings(settings: &Settings) -> AppState {
    match settings.storage {
        StorageKind::Postgres => {
            let db = Arc::new(Database::new(settings.database.clone()));
            AppState::new(PgContactStore::new(db))
        }
        StorageKind::Memory => AppState::new(MemoryContactStore::new()),
    }
}
