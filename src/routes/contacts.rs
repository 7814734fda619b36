//! Contact routes. Static segments (`healthchecker`, `birthdays`) win over `:id`.

use crate::handlers::contacts::{birthdays, create, delete, list, read, update};
use crate::handlers::health::healthchecker;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn contacts_router(state: AppState) -> Router {
    Router::new()
        .route("/contacts/healthchecker", get(healthchecker))
        .route("/contacts", get(list).post(create))
        .route("/contacts/", get(list).post(create))
        .route("/contacts/birthdays", get(birthdays))
        .route("/contacts/:id", get(read).put(update).delete(delete))
        .with_state(state)
}
