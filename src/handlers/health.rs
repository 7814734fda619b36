//! Health check backed by a database probe.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

pub const GREETING: &str = "Welcome to FastAPI!";

#[derive(Serialize)]
pub struct HealthBody {
    pub message: &'static str,
}

pub async fn healthchecker(State(state): State<AppState>) -> Result<Json<HealthBody>, AppError> {
    state.store.ping().await?;
    Ok(Json(HealthBody { message: GREETING }))
}
