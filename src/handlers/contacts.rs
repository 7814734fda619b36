//! Contact CRUD handlers: create, list, read, update, delete, birthdays.

use crate::error::AppError;
use crate::extractors::{ContactId, ValidJson};
use crate::schema::{filter_from_query, ContactRequest, ContactResponse, ContactUpdate};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<ContactRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new = body.validate(today())?;
    let contact = state.store.insert(new).await?;
    Ok((StatusCode::CREATED, Json(ContactResponse::from(contact))))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<ContactResponse>>, AppError> {
    let filter = filter_from_query(&params)?;
    let rows = state.store.list(&filter).await?;
    Ok(Json(rows.into_iter().map(ContactResponse::from).collect()))
}

/// Upcoming-birthday lookup is not provided; always an empty list.
pub async fn birthdays() -> Json<Vec<ContactResponse>> {
    Json(Vec::new())
}

pub async fn read(
    State(state): State<AppState>,
    ContactId(id): ContactId,
) -> Result<Json<ContactResponse>, AppError> {
    let contact = state.store.find_by_id(id).await?;
    Ok(Json(contact.into()))
}

pub async fn update(
    State(state): State<AppState>,
    ContactId(id): ContactId,
    ValidJson(body): ValidJson<ContactUpdate>,
) -> Result<Json<ContactResponse>, AppError> {
    let changes = body.validate(today())?;
    let contact = state.store.update(id, changes).await?;
    Ok(Json(contact.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    ContactId(id): ContactId,
) -> Result<StatusCode, AppError> {
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
