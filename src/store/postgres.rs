//! PostgreSQL-backed contact store.

use super::{duplicate_email, not_found, ContactStore};
use crate::db::{Database, Session};
use crate::error::AppError;
use crate::model::{Contact, ContactChanges, ContactFilter, NewContact};
use crate::sql::{self, QueryBuf};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use std::sync::Arc;

#[derive(Clone)]
pub struct PgContactStore {
    db: Arc<Database>,
}

impl PgContactStore {
    pub fn new(db: Arc<Database>) -> Self {
        PgContactStore { db }
    }

    async fn fetch_optional(session: &mut Session, q: &QueryBuf) -> Result<Option<PgRow>, sqlx::Error> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        query.fetch_optional(&mut **session).await
    }

    async fn fetch_all(session: &mut Session, q: &QueryBuf) -> Result<Vec<PgRow>, sqlx::Error> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        query.fetch_all(&mut **session).await
    }
}

fn decode(row: &PgRow) -> Result<Contact, AppError> {
    Contact::from_row(row).map_err(AppError::from)
}

/// Unique violations become `Conflict`; anything else passes through for status mapping.
fn map_write_err(e: sqlx::Error, email: Option<&str>) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            duplicate_email(email.unwrap_or_default())
        }
        _ => AppError::Db(e),
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.db.ping().await
    }

    async fn find_by_id(&self, id: i64) -> Result<Contact, AppError> {
        let mut session = self.db.session().await?;
        let row = Self::fetch_optional(&mut session, &sql::select_by_id(id))
            .await?
            .ok_or_else(|| not_found(id))?;
        decode(&row)
    }

    async fn list(&self, filter: &ContactFilter) -> Result<Vec<Contact>, AppError> {
        let mut session = self.db.session().await?;
        let rows = Self::fetch_all(&mut session, &sql::select_list(filter)).await?;
        rows.iter().map(decode).collect()
    }

    async fn insert(&self, new: NewContact) -> Result<Contact, AppError> {
        let mut session = self.db.session().await?;
        let row = Self::fetch_optional(&mut session, &sql::insert(&new))
            .await
            .map_err(|e| map_write_err(e, Some(&new.email)))?
            .ok_or_else(|| AppError::Internal("insert returned no row".into()))?;
        let contact = decode(&row)?;
        tracing::info!(id = contact.id, "contact created");
        Ok(contact)
    }

    async fn update(&self, id: i64, changes: ContactChanges) -> Result<Contact, AppError> {
        let mut session = self.db.session().await?;
        let row = Self::fetch_optional(&mut session, &sql::update(id, &changes))
            .await
            .map_err(|e| map_write_err(e, changes.email.as_deref()))?
            .ok_or_else(|| not_found(id))?;
        decode(&row)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut session = self.db.session().await?;
        Self::fetch_optional(&mut session, &sql::delete(id))
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(id, "contact deleted");
        Ok(())
    }
}
