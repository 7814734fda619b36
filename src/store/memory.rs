//! In-process contact store.

use super::{duplicate_email, not_found, ContactStore};
use crate::error::AppError;
use crate::model::{Contact, ContactChanges, ContactFilter, NewContact};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    rows: BTreeMap<i64, Contact>,
    last_id: i64,
}

/// Contacts held in memory. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct MemoryContactStore {
    inner: RwLock<Inner>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inner {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|c| c.email == email && Some(c.id) != except)
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Contact, AppError> {
        self.inner
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn list(&self, filter: &ContactFilter) -> Result<Vec<Contact>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().filter(|c| filter.matches(c)).cloned().collect())
    }

    async fn insert(&self, new: NewContact) -> Result<Contact, AppError> {
        let mut inner = self.inner.write().await;
        if inner.email_taken(&new.email, None) {
            return Err(duplicate_email(&new.email));
        }
        inner.last_id += 1;
        let contact = Contact::from_new(inner.last_id, new);
        inner.rows.insert(contact.id, contact.clone());
        tracing::info!(id = contact.id, "contact created");
        Ok(contact)
    }

    async fn update(&self, id: i64, changes: ContactChanges) -> Result<Contact, AppError> {
        let mut inner = self.inner.write().await;
        if !inner.rows.contains_key(&id) {
            return Err(not_found(id));
        }
        if let Some(email) = &changes.email {
            if inner.email_taken(email, Some(id)) {
                return Err(duplicate_email(email));
            }
        }
        let row = inner.rows.get_mut(&id).ok_or_else(|| not_found(id))?;
        row.apply(changes);
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        inner.rows.remove(&id).ok_or_else(|| not_found(id))?;
        tracing::info!(id, "contact deleted");
        Ok(())
    }
}
