//! Contact persistence: the `ContactStore` trait and its backends.
//!
//! Handlers depend on the trait only. [`PgContactStore`] runs one statement per
//! call on its own pooled connection; [`MemoryContactStore`] keeps rows in
//! process and applies the same uniqueness rule on `email`.

mod memory;
mod postgres;

pub use memory::MemoryContactStore;
pub use postgres::PgContactStore;

use crate::error::AppError;
use crate::model::{Contact, ContactChanges, ContactFilter, NewContact};
use async_trait::async_trait;

#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Connectivity probe used by the health check.
    async fn ping(&self) -> Result<(), AppError>;

    /// Exact lookup by id. `NotFound` when absent.
    async fn find_by_id(&self, id: i64) -> Result<Contact, AppError>;

    /// All contacts matching every supplied filter, ordered by id. Empty is not an error.
    async fn list(&self, filter: &ContactFilter) -> Result<Vec<Contact>, AppError>;

    /// Persist a new contact and return it with its assigned id. `Conflict` on duplicate email.
    async fn insert(&self, new: NewContact) -> Result<Contact, AppError>;

    /// Overwrite only the supplied columns. `NotFound` when absent, `Conflict` on duplicate email.
    async fn update(&self, id: i64, changes: ContactChanges) -> Result<Contact, AppError>;

    /// Remove a contact. `NotFound` when absent.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

pub(crate) fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("contact {}", id))
}

pub(crate) fn duplicate_email(email: &str) -> AppError {
    AppError::Conflict(format!("a contact with email '{}' already exists", email))
}
