//! The persisted contact record and the shapes the store accepts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A stored contact row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone_number: String,
    pub birthday: Option<NaiveDate>,
    pub bio: Option<String>,
}

/// A validated contact about to be inserted; the store assigns `id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone_number: String,
    pub birthday: Option<NaiveDate>,
    pub bio: Option<String>,
}

/// Sparse set of column overwrites. `None` leaves the column untouched;
/// `Some(None)` on a nullable column clears it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactChanges {
    pub first_name: Option<String>,
    pub last_name: Option<Option<String>>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub birthday: Option<Option<NaiveDate>>,
    pub bio: Option<Option<String>>,
}

impl ContactChanges {
    pub fn is_empty(&self) -> bool {
        self == &ContactChanges::default()
    }
}

/// Equality filters for listing; ANDed together, unset ones are skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl ContactFilter {
    pub fn matches(&self, c: &Contact) -> bool {
        self.first_name.as_ref().map_or(true, |v| *v == c.first_name)
            && self.last_name.as_ref().map_or(true, |v| c.last_name.as_ref() == Some(v))
            && self.email.as_ref().map_or(true, |v| *v == c.email)
    }
}

impl Contact {
    pub fn from_new(id: i64, new: NewContact) -> Self {
        Contact {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone_number: new.phone_number,
            birthday: new.birthday,
            bio: new.bio,
        }
    }

    /// Overwrite only the columns present in `changes`.
    pub fn apply(&mut self, changes: ContactChanges) {
        if let Some(v) = changes.first_name {
            self.first_name = v;
        }
        if let Some(v) = changes.last_name {
            self.last_name = v;
        }
        if let Some(v) = changes.email {
            self.email = v;
        }
        if let Some(v) = changes.phone_number {
            self.phone_number = v;
        }
        if let Some(v) = changes.birthday {
            self.birthday = v;
        }
        if let Some(v) = changes.bio {
            self.bio = v;
        }
    }
}
