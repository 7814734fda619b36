//! Inbound and outbound contact shapes.
//!
//! Inbound shapes are deserialized from request bodies and then checked with
//! [`ContactRequest::validate`] / [`ContactUpdate::validate`], which turn them
//! into the store's [`NewContact`] / [`ContactChanges`]. The outbound
//! [`ContactResponse`] always carries every field.

use crate::error::AppError;
use crate::model::{Contact, ContactChanges, ContactFilter, NewContact};
use crate::validation::{check_birthday, check_email, check_email_filter, check_length};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Body of `POST /contacts/`.
#[derive(Clone, Debug, Deserialize)]
pub struct ContactRequest {
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    pub phone_number: String,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Body of `PUT /contacts/{id}`. The outer `Option` is presence, the inner one nullability.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ContactUpdate {
    #[serde(default, deserialize_with = "present")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub birthday: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present")]
    pub bio: Option<Option<String>>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone_number: String,
    pub birthday: Option<NaiveDate>,
    pub bio: Option<String>,
}

impl From<Contact> for ContactResponse {
    fn from(c: Contact) -> Self {
        ContactResponse {
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            email: c.email,
            phone_number: c.phone_number,
            birthday: c.birthday,
            bio: c.bio,
        }
    }
}

const BIO_MAX: usize = 400;

fn check_first_name(v: &str) -> Result<(), AppError> {
    check_length("first_name", v, 2, 30)
}

fn check_last_name(v: &str) -> Result<(), AppError> {
    check_length("last_name", v, 2, 40)
}

fn check_phone(v: &str) -> Result<(), AppError> {
    check_length("phone_number", v, 3, 20)
}

fn check_bio(v: &str) -> Result<(), AppError> {
    check_length("bio", v, 0, BIO_MAX)
}

fn required<T>(field: &str, v: Option<T>) -> Result<T, AppError> {
    v.ok_or_else(|| AppError::validation(field, "must not be null"))
}

impl ContactRequest {
    pub fn validate(self, today: NaiveDate) -> Result<NewContact, AppError> {
        check_first_name(&self.first_name)?;
        if let Some(v) = &self.last_name {
            check_last_name(v)?;
        }
        check_email("email", &self.email)?;
        check_phone(&self.phone_number)?;
        if let Some(d) = self.birthday {
            check_birthday("birthday", d, today)?;
        }
        if let Some(v) = &self.bio {
            check_bio(v)?;
        }
        Ok(NewContact {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            birthday: self.birthday,
            bio: self.bio,
        })
    }
}

impl ContactUpdate {
    /// Only fields present in the body are checked; `null` clears optional fields.
    pub fn validate(self, today: NaiveDate) -> Result<ContactChanges, AppError> {
        let mut changes = ContactChanges::default();
        if let Some(v) = self.first_name {
            let v = required("first_name", v)?;
            check_first_name(&v)?;
            changes.first_name = Some(v);
        }
        if let Some(v) = self.last_name {
            if let Some(s) = &v {
                check_last_name(s)?;
            }
            changes.last_name = Some(v);
        }
        if let Some(v) = self.email {
            let v = required("email", v)?;
            check_email("email", &v)?;
            changes.email = Some(v);
        }
        if let Some(v) = self.phone_number {
            let v = required("phone_number", v)?;
            check_phone(&v)?;
            changes.phone_number = Some(v);
        }
        if let Some(v) = self.birthday {
            if let Some(d) = v {
                check_birthday("birthday", d, today)?;
            }
            changes.birthday = Some(v);
        }
        if let Some(v) = self.bio {
            if let Some(s) = &v {
                check_bio(s)?;
            }
            changes.bio = Some(v);
        }
        Ok(changes)
    }
}

/// Build the list filter from query parameters. Unknown keys are ignored; empty values are treated as unset.
pub fn filter_from_query(params: &HashMap<String, String>) -> Result<ContactFilter, AppError> {
    let get = |k: &str| params.get(k).filter(|v| !v.is_empty()).cloned();
    let filter = ContactFilter {
        first_name: get("first_name"),
        last_name: get("last_name"),
        email: get("email"),
    };
    if let Some(email) = &filter.email {
        check_email_filter("email", email)?;
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn field_of(e: AppError) -> String {
        match e {
            AppError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn request(v: serde_json::Value) -> ContactRequest {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn create_accepts_minimal_body() {
        let new = request(json!({
            "first_name": "Ann",
            "email": "ann@x.com",
            "phone_number": "123"
        }))
        .validate(today())
        .unwrap();
        assert_eq!(new.last_name, None);
        assert_eq!(new.birthday, None);
        assert_eq!(new.bio, None);
    }

    #[test]
    fn create_requires_email() {
        let r: Result<ContactRequest, _> = serde_json::from_value(json!({
            "first_name": "Ann",
            "phone_number": "123"
        }));
        assert!(r.is_err());
    }

    #[test]
    fn create_rejects_future_birthday() {
        let e = request(json!({
            "first_name": "Ann",
            "email": "ann@x.com",
            "phone_number": "123",
            "birthday": "2024-06-02"
        }))
        .validate(today())
        .unwrap_err();
        assert_eq!(field_of(e), "birthday");
    }

    #[test]
    fn create_checks_bio_and_last_name() {
        let base = json!({ "first_name": "Ann", "email": "ann@x.com", "phone_number": "123" });
        let mut long_bio = base.clone();
        long_bio["bio"] = json!("x".repeat(401));
        assert_eq!(field_of(request(long_bio).validate(today()).unwrap_err()), "bio");

        let mut short_last = base;
        short_last["last_name"] = json!("L");
        assert_eq!(field_of(request(short_last).validate(today()).unwrap_err()), "last_name");
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let u: ContactUpdate = serde_json::from_value(json!({ "bio": null, "phone_number": "5550100" })).unwrap();
        let changes = u.validate(today()).unwrap();
        assert_eq!(changes.bio, Some(None));
        assert_eq!(changes.phone_number.as_deref(), Some("5550100"));
        assert_eq!(changes.last_name, None);
        assert_eq!(changes.first_name, None);
    }

    #[test]
    fn update_rejects_null_required_field() {
        let u: ContactUpdate = serde_json::from_value(json!({ "email": null })).unwrap();
        assert_eq!(field_of(u.validate(today()).unwrap_err()), "email");
    }

    #[test]
    fn empty_update_is_no_change() {
        let u: ContactUpdate = serde_json::from_value(json!({})).unwrap();
        assert!(u.validate(today()).unwrap().is_empty());
    }

    #[test]
    fn filter_skips_empty_and_checks_email() {
        let mut q = HashMap::new();
        q.insert("first_name".to_string(), "Ann".to_string());
        q.insert("last_name".to_string(), String::new());
        q.insert("page".to_string(), "2".to_string());
        let f = filter_from_query(&q).unwrap();
        assert_eq!(f.first_name.as_deref(), Some("Ann"));
        assert_eq!(f.last_name, None);

        q.insert("email".to_string(), "not-an-email".to_string());
        assert_eq!(field_of(filter_from_query(&q).unwrap_err()), "email");
    }

    #[test]
    fn response_serializes_every_field() {
        let c = Contact {
            id: 1,
            first_name: "Ann".into(),
            last_name: None,
            email: "ann@x.com".into(),
            phone_number: "123".into(),
            birthday: NaiveDate::from_ymd_opt(2000, 1, 1),
            bio: None,
        };
        let v = serde_json::to_value(ContactResponse::from(c)).unwrap();
        assert_eq!(
            v,
            json!({
                "id": 1,
                "first_name": "Ann",
                "last_name": null,
                "email": "ann@x.com",
                "phone_number": "123",
                "birthday": "2000-01-01",
                "bio": null
            })
        );
    }
}
