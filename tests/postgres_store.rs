//! `PgContactStore` against a live PostgreSQL. Needs `DATABASE_URL`; run with
//! `cargo test --test postgres_store -- --ignored`.

use chrono::NaiveDate;
use contacts_api::config::DatabaseSettings;
use contacts_api::model::{ContactChanges, ContactFilter, NewContact};
use contacts_api::{AppError, ContactStore, Database, PgContactStore};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

fn store() -> PgContactStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for postgres tests");
    PgContactStore::new(Arc::new(Database::new(DatabaseSettings {
        url: Some(url),
        ..Default::default()
    })))
}

/// Email unique to this run so reruns do not collide with leftovers.
fn unique_email(tag: &str) -> String {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos() % 1_000_000_000;
    format!("{}{}@pg.test", tag, nanos)
}

fn new_contact(email: &str) -> NewContact {
    NewContact {
        first_name: "Ann".into(),
        last_name: None,
        email: email.into(),
        phone_number: "123".into(),
        birthday: NaiveDate::from_ymd_opt(2000, 1, 1),
        bio: Some("likes tea".into()),
    }
}

#[tokio::test]
#[ignore]
async fn insert_then_find_decodes_every_column() {
    let s = store();
    let email = unique_email("decode");
    let created = s.insert(new_contact(&email)).await.unwrap();
    assert!(created.id >= 1);

    let fetched = s.find_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.last_name, None);
    assert_eq!(fetched.birthday, NaiveDate::from_ymd_opt(2000, 1, 1));
    assert_eq!(fetched.bio.as_deref(), Some("likes tea"));

    let listed = s
        .list(&ContactFilter {
            email: Some(email.clone()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(listed, vec![created.clone()]);

    s.delete(created.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn duplicate_email_maps_to_conflict() {
    let s = store();
    let email = unique_email("dup");
    let first = s.insert(new_contact(&email)).await.unwrap();
    let err = s.insert(new_contact(&email)).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {:?}", err);

    let other = s.insert(new_contact(&unique_email("other"))).await.unwrap();
    let err = s
        .update(
            other.id,
            ContactChanges {
                email: Some(email.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {:?}", err);

    s.delete(first.id).await.unwrap();
    s.delete(other.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn sparse_update_and_delete_twice() {
    let s = store();
    let created = s.insert(new_contact(&unique_email("upd"))).await.unwrap();

    let updated = s
        .update(
            created.id,
            ContactChanges {
                phone_number: Some("555-0100".into()),
                birthday: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.phone_number, "555-0100");
    assert_eq!(updated.birthday, None);
    assert_eq!(updated.bio, created.bio);
    assert_eq!(updated.first_name, created.first_name);

    s.delete(created.id).await.unwrap();
    assert!(matches!(s.delete(created.id).await, Err(AppError::NotFound(_))));
    assert!(matches!(s.find_by_id(created.id).await, Err(AppError::NotFound(_))));
}
