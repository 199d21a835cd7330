//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test -p nurseshift-db --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `nurseshift_test`)
//!   `TEST_DB_PASSWORD` (default: `nurseshift_test`)
//!   `TEST_DB_NAME` (default: `nurseshift_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::Utc;
use nurseshift_common::AppError;
use nurseshift_db::{
    entities::application::{self, ApplicationStatus},
    repositories::{ApplicationRepository, ShiftFilter, ShiftRepository},
    test_utils::{TestDatabase, TestDbConfig, seed_facility, seed_nurse, seed_open_shift},
};
use sea_orm::Set;

async fn seed_nurse_and_shift(db: &TestDatabase) -> (String, String) {
    let conn = db.connection();
    let profile = seed_nurse(conn, "u1", "np1").await.unwrap();
    seed_facility(conn, "f1").await.unwrap();
    let shift = seed_open_shift(conn, "s1", "f1").await.unwrap();
    (profile.id, shift.id)
}

fn pending_application(id: &str, nurse_id: &str, shift_id: &str) -> application::ActiveModel {
    application::ActiveModel {
        id: Set(id.to_string()),
        shift_id: Set(shift_id.to_string()),
        nurse_id: Set(nurse_id.to_string()),
        status: Set(ApplicationStatus::Pending),
        special_notes: Set(None),
        availability_confirmed: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let result = TestDatabase::with_config(TestDbConfig::default()).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_active_application_is_conflict() {
    let db = TestDatabase::create_unique().await.unwrap();
    let (nurse_id, shift_id) = seed_nurse_and_shift(&db).await;
    let repo = ApplicationRepository::new(Arc::new(db.connection().clone()));

    repo.create(pending_application("a1", &nurse_id, &shift_id))
        .await
        .unwrap();
    let second = repo
        .create(pending_application("a2", &nurse_id, &shift_id))
        .await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_reapply_after_withdrawal_is_allowed() {
    let db = TestDatabase::create_unique().await.unwrap();
    let (nurse_id, shift_id) = seed_nurse_and_shift(&db).await;
    let repo = ApplicationRepository::new(Arc::new(db.connection().clone()));

    let first = repo
        .create(pending_application("a1", &nurse_id, &shift_id))
        .await
        .unwrap();
    let mut withdrawn: application::ActiveModel = first.into();
    withdrawn.status = Set(ApplicationStatus::Withdrawn);
    repo.update(withdrawn).await.unwrap();

    let again = repo
        .create(pending_application("a2", &nurse_id, &shift_id))
        .await;
    assert!(again.is_ok(), "Re-apply failed: {:?}", again.err());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_specialty_filter_and_cleanup() {
    let db = TestDatabase::create_unique().await.unwrap();
    seed_nurse_and_shift(&db).await;
    let repo = ShiftRepository::new(Arc::new(db.connection().clone()));

    let icu = ShiftFilter {
        specialty: Some("ICU".to_string()),
        limit: 20,
        ..Default::default()
    };
    assert_eq!(repo.list_open(&icu).await.unwrap().len(), 1);

    let er = ShiftFilter {
        specialty: Some("ER".to_string()),
        limit: 20,
        ..Default::default()
    };
    assert!(repo.list_open(&er).await.unwrap().is_empty());

    db.cleanup().await.unwrap();
    assert!(repo.list_open(&icu).await.unwrap().is_empty());

    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
}
