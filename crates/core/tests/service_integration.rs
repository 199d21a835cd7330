//! Transactional service behavior against a real database.
//!
//! These tests require a running `PostgreSQL` instance (see
//! `nurseshift_db::test_utils` for the `TEST_DB_*` variables).
//! Run with: `cargo test -p nurseshift-core --test service_integration -- --ignored`

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use nurseshift_common::{
    AppError, Config,
    config::{AuthConfig, DatabaseConfig, DisplayConfig, ServerConfig},
};
use chrono::Utc;
use chrono_tz::Tz;
use nurseshift_core::{
    ApplicationService, AuthService, Principal, TokenService, services::auth::RegisterInput,
};
use nurseshift_db::{
    entities::{
        NurseProfile, User,
        application::{self, ApplicationStatus},
        shift::ShiftStatus,
    },
    repositories::{
        ApplicationRepository, NurseProfileRepository, ShiftRepository, UserRepository,
    },
    test_utils::{TestDatabase, seed_facility, seed_nurse, seed_open_shift},
};
use sea_orm::{EntityTrait, PaginatorTrait, Set};
use serde_json::{Value, json};

fn config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
            min_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: "integration-secret-integration-secret".to_string(),
            access_token_ttl_hours: 24,
            refresh_token_ttl_days: 7,
        },
        display: DisplayConfig::default(),
    }
}

fn auth_service(db: &TestDatabase) -> AuthService {
    let conn = Arc::new(db.connection().clone());
    AuthService::new(
        Arc::clone(&conn),
        UserRepository::new(Arc::clone(&conn)),
        NurseProfileRepository::new(conn),
        TokenService::new(&config()),
    )
}

fn nurse_registration(licenses: Value) -> RegisterInput {
    serde_json::from_value(json!({
        "email": "ann@example.com",
        "password": "password123",
        "firstName": "Ann",
        "lastName": "Lee",
        "role": "nurse",
        "nurseProfile": {
            "specialty": "ICU",
            "yearsExperience": "5",
            "preferredDistance": 25,
            "minHourlyRate": 60,
            "maxHourlyRate": "95.5"
        },
        "licenses": licenses,
        "certifications": []
    }))
    .unwrap()
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_email_leaves_one_user() {
    let db = TestDatabase::create_unique().await.unwrap();
    let service = auth_service(&db);

    service.register(nurse_registration(json!([]))).await.unwrap();
    let second = service.register(nurse_registration(json!([]))).await;

    assert!(matches!(second, Err(AppError::BadRequest(msg)) if msg == "Email already registered"));
    assert_eq!(User::find().count(db.connection()).await.unwrap(), 1);
    assert_eq!(NurseProfile::find().count(db.connection()).await.unwrap(), 1);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_invalid_license_leaves_no_rows() {
    let db = TestDatabase::create_unique().await.unwrap();
    let service = auth_service(&db);

    let licenses = json!([{
        "licenseType": "RN",
        "licenseNumber": "123",
        "expiryDate": "2027-01-01"
    }]);
    let result = service.register(nurse_registration(licenses)).await;

    assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("issuingState")));
    assert_eq!(User::find().count(db.connection()).await.unwrap(), 0);
    assert_eq!(NurseProfile::find().count(db.connection()).await.unwrap(), 0);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_concurrent_approvals_assign_shift_once() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = db.connection();
    seed_nurse(conn, "u1", "np1").await.unwrap();
    seed_nurse(conn, "u2", "np2").await.unwrap();
    seed_facility(conn, "f1").await.unwrap();
    seed_open_shift(conn, "s1", "f1").await.unwrap();

    let shared = Arc::new(conn.clone());
    let applications = ApplicationRepository::new(Arc::clone(&shared));
    for (id, nurse_id) in [("a1", "np1"), ("a2", "np2")] {
        applications
            .create(application::ActiveModel {
                id: Set(id.to_string()),
                shift_id: Set("s1".to_string()),
                nurse_id: Set(nurse_id.to_string()),
                status: Set(ApplicationStatus::Pending),
                special_notes: Set(None),
                availability_confirmed: Set(true),
                created_at: Set(Utc::now().into()),
                updated_at: Set(None),
            })
            .await
            .unwrap();
    }

    let service = ApplicationService::new(
        Arc::clone(&shared),
        applications.clone(),
        ShiftRepository::new(Arc::clone(&shared)),
        NurseProfileRepository::new(Arc::clone(&shared)),
        Tz::UTC,
    );
    let facility = Principal::Facility {
        id: "f1".to_string(),
    };

    let (first, second) = tokio::join!(
        service.update_status(&facility, "a1", "approved"),
        service.update_status(&facility, "a2", "approved"),
    );

    let approved = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(approved, 1);
    assert!(
        [first, second]
            .into_iter()
            .any(|r| matches!(r, Err(AppError::Conflict(_))))
    );

    let shift = ShiftRepository::new(Arc::clone(&shared))
        .get_by_id("s1")
        .await
        .unwrap();
    assert_eq!(shift.status, ShiftStatus::Assigned);
    let a1 = applications.get_by_id("a1").await.unwrap();
    let a2 = applications.get_by_id("a2").await.unwrap();
    let statuses = [a1.status, a2.status];
    assert_eq!(
        statuses.iter().filter(|s| **s == ApplicationStatus::Approved).count(),
        1
    );
    assert!(statuses.contains(&ApplicationStatus::Pending));

    db.drop_database().await.unwrap();
}
