//! Account registration, login and token refresh for user accounts.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use nurseshift_common::{AppError, AppResult, IdGenerator};
use nurseshift_db::{
    db_error,
    entities::{nurse_profile, user, user::UserRole},
    repositories::{NurseProfileRepository, UserRepository},
};
use sea_orm::{DatabaseConnection, DatabaseTransaction, Set, TransactionTrait};
use serde::Deserialize;
use validator::Validate;

use super::{
    nurse::{CertificationDraft, LicenseDraft, NurseProfileDraft, insert_nurse_records},
    token::{PrincipalKind, TokenKind, TokenPair, TokenService, TokenSubject},
};

/// Hash a password with argon2 and a random salt.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Check a password against a stored PHC hash.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Registration request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 128))]
    pub first_name: String,

    #[validate(length(min = 1, max = 128))]
    pub last_name: String,

    #[validate(length(max = 32))]
    pub phone: Option<String>,

    pub role: UserRole,

    pub nurse_profile: Option<NurseProfileDraft>,

    #[serde(default)]
    pub licenses: Vec<LicenseDraft>,

    #[serde(default)]
    pub certifications: Vec<CertificationDraft>,
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    #[validate(length(min = 1))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Account edit request.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountInput {
    #[validate(length(min = 1, max = 128))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 128))]
    pub last_name: Option<String>,

    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

/// An authenticated user with freshly issued tokens.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: user::Model,
    pub nurse_profile_id: Option<String>,
    pub tokens: TokenPair,
}

/// User account service.
#[derive(Clone)]
pub struct AuthService {
    db: Arc<DatabaseConnection>,
    user_repo: UserRepository,
    profile_repo: NurseProfileRepository,
    tokens: TokenService,
    id_gen: IdGenerator,
}

impl AuthService {
    /// Create a new auth service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        user_repo: UserRepository,
        profile_repo: NurseProfileRepository,
        tokens: TokenService,
    ) -> Self {
        Self {
            db,
            user_repo,
            profile_repo,
            tokens,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a user and, for nurses, their profile and credentials.
    ///
    /// All rows are written in one transaction; any failure rolls back
    /// everything including the user row.
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthSession> {
        input.validate()?;
        if input.role == UserRole::Admin {
            return Err(AppError::Forbidden(
                "Admin accounts cannot be self-registered".to_string(),
            ));
        }

        let txn = self.db.begin().await.map_err(db_error)?;
        let outcome = self.register_in(&txn, input).await;

        let (user, profile) = match outcome {
            Ok(rows) => {
                txn.commit().await.map_err(db_error)?;
                rows
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(error = %rollback_err, "Failed to roll back registration");
                }
                tracing::debug!(error = %err, "Registration rolled back");
                return Err(err);
            }
        };

        tracing::info!(user_id = %user.id, role = %user.role, "Registered user");

        let tokens = self.tokens.issue_pair(&TokenSubject::from(&user))?;
        Ok(AuthSession {
            user,
            nurse_profile_id: profile.map(|p| p.id),
            tokens,
        })
    }

    async fn register_in(
        &self,
        txn: &DatabaseTransaction,
        input: RegisterInput,
    ) -> AppResult<(user::Model, Option<nurse_profile::Model>)> {
        let email = input.email.trim().to_lowercase();

        if UserRepository::find_by_email_with(txn, &email).await?.is_some() {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let user_model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(email),
            password_hash: Set(password_hash),
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.trim().to_string()),
            phone: Set(input.phone),
            role: Set(input.role),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let user = UserRepository::create_with(txn, user_model)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => AppError::BadRequest("Email already registered".to_string()),
                other => other,
            })?;

        if user.role != UserRole::Nurse {
            if input.nurse_profile.is_some() {
                tracing::debug!(role = %user.role, "Ignoring nurse profile for non-nurse registration");
            }
            return Ok((user, None));
        }

        let draft = input
            .nurse_profile
            .ok_or_else(|| AppError::Validation("nurseProfile is required for nurses".to_string()))?;
        let profile = insert_nurse_records(
            txn,
            &self.id_gen,
            &user.id,
            draft,
            input.licenses,
            input.certifications,
        )
        .await?;

        Ok((user, Some(profile)))
    }

    /// Authenticate by email and password.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthSession> {
        input.validate().map_err(|_| AppError::InvalidCredentials)?;

        let Some(user) = self.user_repo.find_by_email(input.email.trim()).await? else {
            return Err(AppError::InvalidCredentials);
        };
        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let nurse_profile_id = self.nurse_profile_id(&user).await?;
        let tokens = self.tokens.issue_pair(&TokenSubject::from(&user))?;

        tracing::debug!(user_id = %user.id, "User logged in");
        Ok(AuthSession {
            user,
            nurse_profile_id,
            tokens,
        })
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<String> {
        let claims = self.tokens.verify(refresh_token, TokenKind::Refresh)?;
        if claims.principal != PrincipalKind::User {
            return Err(AppError::Unauthorized);
        }

        let user = self
            .user_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;
        self.tokens
            .issue(&TokenSubject::from(&user), TokenKind::Access)
    }

    /// Current user and their nurse profile ID, if any.
    pub async fn me(&self, user_id: &str) -> AppResult<(user::Model, Option<String>)> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let profile_id = self.nurse_profile_id(&user).await?;
        Ok((user, profile_id))
    }

    /// Edit name and phone.
    pub async fn update_me(
        &self,
        user_id: &str,
        input: UpdateAccountInput,
    ) -> AppResult<user::Model> {
        input.validate()?;
        let user = self.user_repo.get_by_id(user_id).await?;

        let mut active: user::ActiveModel = user.into();
        if let Some(first_name) = input.first_name {
            active.first_name = Set(first_name.trim().to_string());
        }
        if let Some(last_name) = input.last_name {
            active.last_name = Set(last_name.trim().to_string());
        }
        if input.phone.is_some() {
            active.phone = Set(input.phone);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(active).await
    }

    async fn nurse_profile_id(&self, user: &user::Model) -> AppResult<Option<String>> {
        if user.role != UserRole::Nurse {
            return Ok(None);
        }
        Ok(self
            .profile_repo
            .find_by_user_id(&user.id)
            .await?
            .map(|p| p.id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::{nurse::tests::complete_draft, token::tests::test_config};
    use chrono::NaiveDate;
    use nurseshift_db::entities::license;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn test_user(id: &str, role: UserRole, password_hash: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: "nurse@example.com".to_string(),
            password_hash: password_hash.to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            phone: None,
            role,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_profile(user_id: &str) -> nurse_profile::Model {
        nurse_profile::Model {
            id: "np1".to_string(),
            user_id: user_id.to_string(),
            specialty: "ICU".to_string(),
            years_experience: 5,
            preferred_shift_type: None,
            preferred_distance: 25,
            min_hourly_rate: 60.0,
            max_hourly_rate: 95.5,
            bio: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(db: MockDatabase, profiles: MockDatabase) -> AuthService {
        let db = Arc::new(db.into_connection());
        AuthService::new(
            db.clone(),
            UserRepository::new(db),
            NurseProfileRepository::new(Arc::new(profiles.into_connection())),
            TokenService::new(&test_config()),
        )
    }

    fn mock() -> MockDatabase {
        MockDatabase::new(DatabaseBackend::Postgres)
    }

    fn register_input(role: UserRole) -> RegisterInput {
        RegisterInput {
            email: "Nurse@Example.com".to_string(),
            password: "password123".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            phone: None,
            role,
            nurse_profile: Some(complete_draft()),
            licenses: vec![],
            certifications: vec![],
        }
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("password123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("password123", &hash).unwrap());
        assert!(!verify_password("password124", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_invalid_email_fails_before_db() {
        let service = service(mock(), mock());
        let mut input = register_input(UserRole::Nurse);
        input.email = "not-an-email".to_string();

        assert!(matches!(
            service.register(input).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let existing = test_user("u0", UserRole::Nurse, "x");
        let service = service(mock().append_query_results([[existing]]), mock());

        match service.register(register_input(UserRole::Nurse)).await {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Email already registered"),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_nurse_without_profile() {
        let service = service(
            mock()
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([[test_user("u1", UserRole::Nurse, "x")]]),
            mock(),
        );
        let mut input = register_input(UserRole::Nurse);
        input.nurse_profile = None;

        assert!(matches!(
            service.register(input).await,
            Err(AppError::Validation(msg)) if msg.contains("nurseProfile")
        ));
    }

    #[tokio::test]
    async fn test_register_admin_is_forbidden() {
        let db = Arc::new(mock().into_connection());
        let service = AuthService::new(
            db.clone(),
            UserRepository::new(db.clone()),
            NurseProfileRepository::new(Arc::new(mock().into_connection())),
            TokenService::new(&test_config()),
        );
        let mut input = register_input(UserRole::Admin);
        input.nurse_profile = None;

        assert!(matches!(
            service.register(input).await,
            Err(AppError::Forbidden(_))
        ));
        drop(service);
        let conn = Arc::try_unwrap(db).ok().unwrap();
        assert!(conn.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_register_nurse_with_incomplete_license_rolls_back() {
        let db = Arc::new(
            mock()
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([[test_user("u1", UserRole::Nurse, "x")]])
                .append_query_results([[test_profile("u1")]])
                .into_connection(),
        );
        let service = AuthService::new(
            db.clone(),
            UserRepository::new(db.clone()),
            NurseProfileRepository::new(Arc::new(mock().into_connection())),
            TokenService::new(&test_config()),
        );
        let mut input = register_input(UserRole::Nurse);
        input.licenses = vec![LicenseDraft {
            license_type: Some("RN".to_string()),
            license_number: Some("123".to_string()),
            issuing_state: None,
            expiry_date: NaiveDate::from_ymd_opt(2027, 1, 1),
            ..Default::default()
        }];

        match service.register(input).await {
            Err(AppError::Validation(msg)) => {
                assert!(msg.contains("licenses[0]"));
                assert!(msg.contains("issuingState"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }

        drop(service);
        let conn = Arc::try_unwrap(db).ok().unwrap();
        let log = format!("{:?}", conn.into_transaction_log());
        assert!(log.contains("BEGIN"));
        assert!(log.contains(r#"INSERT INTO \"users\""#));
        assert!(log.contains(r#"INSERT INTO \"nurse_profiles\""#));
        assert!(!log.contains(r#"INSERT INTO \"licenses\""#));
        assert!(log.contains("ROLLBACK"));
        assert!(!log.contains("COMMIT"));
    }

    #[tokio::test]
    async fn test_register_nurse_with_license() {
        let license = license::Model {
            id: "lic1".to_string(),
            nurse_id: "np1".to_string(),
            license_type: "RN".to_string(),
            license_number: "123".to_string(),
            issuing_state: "CA".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            status: license::CredentialStatus::Active,
            is_verified: false,
            document_url: None,
            created_at: Utc::now().into(),
            updated_at: None,
        };
        let service = service(
            mock()
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([[test_user("u1", UserRole::Nurse, "x")]])
                .append_query_results([[test_profile("u1")]])
                .append_query_results([[license]]),
            mock(),
        );
        let mut input = register_input(UserRole::Nurse);
        input.licenses = vec![LicenseDraft {
            license_type: Some("RN".to_string()),
            license_number: Some("123".to_string()),
            issuing_state: Some("CA".to_string()),
            expiry_date: NaiveDate::from_ymd_opt(2027, 1, 1),
            ..Default::default()
        }];

        let session = service.register(input).await.unwrap();
        assert_eq!(session.user.id, "u1");
        assert_eq!(session.nurse_profile_id.as_deref(), Some("np1"));
        assert!(!session.tokens.access.is_empty());
        assert!(!session.tokens.refresh.is_empty());
    }

    #[tokio::test]
    async fn test_register_facility_role_ignores_profile() {
        let service = service(
            mock()
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_results([[test_user("u1", UserRole::Facility, "x")]]),
            mock(),
        );

        let session = service
            .register(register_input(UserRole::Facility))
            .await
            .unwrap();
        assert!(session.nurse_profile_id.is_none());
    }

    #[tokio::test]
    async fn test_login_success_returns_profile_id() {
        let hash = hash_password("password123").unwrap();
        let service = service(
            mock().append_query_results([[test_user("u1", UserRole::Nurse, &hash)]]),
            mock().append_query_results([[test_profile("u1")]]),
        );

        let session = service
            .login(LoginInput {
                email: "NURSE@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.nurse_profile_id.as_deref(), Some("np1"));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let hash = hash_password("password123").unwrap();
        let wrong_password = service(
            mock().append_query_results([[test_user("u1", UserRole::Nurse, &hash)]]),
            mock(),
        )
        .login(LoginInput {
            email: "nurse@example.com".to_string(),
            password: "wrong-password".to_string(),
        })
        .await
        .unwrap_err();

        let unknown_email = service(mock().append_query_results([Vec::<user::Model>::new()]), mock())
            .login(LoginInput {
                email: "nobody@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
        assert_eq!(wrong_password.public_message(), unknown_email.public_message());
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let tokens = TokenService::new(&test_config());
        let user = test_user("u1", UserRole::Nurse, "x");
        let access = tokens
            .issue(&TokenSubject::from(&user), TokenKind::Access)
            .unwrap();

        let service = service(mock(), mock());
        assert!(matches!(
            service.refresh(&access).await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_refresh_issues_access_token() {
        let tokens = TokenService::new(&test_config());
        let user = test_user("u1", UserRole::Nurse, "x");
        let refresh = tokens
            .issue(&TokenSubject::from(&user), TokenKind::Refresh)
            .unwrap();

        let service = service(mock().append_query_results([[user]]), mock());
        let access = service.refresh(&refresh).await.unwrap();

        let claims = tokens.verify(&access, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, "u1");
    }
}
