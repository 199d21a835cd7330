//! Facility accounts.

use chrono::Utc;
use nurseshift_common::{AppError, AppResult, IdGenerator};
use nurseshift_db::{entities::facility, repositories::FacilityRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::{
    auth::{LoginInput, hash_password, verify_password},
    token::{PrincipalKind, TokenKind, TokenPair, TokenService, TokenSubject},
};

/// Facility registration request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FacilityRegisterInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 256))]
    pub address: String,

    #[validate(length(min = 1, max = 128))]
    pub city: String,

    #[validate(length(min = 1, max = 64))]
    pub state: String,

    #[validate(length(min = 1, max = 16))]
    pub zip_code: String,

    #[validate(length(min = 1, max = 32))]
    pub phone: String,

    #[validate(length(max = 128))]
    pub contact_name: Option<String>,

    #[validate(length(max = 64))]
    pub facility_type: Option<String>,
}

/// An authenticated facility with freshly issued tokens.
#[derive(Debug, Clone)]
pub struct FacilitySession {
    pub facility: facility::Model,
    pub tokens: TokenPair,
}

/// Facility account service.
#[derive(Clone)]
pub struct FacilityService {
    facility_repo: FacilityRepository,
    tokens: TokenService,
    id_gen: IdGenerator,
}

impl FacilityService {
    /// Create a new facility service.
    #[must_use]
    pub const fn new(facility_repo: FacilityRepository, tokens: TokenService) -> Self {
        Self {
            facility_repo,
            tokens,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a facility.
    pub async fn register(&self, input: FacilityRegisterInput) -> AppResult<FacilitySession> {
        input.validate()?;

        let email = input.email.trim().to_lowercase();
        if self.facility_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        let model = facility::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.trim().to_string()),
            email: Set(email),
            password_hash: Set(hash_password(&input.password)?),
            address: Set(input.address),
            city: Set(input.city),
            state: Set(input.state),
            zip_code: Set(input.zip_code),
            phone: Set(input.phone),
            contact_name: Set(input.contact_name),
            facility_type: Set(input.facility_type),
            rating: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let facility = self.facility_repo.create(model).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::BadRequest("Email already registered".to_string()),
            other => other,
        })?;
        tracing::info!(facility_id = %facility.id, "Registered facility");

        let tokens = self.tokens.issue_pair(&TokenSubject::from(&facility))?;
        Ok(FacilitySession { facility, tokens })
    }

    /// Authenticate a facility by email and password.
    pub async fn login(&self, input: LoginInput) -> AppResult<FacilitySession> {
        input.validate().map_err(|_| AppError::InvalidCredentials)?;

        let Some(facility) = self.facility_repo.find_by_email(input.email.trim()).await? else {
            return Err(AppError::InvalidCredentials);
        };
        if !verify_password(&input.password, &facility.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let tokens = self.tokens.issue_pair(&TokenSubject::from(&facility))?;
        Ok(FacilitySession { facility, tokens })
    }

    /// Exchange a facility refresh token for a new access token.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<String> {
        let claims = self.tokens.verify(refresh_token, TokenKind::Refresh)?;
        if claims.principal != PrincipalKind::Facility {
            return Err(AppError::Unauthorized);
        }

        let facility = self
            .facility_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;
        self.tokens
            .issue(&TokenSubject::from(&facility), TokenKind::Access)
    }

    /// Current facility.
    pub async fn me(&self, facility_id: &str) -> AppResult<facility::Model> {
        self.facility_repo.get_by_id(facility_id).await
    }
}
