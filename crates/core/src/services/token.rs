//! JWT issuing and verification.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use nurseshift_common::{AppError, AppResult, Config};
use nurseshift_db::entities::{facility, user, user::UserRole};
use serde::{Deserialize, Serialize};

/// Which table the token subject lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    User,
    Facility,
}

/// Access or refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub principal: PrincipalKind,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

/// The authenticated party behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    User { id: String, role: UserRole },
    Facility { id: String },
}

impl Principal {
    /// Build from verified access-token claims.
    #[must_use]
    pub fn from_claims(claims: &Claims) -> Self {
        match claims.principal {
            PrincipalKind::User => Self::User {
                id: claims.sub.clone(),
                role: claims.role,
            },
            PrincipalKind::Facility => Self::Facility {
                id: claims.sub.clone(),
            },
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(
            self,
            Self::User {
                role: UserRole::Admin,
                ..
            }
        )
    }

    /// User ID, when the principal is a user account.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::User { id, .. } => Some(id),
            Self::Facility { .. } => None,
        }
    }

    /// Facility ID, when the principal is a facility.
    #[must_use]
    pub fn facility_id(&self) -> Option<&str> {
        match self {
            Self::Facility { id } => Some(id),
            Self::User { .. } => None,
        }
    }

    /// The user themself or an admin.
    pub fn ensure_self_or_admin(&self, user_id: &str) -> AppResult<()> {
        if self.is_admin() || self.user_id() == Some(user_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden("Access denied".to_string()))
        }
    }
}

/// Subject data embedded into a token.
#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub principal: PrincipalKind,
}

impl From<&user::Model> for TokenSubject {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            principal: PrincipalKind::User,
        }
    }
}

impl From<&facility::Model> for TokenSubject {
    fn from(facility: &facility::Model) -> Self {
        Self {
            id: facility.id.clone(),
            email: facility.email.clone(),
            role: UserRole::Facility,
            principal: PrincipalKind::Facility,
        }
    }
}

/// Access token plus refresh token.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Signs and verifies HS256 tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Create a token service from the auth configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let secret = config.auth.jwt_secret.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl: Duration::hours(config.auth.access_token_ttl_hours),
            refresh_ttl: Duration::days(config.auth.refresh_token_ttl_days),
        }
    }

    /// Issue a token of the given kind.
    pub fn issue(&self, subject: &TokenSubject, kind: TokenKind) -> AppResult<String> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: subject.id.clone(),
            email: subject.email.clone(),
            role: subject.role,
            principal: subject.principal,
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Issue an access and a refresh token.
    pub fn issue_pair(&self, subject: &TokenSubject) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access: self.issue(subject, TokenKind::Access)?,
            refresh: self.issue(subject, TokenKind::Refresh)?,
        })
    }

    /// Verify signature and expiry, and require the expected kind.
    pub fn verify(&self, token: &str, expected: TokenKind) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation)?;

        if data.claims.kind != expected {
            tracing::debug!(kind = ?data.claims.kind, expected = ?expected, "Token kind mismatch");
            return Err(AppError::Unauthorized);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use nurseshift_common::config::{AuthConfig, DatabaseConfig, DisplayConfig, ServerConfig};

    pub(crate) fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/test".to_string(),
                max_connections: 1,
                min_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: "test-secret-test-secret-test-secret!".to_string(),
                access_token_ttl_hours: 24,
                refresh_token_ttl_days: 7,
            },
            display: DisplayConfig::default(),
        }
    }

    fn subject() -> TokenSubject {
        TokenSubject {
            id: "user1".to_string(),
            email: "nurse@example.com".to_string(),
            role: UserRole::Nurse,
            principal: PrincipalKind::User,
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let tokens = TokenService::new(&test_config());
        let token = tokens.issue(&subject(), TokenKind::Access).unwrap();

        let claims = tokens.verify(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, "user1");
        assert_eq!(claims.role, UserRole::Nurse);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_kinds_are_not_interchangeable() {
        let tokens = TokenService::new(&test_config());
        let pair = tokens.issue_pair(&subject()).unwrap();

        assert!(matches!(
            tokens.verify(&pair.access, TokenKind::Refresh),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            tokens.verify(&pair.refresh, TokenKind::Access),
            Err(AppError::Unauthorized)
        ));
        let refresh = tokens.verify(&pair.refresh, TokenKind::Refresh).unwrap();
        assert_eq!(refresh.exp - refresh.iat, 7 * 24 * 3600);
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let tokens = TokenService::new(&test_config());
        let mut other = test_config();
        other.auth.jwt_secret = "another-secret-another-secret-another".to_string();
        let forged = TokenService::new(&other)
            .issue(&subject(), TokenKind::Access)
            .unwrap();

        assert!(matches!(
            tokens.verify(&forged, TokenKind::Access),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = TokenService::new(&test_config());
        let claims = Claims {
            sub: "user1".to_string(),
            email: "nurse@example.com".to_string(),
            role: UserRole::Nurse,
            principal: PrincipalKind::User,
            kind: TokenKind::Access,
            iat: 1_000,
            exp: 2_000,
        };
        let token = encode(&Header::default(), &claims, &tokens.encoding).unwrap();

        assert!(tokens.verify(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn test_principal_permissions() {
        let admin = Principal::User {
            id: "a".to_string(),
            role: UserRole::Admin,
        };
        let nurse = Principal::User {
            id: "n".to_string(),
            role: UserRole::Nurse,
        };
        let facility = Principal::Facility {
            id: "n".to_string(),
        };

        assert!(admin.ensure_self_or_admin("n").is_ok());
        assert!(nurse.ensure_self_or_admin("n").is_ok());
        assert!(nurse.ensure_self_or_admin("x").is_err());
        assert!(facility.ensure_self_or_admin("n").is_err());
    }
}
