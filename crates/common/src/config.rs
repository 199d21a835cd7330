//! Application configuration.

use chrono_tz::Tz;
use serde::Deserialize;
use std::path::Path;

/// Minimum accepted length of the JWT signing secret, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Token issuing configuration.
    pub auth: AuthConfig,
    /// Display formatting configuration.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Token configuration.
///
/// `jwt_secret` has no default: it must come from a config file or
/// `NURSESHIFT__AUTH__JWT_SECRET`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign access and refresh tokens.
    pub jwt_secret: String,
    /// Access token lifetime in hours.
    #[serde(default = "default_access_token_ttl_hours")]
    pub access_token_ttl_hours: i64,
    /// Refresh token lifetime in days.
    #[serde(default = "default_refresh_token_ttl_days")]
    pub refresh_token_ttl_days: i64,
}

/// Display configuration for formatted shift times.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// IANA timezone name used when rendering shift dates and times.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_access_token_ttl_hours() -> i64 {
    24
}

const fn default_refresh_token_ttl_days() -> i64 {
    7
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `NURSESHIFT_ENV`)
    /// 3. Environment variables with `NURSESHIFT__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("NURSESHIFT_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("NURSESHIFT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("NURSESHIFT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialization alone cannot.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.auth.jwt_secret.trim().len() < MIN_JWT_SECRET_LEN {
            return Err(config::ConfigError::Message(format!(
                "auth.jwt_secret must be at least {MIN_JWT_SECRET_LEN} bytes"
            )));
        }
        if self.auth.access_token_ttl_hours <= 0 || self.auth.refresh_token_ttl_days <= 0 {
            return Err(config::ConfigError::Message(
                "token lifetimes must be positive".to_string(),
            ));
        }
        self.display_timezone()?;
        Ok(())
    }

    /// Parsed display timezone.
    pub fn display_timezone(&self) -> Result<Tz, config::ConfigError> {
        self.display.timezone.parse::<Tz>().map_err(|e| {
            config::ConfigError::Message(format!(
                "display.timezone '{}' is not a valid IANA timezone: {e}",
                self.display.timezone
            ))
        })
    }
}
