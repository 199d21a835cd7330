//! API endpoints.

mod applications;
mod auth;
mod facility_auth;
mod health;
mod nurses;
mod shifts;
mod users;

use axum::Router;

use crate::middleware::AppState;

pub use auth::{AuthResponse, MeResponse, RefreshTokenRequest, TokenResponse};
pub use facility_auth::FacilityAuthResponse;
pub use health::HealthResponse;
pub use shifts::StatusRequest;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/health", health::router())
        .nest("/auth", auth::router())
        .nest("/facility-auth", facility_auth::router())
        .nest("/nurses", nurses::router())
        .nest("/shifts", shifts::router())
        .nest("/applications", applications::router())
        .nest("/users", users::router())
}
