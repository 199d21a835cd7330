//! Account authentication endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use nurseshift_common::{AppError, AppResult};
use nurseshift_core::{
    AuthSession, Principal,
    auth::{LoginInput, RegisterInput, UpdateAccountInput},
};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{ApiJson, AuthPrincipal},
    middleware::AppState,
    response::{UserResponse, created},
};

/// Login or registration response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nurse_profile_id: Option<String>,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: session.user.into(),
            token: session.tokens.access,
            refresh_token: session.tokens.refresh,
            nurse_profile_id: session.nurse_profile_id,
        }
    }
}

/// Refresh token request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Fresh access token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Current account response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: UserResponse,
    pub nurse_profile_id: Option<String>,
}

fn account_id(principal: &Principal) -> AppResult<&str> {
    principal
        .user_id()
        .ok_or_else(|| AppError::Forbidden("Facilities use /facility-auth/me".to_string()))
}

/// Create an account; nurses also get their profile and credentials.
async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterInput>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let session = state.auth_service.register(input).await?;
    Ok(created(session.into()))
}

/// Sign in with email and password.
async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> AppResult<Json<AuthResponse>> {
    let session = state.auth_service.login(input).await?;
    Ok(Json(session.into()))
}

/// Trade a refresh token for a new access token.
async fn refresh_token(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshTokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state.auth_service.refresh(&req.refresh_token).await?;
    Ok(Json(TokenResponse { token }))
}

/// Current account.
async fn me(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
) -> AppResult<Json<MeResponse>> {
    let (user, nurse_profile_id) = state.auth_service.me(account_id(&principal)?).await?;
    Ok(Json(MeResponse {
        user: user.into(),
        nurse_profile_id,
    }))
}

/// Edit name and phone.
async fn update_me(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UpdateAccountInput>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .auth_service
        .update_me(account_id(&principal)?, input)
        .await?;
    Ok(Json(user.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token))
        .route("/me", get(me).put(update_me))
}
