//! Facility authentication endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use nurseshift_common::{AppError, AppResult};
use nurseshift_core::{
    FacilitySession,
    auth::LoginInput,
    facility::FacilityRegisterInput,
};
use serde::Serialize;

use super::auth::{RefreshTokenRequest, TokenResponse};
use crate::{
    extractors::{ApiJson, AuthPrincipal},
    middleware::AppState,
    response::{FacilityResponse, created},
};

/// Facility login or registration response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityAuthResponse {
    pub facility: FacilityResponse,
    pub token: String,
    pub refresh_token: String,
}

impl From<FacilitySession> for FacilityAuthResponse {
    fn from(session: FacilitySession) -> Self {
        Self {
            facility: session.facility.into(),
            token: session.tokens.access,
            refresh_token: session.tokens.refresh,
        }
    }
}

async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<FacilityRegisterInput>,
) -> AppResult<(StatusCode, Json<FacilityAuthResponse>)> {
    let session = state.facility_service.register(input).await?;
    Ok(created(session.into()))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> AppResult<Json<FacilityAuthResponse>> {
    let session = state.facility_service.login(input).await?;
    Ok(Json(session.into()))
}

async fn refresh_token(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshTokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state.facility_service.refresh(&req.refresh_token).await?;
    Ok(Json(TokenResponse { token }))
}

async fn me(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
) -> AppResult<Json<FacilityResponse>> {
    let facility_id = principal
        .facility_id()
        .ok_or_else(|| AppError::Forbidden("Not a facility account".to_string()))?;
    let facility = state.facility_service.me(facility_id).await?;
    Ok(Json(facility.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token))
        .route("/me", get(me))
}
