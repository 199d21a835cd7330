//! Nurse profile and credential endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use nurseshift_common::AppResult;
use nurseshift_core::nurse::{CertificationDraft, LicenseDraft, NurseProfileDraft};

use crate::{
    extractors::{ApiJson, AuthPrincipal},
    middleware::AppState,
    response::{
        CertificationResponse, LicenseResponse, NurseProfileDetailsResponse,
        NurseProfileResponse, created,
    },
};

// ==================== Profile ====================

/// Profile with licenses and certifications.
async fn get_profile(
    AuthPrincipal(_principal): AuthPrincipal,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<NurseProfileDetailsResponse>> {
    let details = state.nurse_service.get_profile(&user_id).await?;
    Ok(Json(details.into()))
}

async fn create_profile(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(draft): ApiJson<NurseProfileDraft>,
) -> AppResult<(StatusCode, Json<NurseProfileResponse>)> {
    let profile = state
        .nurse_service
        .create_profile(&principal, &user_id, draft)
        .await?;
    Ok(created(profile.into()))
}

async fn update_profile(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(draft): ApiJson<NurseProfileDraft>,
) -> AppResult<Json<NurseProfileResponse>> {
    let profile = state
        .nurse_service
        .update_profile(&principal, &user_id, draft)
        .await?;
    Ok(Json(profile.into()))
}

// ==================== Licenses ====================

async fn add_license(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(draft): ApiJson<LicenseDraft>,
) -> AppResult<(StatusCode, Json<LicenseResponse>)> {
    let license = state
        .nurse_service
        .add_license(&principal, &user_id, draft)
        .await?;
    Ok(created(license.into()))
}

async fn update_license(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path((user_id, license_id)): Path<(String, String)>,
    ApiJson(draft): ApiJson<LicenseDraft>,
) -> AppResult<Json<LicenseResponse>> {
    let license = state
        .nurse_service
        .update_license(&principal, &user_id, &license_id, draft)
        .await?;
    Ok(Json(license.into()))
}

async fn delete_license(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path((user_id, license_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    state
        .nurse_service
        .delete_license(&principal, &user_id, &license_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================== Certifications ====================

async fn add_certification(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(draft): ApiJson<CertificationDraft>,
) -> AppResult<(StatusCode, Json<CertificationResponse>)> {
    let certification = state
        .nurse_service
        .add_certification(&principal, &user_id, draft)
        .await?;
    Ok(created(certification.into()))
}

async fn update_certification(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path((user_id, certification_id)): Path<(String, String)>,
    ApiJson(draft): ApiJson<CertificationDraft>,
) -> AppResult<Json<CertificationResponse>> {
    let certification = state
        .nurse_service
        .update_certification(&principal, &user_id, &certification_id, draft)
        .await?;
    Ok(Json(certification.into()))
}

async fn delete_certification(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path((user_id, certification_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    state
        .nurse_service
        .delete_certification(&principal, &user_id, &certification_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{user_id}/profile",
            get(get_profile).post(create_profile).put(update_profile),
        )
        .route("/{user_id}/licenses", post(add_license))
        .route(
            "/{user_id}/licenses/{id}",
            put(update_license).delete(delete_license),
        )
        .route("/{user_id}/certifications", post(add_certification))
        .route(
            "/{user_id}/certifications/{id}",
            put(update_certification).delete(delete_certification),
        )
}
