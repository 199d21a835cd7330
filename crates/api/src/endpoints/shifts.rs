//! Shift endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post, put},
};
use nurseshift_common::AppResult;
use nurseshift_core::shift::{ApplyInput, CreateShiftInput, ShiftQuery, UpdateShiftInput};
use serde::Deserialize;

use crate::{
    extractors::{ApiJson, ApiQuery, AuthPrincipal},
    middleware::AppState,
    response::{ApplicantResponse, ApplicationResponse, ShiftResponse, created},
};

/// Status change request, shared with the applications router.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// Browse open shifts.
async fn list_shifts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ShiftQuery>,
) -> AppResult<Json<Vec<ShiftResponse>>> {
    let listings = state.shift_service.list_open(query).await?;
    Ok(Json(listings.into_iter().map(Into::into).collect()))
}

async fn get_shift(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ShiftResponse>> {
    let listing = state.shift_service.get(&id).await?;
    Ok(Json(listing.into()))
}

async fn create_shift(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateShiftInput>,
) -> AppResult<(StatusCode, Json<ShiftResponse>)> {
    let shift = state.shift_service.create(&principal, input).await?;
    Ok(created(shift.into()))
}

async fn update_shift(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateShiftInput>,
) -> AppResult<Json<ShiftResponse>> {
    let shift = state.shift_service.update(&principal, &id, input).await?;
    Ok(Json(shift.into()))
}

async fn delete_shift(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.shift_service.delete(&principal, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Every shift a facility has posted.
async fn facility_shifts(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path(facility_id): Path<String>,
) -> AppResult<Json<Vec<ShiftResponse>>> {
    let listings = state
        .shift_service
        .list_for_facility(&principal, &facility_id)
        .await?;
    Ok(Json(listings.into_iter().map(Into::into).collect()))
}

async fn update_status(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<StatusRequest>,
) -> AppResult<Json<ShiftResponse>> {
    let shift = state
        .shift_service
        .update_status(&principal, &id, &req.status)
        .await?;
    Ok(Json(shift.into()))
}

/// Apply to a shift as the calling nurse.
async fn apply(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ApplyInput>,
) -> AppResult<(StatusCode, Json<ApplicationResponse>)> {
    let application = state.shift_service.apply(&principal, &id, input).await?;
    Ok(created(application.into()))
}

async fn applications(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<ApplicantResponse>>> {
    let applicants = state.shift_service.applications(&principal, &id).await?;
    Ok(Json(applicants.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_shifts).post(create_shift))
        .route("/{id}", get(get_shift).delete(delete_shift))
        .route("/edit/{id}", put(update_shift))
        .route("/facility/{facility_id}", get(facility_shifts))
        .route("/{id}/status", patch(update_status))
        .route("/{id}/apply", post(apply))
        .route("/{id}/applications", get(applications))
}
