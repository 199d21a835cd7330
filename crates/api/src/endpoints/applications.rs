//! Application endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use nurseshift_common::AppResult;

use super::shifts::StatusRequest;
use crate::{
    extractors::{ApiJson, AuthPrincipal},
    middleware::AppState,
    response::ApplicationResponse,
};

/// The calling nurse's applications, newest first.
async fn list_mine(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ApplicationResponse>>> {
    let applications = state.application_service.list_mine(&principal).await?;
    Ok(Json(applications.into_iter().map(Into::into).collect()))
}

async fn get_application(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApplicationResponse>> {
    let application = state.application_service.get(&principal, &id).await?;
    Ok(Json(application.into()))
}

/// Approve, reject or withdraw.
async fn update_status(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<StatusRequest>,
) -> AppResult<Json<ApplicationResponse>> {
    let application = state
        .application_service
        .update_status(&principal, &id, &req.status)
        .await?;
    Ok(Json(application.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_mine))
        .route("/{id}", get(get_application).patch(update_status))
}
