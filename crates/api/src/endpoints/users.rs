//! Work history endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use nurseshift_common::AppResult;

use crate::{
    extractors::AuthPrincipal,
    middleware::AppState,
    response::{ApplicationResponse, EarningsResponse},
};

async fn upcoming_shifts(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<ApplicationResponse>>> {
    let entries = state
        .work_history_service
        .upcoming(&principal, &user_id)
        .await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

async fn completed_shifts(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<ApplicationResponse>>> {
    let entries = state
        .work_history_service
        .completed(&principal, &user_id)
        .await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

async fn earnings(
    AuthPrincipal(principal): AuthPrincipal,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<EarningsResponse>> {
    let summary = state
        .work_history_service
        .earnings(&principal, &user_id)
        .await?;
    Ok(Json(summary.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{user_id}/shifts/upcoming", get(upcoming_shifts))
        .route("/{user_id}/shifts/completed", get(completed_shifts))
        .route("/{user_id}/earnings", get(earnings))
}
