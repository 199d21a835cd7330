//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use nurseshift_core::{
    ApplicationService, AuthService, FacilityService, NurseService, Principal, ShiftService,
    TokenKind, TokenService, WorkHistoryService,
};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub tokens: TokenService,
    pub auth_service: AuthService,
    pub facility_service: FacilityService,
    pub nurse_service: NurseService,
    pub shift_service: ShiftService,
    pub application_service: ApplicationService,
    pub work_history_service: WorkHistoryService,
}

/// Authentication middleware.
///
/// A valid access token puts its [`Principal`] into the request extensions.
/// Missing or invalid tokens are left for the extractors to reject, so
/// public routes stay reachable.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    if let Some(token) = token {
        match state.tokens.verify(token, TokenKind::Access) {
            Ok(claims) => {
                req.extensions_mut().insert(Principal::from_claims(&claims));
            }
            Err(e) => {
                tracing::debug!(error = %e, path = %req.uri().path(), "Ignoring bearer token");
            }
        }
    }

    next.run(req).await
}
