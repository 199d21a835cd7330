//! HTTP API layer for nurseshift.
//!
//! - **Endpoints**: accounts, facilities, nurse profiles, shifts,
//!   applications and work history
//! - **Extractors**: authenticated principal, JSON bodies and query strings
//!   that reject with [`nurseshift_common::AppError`]
//! - **Middleware**: bearer token verification
//!
//! Built on Axum 0.8. The server mounts [`router`] under `/api`.

#![allow(missing_docs)]

use axum::Router;

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};

/// The API router mounted under `/api` with bearer authentication applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
