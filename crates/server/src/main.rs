//! nurseshift server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use nurseshift_api::AppState;
use nurseshift_common::Config;
use nurseshift_core::{
    ApplicationService, AuthService, FacilityService, NurseService, ShiftService, TokenService,
    WorkHistoryService,
};
use nurseshift_db::repositories::{
    ApplicationRepository, CertificationRepository, FacilityRepository, LicenseRepository,
    NurseProfileRepository, ShiftRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Request bodies above this size are rejected with 413.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nurseshift=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting nurseshift server...");

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;
    let timezone = config.display_timezone()?;

    // Connect to database
    let db = nurseshift_db::init(&config)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    nurseshift_db::migrate(&db)
        .await
        .context("failed to run migrations")?;
    info!("Migrations completed");

    let db = Arc::new(db);

    // Initialize repositories
    let user_repo = UserRepository::new(Arc::clone(&db));
    let profile_repo = NurseProfileRepository::new(Arc::clone(&db));
    let license_repo = LicenseRepository::new(Arc::clone(&db));
    let certification_repo = CertificationRepository::new(Arc::clone(&db));
    let facility_repo = FacilityRepository::new(Arc::clone(&db));
    let shift_repo = ShiftRepository::new(Arc::clone(&db));
    let application_repo = ApplicationRepository::new(Arc::clone(&db));

    // Initialize services
    let tokens = TokenService::new(&config);
    let auth_service = AuthService::new(
        Arc::clone(&db),
        user_repo.clone(),
        profile_repo.clone(),
        tokens.clone(),
    );
    let facility_service = FacilityService::new(facility_repo.clone(), tokens.clone());
    let nurse_service = NurseService::new(
        user_repo.clone(),
        profile_repo.clone(),
        license_repo,
        certification_repo,
    );
    let shift_service = ShiftService::new(
        shift_repo.clone(),
        facility_repo,
        application_repo.clone(),
        profile_repo.clone(),
        user_repo,
        timezone,
    );
    let application_service = ApplicationService::new(
        Arc::clone(&db),
        application_repo.clone(),
        shift_repo.clone(),
        profile_repo.clone(),
        timezone,
    );
    let work_history_service =
        WorkHistoryService::new(application_repo, shift_repo, profile_repo, timezone);

    let state = AppState {
        db,
        tokens,
        auth_service,
        facility_service,
        nurse_service,
        shift_service,
        application_service,
        work_history_service,
    };

    // Build router
    let app = nurseshift_api::app(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server.host))?;
    info!(display_timezone = %timezone, "Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
