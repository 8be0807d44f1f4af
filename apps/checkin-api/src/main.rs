//! pulsecheck check-in API
//!
//! A wellness check-in service built with Axum: daily self-reports in,
//! heuristic risk assessments and trend series out, with anonymous-first
//! cookie sessions bridged to Google identities on request.

mod config;
mod health;
mod logging;
mod openapi;
mod state;

use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::get;
use axum::{Extension, Router};
use config::Config;
use health::{health_handler, healthz_handler, readyz_handler};
use openapi::swagger_routes;
use pulsecheck_api::{
    api_router, ApiState, GoogleProvider, NotesEncryption, OAuthStateSigner, RateLimiter,
    SessionService,
};
use pulsecheck_auth::SessionKey;
use state::AppState;
use std::net::SocketAddr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Interval between rate limiter cleanup sweeps.
const LIMITER_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {e}");
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.log_filter);
    info!(environment = %config.environment, "Starting pulsecheck check-in API");

    let session_key = match SessionKey::from_secret_str(&config.auth_jwt_secret) {
        Ok(key) => key,
        Err(e) => {
            eprintln!("FATAL: AUTH_JWT_SECRET is unusable: {e}");
            std::process::exit(1);
        }
    };

    let encryption = match config.data_encryption_key.as_deref() {
        Some(secret) => match NotesEncryption::from_secret_str(secret) {
            Ok(enc) => Some(Arc::new(enc)),
            Err(e) => {
                eprintln!("FATAL: DATA_ENCRYPTION_KEY is unusable: {e}");
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("DATA_ENCRYPTION_KEY not set; notes and features will not be stored");
            None
        }
    };

    let google = match (
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        config.google_redirect_url.clone(),
    ) {
        (Some(id), Some(secret), Some(redirect)) => {
            info!("Google identity bridging enabled");
            Some(Arc::new(GoogleProvider::new(id, secret, redirect)))
        }
        _ => {
            info!("Google identity bridging disabled (no client configured)");
            None
        }
    };

    let pool = match pulsecheck_db::connect_pool(
        &config.database_url,
        config.database_max_connections,
    )
    .await
    {
        Ok(pool) => {
            info!("Database connection established");
            pool
        }
        Err(e) => {
            eprintln!("FATAL: Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = pulsecheck_db::run_migrations(&pool).await {
        eprintln!("FATAL: Migrations failed: {e}");
        std::process::exit(1);
    }

    let limiter = RateLimiter::new();
    {
        // Background sweep so abandoned client buckets do not accumulate
        let cleanup_limiter = limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(LIMITER_CLEANUP_INTERVAL);
            loop {
                interval.tick().await;
                cleanup_limiter.cleanup(Duration::from_secs(60));
            }
        });
    }

    let api_state = ApiState {
        pool: pool.clone(),
        sessions: Arc::new(SessionService::new(
            session_key.clone(),
            config.secure_cookies(),
        )),
        limiter,
        encryption,
        email_pepper: config.auth_email_pepper.clone(),
        google,
        oauth_state: OAuthStateSigner::new(session_key),
    };

    let app_state = AppState::new(pool);
    let shutting_down: Arc<AtomicBool> = app_state.shutting_down.clone();

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/healthz", get(healthz_handler))
        .route("/readyz", get(readyz_handler))
        .merge(api_router(api_state))
        .merge(swagger_routes())
        .layer(Extension(app_state))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = match config.bind_addr().parse() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("FATAL: Invalid bind address '{}': {e}", config.bind_addr());
            std::process::exit(1);
        }
    };

    info!(%addr, "Server listening");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("FATAL: Failed to bind to {addr}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutting_down))
        .await
    {
        eprintln!("FATAL: Server error: {e}");
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// Graceful shutdown signal handler.
///
/// Sets the `shutting_down` flag before returning so the readiness probe
/// reports unavailable and traffic drains before connections close.
async fn shutdown_signal(shutting_down: Arc<AtomicBool>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }

    shutting_down.store(true, std::sync::atomic::Ordering::Release);
    info!("Readiness probe set to unhealthy, draining traffic");
}
