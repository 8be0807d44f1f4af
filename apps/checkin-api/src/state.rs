//! Application state shared by the health endpoints.

use sqlx::PgPool;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

/// State for the service-level endpoints (health, readiness).
///
/// Cloned per request; the inner resources are cheaply shareable.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,

    /// Application version from Cargo.toml.
    pub version: &'static str,

    /// Service startup time for uptime calculation.
    pub startup_time: Arc<Instant>,

    /// Whether the service is shutting down (readiness drains traffic).
    pub shutting_down: Arc<AtomicBool>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            version: env!("CARGO_PKG_VERSION"),
            startup_time: Arc::new(Instant::now()),
            shutting_down: Arc::new(AtomicBool::new(false)),
        }
    }
}
