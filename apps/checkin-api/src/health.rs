//! Health and readiness endpoints.

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::state::AppState;

/// Timeout for the readiness database ping.
const DB_PING_TIMEOUT: Duration = Duration::from_secs(2);

async fn db_ping(state: &AppState) -> bool {
    let ping = sqlx::query("SELECT 1").execute(&state.db);
    matches!(tokio::time::timeout(DB_PING_TIMEOUT, ping).await, Ok(Ok(_)))
}

/// Full health report: status, version, uptime, and database reachability.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<Value> {
    let database_ok = db_ping(&state).await;

    Json(json!({
        "status": if database_ok { "healthy" } else { "degraded" },
        "version": state.version,
        "uptime_seconds": state.startup_time.elapsed().as_secs(),
        "database": if database_ok { "ok" } else { "error" },
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Liveness probe: the process is up and serving.
pub async fn healthz_handler() -> &'static str {
    "ok"
}

/// Readiness probe: fails while shutting down or when the database is
/// unreachable, so the load balancer drains traffic.
pub async fn readyz_handler(
    Extension(state): Extension<AppState>,
) -> Result<&'static str, StatusCode> {
    if state.shutting_down.load(Ordering::Acquire) {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    if !db_ping(&state).await {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    Ok("ready")
}
