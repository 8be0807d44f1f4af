//! Database connection pool setup.

use crate::error::DbError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Connect a Postgres pool with pulsecheck's defaults.
///
/// `max_connections` is deployment-tuned (the binary passes its configured
/// value); idle connections are reaped after 30 seconds.
pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<PgPool, DbError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(DbError::ConnectionFailed)
}
