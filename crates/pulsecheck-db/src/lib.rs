//! Postgres persistence layer for pulsecheck.
//!
//! Provides connection pooling, embedded migrations, and the entity models
//! (`User`, `AuthIdentity`, `DailyLog`, `Prediction`) with their queries.
//! All queries are parameterized `sqlx::query_as` calls; models derive
//! [`sqlx::FromRow`] and expose their queries as associated functions
//! taking a `&PgPool`.
//!
//! # Example
//!
//! ```rust,ignore
//! use pulsecheck_db::{connect_pool, run_migrations, User};
//!
//! let pool = connect_pool("postgres://localhost/pulsecheck", 10).await?;
//! run_migrations(&pool).await?;
//! let user = User::create_anonymous(&pool).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod models;
pub mod pool;

pub use error::DbError;
pub use migrations::run_migrations;
pub use models::{AuthIdentity, DailyLog, DailyLogPage, DailyLogUpsert, NewPrediction, Prediction, User};
pub use pool::connect_pool;
