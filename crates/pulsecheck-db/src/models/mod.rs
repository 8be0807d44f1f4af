//! Entity models and their queries.

pub mod auth_identity;
pub mod daily_log;
pub mod prediction;
pub mod user;

pub use auth_identity::AuthIdentity;
pub use daily_log::{DailyLog, DailyLogPage, DailyLogUpsert};
pub use prediction::{NewPrediction, Prediction};
pub use user::User;
