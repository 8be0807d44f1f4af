//! Stored risk prediction entity model.

use chrono::{DateTime, Utc};
use pulsecheck_core::{PredictionId, UserId};
use sqlx::{FromRow, PgPool};

/// A persisted risk assessment.
///
/// Keeps the model name/version so assessments remain interpretable if
/// the scoring rules ever change. Features and explanation are stored as
/// encrypted envelopes only.
#[derive(Debug, Clone, FromRow)]
pub struct Prediction {
    /// Unique identifier for this prediction.
    pub id: uuid::Uuid,

    /// The user the prediction was computed for.
    pub user_id: uuid::Uuid,

    /// The check-in the prediction was derived from, when one was stored.
    pub daily_log_id: Option<uuid::Uuid>,

    /// Scoring model identifier, e.g. `heuristic-risk`.
    pub model_name: String,

    /// Scoring model version, e.g. `v1`.
    pub model_version: String,

    /// Derived risk level: `low`, `medium`, or `high`.
    pub risk_level: String,

    /// Numeric risk score.
    pub risk_score: i32,

    /// Encrypted input features (iv || tag || ciphertext), if a data key
    /// was configured at assessment time.
    pub features_encrypted: Option<Vec<u8>>,

    /// Encrypted triggered-reasons payload, same envelope.
    pub explanation_encrypted: Option<Vec<u8>>,

    /// When the prediction was stored.
    pub created_at: DateTime<Utc>,
}

/// Input for persisting a new prediction.
#[derive(Debug, Clone)]
pub struct NewPrediction {
    pub user_id: UserId,
    pub daily_log_id: Option<uuid::Uuid>,
    pub model_name: String,
    pub model_version: String,
    pub risk_level: String,
    pub risk_score: i32,
    pub features_encrypted: Option<Vec<u8>>,
    pub explanation_encrypted: Option<Vec<u8>>,
}

impl Prediction {
    /// Get the prediction ID as a typed [`PredictionId`].
    #[must_use]
    pub fn prediction_id(&self) -> PredictionId {
        PredictionId::from_uuid(self.id)
    }

    /// Persist a new prediction.
    pub async fn create(pool: &PgPool, input: NewPrediction) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r#"
            INSERT INTO predictions (
                id, user_id, daily_log_id,
                model_name, model_version,
                risk_level, risk_score,
                features_encrypted, explanation_encrypted
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(uuid::Uuid::new_v4())
        .bind(input.user_id.as_uuid())
        .bind(input.daily_log_id)
        .bind(&input.model_name)
        .bind(&input.model_version)
        .bind(&input.risk_level)
        .bind(input.risk_score)
        .bind(input.features_encrypted.as_deref())
        .bind(input.explanation_encrypted.as_deref())
        .fetch_one(pool)
        .await
    }

    /// List a user's most recent predictions, newest first.
    pub async fn list_recent(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT *
            FROM predictions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
