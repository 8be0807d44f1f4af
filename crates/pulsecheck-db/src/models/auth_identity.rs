//! OAuth identity entity model.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

/// A link between a user and an external OAuth identity.
///
/// `(provider, subject)` is unique: one Google account can belong to at
/// most one pulsecheck user. Emails are stored only as an HMAC.
#[derive(Debug, Clone, FromRow)]
pub struct AuthIdentity {
    /// Unique identifier for this identity row.
    pub id: uuid::Uuid,

    /// The user this identity belongs to.
    pub user_id: uuid::Uuid,

    /// Provider name, e.g. `google`.
    pub provider: String,

    /// Provider-assigned stable subject identifier.
    pub subject: String,

    /// HMAC-SHA-256 of the normalized email, when a pepper is configured.
    pub email_hmac: Option<String>,

    /// When the identity was linked.
    pub created_at: DateTime<Utc>,
}

impl AuthIdentity {
    /// Find an identity by provider and subject.
    pub async fn find_by_provider_subject(
        pool: &PgPool,
        provider: &str,
        subject: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM auth_identities WHERE provider = $1 AND subject = $2")
            .bind(provider)
            .bind(subject)
            .fetch_optional(pool)
            .await
    }

    /// Attach an identity to an existing user.
    pub async fn create_for_user(
        pool: &PgPool,
        user_id: uuid::Uuid,
        provider: &str,
        subject: &str,
        email_hmac: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r#"
            INSERT INTO auth_identities (id, user_id, provider, subject, email_hmac)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(uuid::Uuid::new_v4())
        .bind(user_id)
        .bind(provider)
        .bind(subject)
        .bind(email_hmac)
        .fetch_one(pool)
        .await
    }
}
