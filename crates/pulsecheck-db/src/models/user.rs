//! User entity model.
//!
//! Users are created anonymously on first write and may later be bridged
//! to an OAuth identity, which flips `is_anonymous` while keeping the id
//! (and all check-in history) stable.

use chrono::{DateTime, Utc};
use pulsecheck_core::UserId;
use sqlx::{FromRow, PgPool};

/// A user account.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Unique identifier for the user.
    pub id: uuid::Uuid,

    /// Whether the account has no linked OAuth identity yet.
    pub is_anonymous: bool,

    /// Account status; only `active` users can authenticate.
    pub status: String,

    /// When the user was created.
    pub created_at: DateTime<Utc>,

    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Get the user ID as a typed [`UserId`].
    #[must_use]
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.id)
    }

    /// Create a fresh anonymous user.
    pub async fn create_anonymous(pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r#"
            INSERT INTO users (id, is_anonymous)
            VALUES ($1, TRUE)
            RETURNING *
            "#,
        )
        .bind(uuid::Uuid::new_v4())
        .fetch_one(pool)
        .await
    }

    /// Find an active user by ID.
    ///
    /// Deactivated accounts are treated as missing so stale session
    /// cookies cannot resurrect them.
    pub async fn find_active_by_id(
        pool: &PgPool,
        id: uuid::Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE id = $1 AND status = 'active'")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the active user owning the given OAuth identity, if any.
    pub async fn find_by_identity(
        pool: &PgPool,
        provider: &str,
        subject: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT u.*
            FROM users u
            JOIN auth_identities ai ON ai.user_id = u.id
            WHERE ai.provider = $1 AND ai.subject = $2 AND u.status = 'active'
            "#,
        )
        .bind(provider)
        .bind(subject)
        .fetch_optional(pool)
        .await
    }

    /// Create a non-anonymous user together with its OAuth identity, in
    /// one transaction.
    pub async fn create_with_identity(
        pool: &PgPool,
        provider: &str,
        subject: &str,
        email_hmac: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (id, is_anonymous)
            VALUES ($1, FALSE)
            RETURNING *
            "#,
        )
        .bind(uuid::Uuid::new_v4())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO auth_identities (id, user_id, provider, subject, email_hmac)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(uuid::Uuid::new_v4())
        .bind(user.id)
        .bind(provider)
        .bind(subject)
        .bind(email_hmac)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    /// Mark a user as no longer anonymous (after identity linking).
    pub async fn mark_linked(pool: &PgPool, id: uuid::Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET is_anonymous = FALSE, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
