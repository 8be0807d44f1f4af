//! Daily check-in entity model.
//!
//! One row per user per calendar day. Re-submitting a check-in for the
//! same day updates the existing row rather than inserting a second one.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, NaiveDate, Utc};
use pulsecheck_core::{CheckInId, UserId};
use sqlx::{FromRow, PgPool};

/// A stored daily check-in.
#[derive(Debug, Clone, FromRow)]
pub struct DailyLog {
    /// Unique identifier for this check-in.
    pub id: uuid::Uuid,

    /// The user who submitted it.
    pub user_id: uuid::Uuid,

    /// Calendar day the report covers.
    pub log_date: NaiveDate,

    /// IANA timezone the user reported from.
    pub timezone: String,

    /// Hours slept.
    pub sleep_hours: f64,

    /// Social activity bucket: `low`, `medium`, or `high`.
    pub social_activity: String,

    /// Hours of screen time.
    pub screen_time_hours: f64,

    /// Mood on a 1-5 scale, if reported.
    pub mood_rating: Option<i32>,

    /// Encrypted free-text notes (iv || tag || ciphertext), if any.
    pub notes_encrypted: Option<Vec<u8>>,

    /// When the row was first created.
    pub created_at: DateTime<Utc>,

    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating a day's check-in.
#[derive(Debug, Clone)]
pub struct DailyLogUpsert {
    pub user_id: UserId,
    pub log_date: NaiveDate,
    pub timezone: String,
    pub sleep_hours: f64,
    pub social_activity: String,
    pub screen_time_hours: f64,
    pub mood_rating: Option<i32>,
    pub notes_encrypted: Option<Vec<u8>>,
}

/// One page of check-ins plus the cursor for the next (older) page.
#[derive(Debug, Clone)]
pub struct DailyLogPage {
    pub items: Vec<DailyLog>,
    pub next_cursor: Option<String>,
}

/// Encode a pagination cursor from the last seen log date.
#[must_use]
pub fn encode_cursor(date: NaiveDate) -> String {
    STANDARD.encode(date.format("%Y-%m-%d").to_string())
}

/// Decode a pagination cursor back to a date. Invalid cursors are treated
/// as absent rather than failing the request.
#[must_use]
pub fn decode_cursor(cursor: &str) -> Option<NaiveDate> {
    let bytes = STANDARD.decode(cursor).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    NaiveDate::parse_from_str(&text, "%Y-%m-%d").ok()
}

impl DailyLog {
    /// Get the check-in ID as a typed [`CheckInId`].
    #[must_use]
    pub fn check_in_id(&self) -> CheckInId {
        CheckInId::from_uuid(self.id)
    }

    /// Insert or update the check-in for `(user_id, log_date)`.
    pub async fn upsert(pool: &PgPool, input: DailyLogUpsert) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r#"
            INSERT INTO daily_logs (
                id, user_id, log_date, timezone,
                sleep_hours, social_activity, screen_time_hours, mood_rating,
                notes_encrypted
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id, log_date)
            DO UPDATE SET
                timezone = EXCLUDED.timezone,
                sleep_hours = EXCLUDED.sleep_hours,
                social_activity = EXCLUDED.social_activity,
                screen_time_hours = EXCLUDED.screen_time_hours,
                mood_rating = EXCLUDED.mood_rating,
                notes_encrypted = EXCLUDED.notes_encrypted,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(uuid::Uuid::new_v4())
        .bind(input.user_id.as_uuid())
        .bind(input.log_date)
        .bind(&input.timezone)
        .bind(input.sleep_hours)
        .bind(&input.social_activity)
        .bind(input.screen_time_hours)
        .bind(input.mood_rating)
        .bind(input.notes_encrypted.as_deref())
        .fetch_one(pool)
        .await
    }

    /// List a user's check-ins newest-first with keyset pagination.
    ///
    /// `cursor` is the base64 date cursor from a previous page; results
    /// are strictly older than it. Fetches `limit + 1` rows to detect
    /// whether another page exists.
    pub async fn list(
        pool: &PgPool,
        user_id: UserId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        cursor: Option<&str>,
        limit: i64,
    ) -> Result<DailyLogPage, sqlx::Error> {
        let before = cursor.and_then(decode_cursor);

        let rows: Vec<DailyLog> = sqlx::query_as(
            r#"
            SELECT *
            FROM daily_logs
            WHERE user_id = $1
              AND ($2::date IS NULL OR log_date >= $2)
              AND ($3::date IS NULL OR log_date <= $3)
              AND ($4::date IS NULL OR log_date < $4)
            ORDER BY log_date DESC
            LIMIT $5
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(from)
        .bind(to)
        .bind(before)
        .bind(limit + 1)
        .fetch_all(pool)
        .await?;

        let has_more = rows.len() as i64 > limit;
        let mut items = rows;
        if has_more {
            items.truncate(limit as usize);
        }
        let next_cursor = if has_more {
            items.last().map(|log| encode_cursor(log.log_date))
        } else {
            None
        };

        Ok(DailyLogPage { items, next_cursor })
    }

    /// Fetch a user's check-ins since `from` (inclusive), oldest first.
    ///
    /// Used by the trends endpoint, which needs a bounded window in
    /// chronological order.
    pub async fn list_since(
        pool: &PgPool,
        user_id: UserId,
        from: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT *
            FROM daily_logs
            WHERE user_id = $1 AND log_date >= $2
            ORDER BY log_date ASC
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(from)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_round_trip() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();
        let cursor = encode_cursor(date);
        assert_eq!(decode_cursor(&cursor), Some(date));
    }

    #[test]
    fn test_cursor_is_base64_of_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();
        let cursor = encode_cursor(date);
        let decoded = STANDARD.decode(cursor).unwrap();
        assert_eq!(decoded, b"2026-02-06");
    }

    #[test]
    fn test_invalid_cursor_decodes_to_none() {
        assert_eq!(decode_cursor("!!!not-base64!!!"), None);
        // Valid base64, but not a date
        assert_eq!(decode_cursor(&STANDARD.encode("hello")), None);
    }
}
