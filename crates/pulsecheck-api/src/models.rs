//! Request and response DTOs for the pulsecheck API.

use chrono::{DateTime, NaiveDate, Utc};
use pulsecheck_risk::{CheckInObservation, RiskAssessment, RiskLevel, SocialActivity};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Check-in submission payload.
///
/// The schema validation here is the gate in front of the risk engine:
/// anything that deserializes and validates is safe to score.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    /// Hours slept, 0-24.
    #[validate(range(min = 0.0, max = 24.0, message = "sleepHours must be between 0 and 24"))]
    pub sleep_hours: f64,

    /// Social activity bucket for the day.
    pub social_activity: SocialActivity,

    /// Hours of screen time, 0-24.
    #[validate(range(
        min = 0.0,
        max = 24.0,
        message = "screenTimeHours must be between 0 and 24"
    ))]
    pub screen_time_hours: f64,

    /// Mood on a 1-5 scale, optional.
    #[validate(range(min = 1.0, max = 5.0, message = "moodRating must be between 1 and 5"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_rating: Option<f64>,

    /// Day the report covers (`YYYY-MM-DD`); defaults to today UTC.
    #[validate(custom(function = validate_log_date))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_date: Option<String>,

    /// IANA timezone name; defaults to `UTC`.
    #[validate(length(min = 1, message = "timezone must not be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Free-text notes, stored encrypted only.
    #[validate(length(max = 4000, message = "notes must be at most 4000 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn validate_log_date(value: &str) -> Result<(), ValidationError> {
    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
        return Ok(());
    }
    let mut err = ValidationError::new("log_date");
    err.message = Some("logDate must be YYYY-MM-DD".into());
    Err(err)
}

impl CheckInRequest {
    /// The engine-facing subset of this request.
    #[must_use]
    pub fn observation(&self) -> CheckInObservation {
        CheckInObservation {
            sleep_hours: self.sleep_hours,
            social_activity: self.social_activity,
            screen_time_hours: self.screen_time_hours,
            mood_rating: self.mood_rating,
        }
    }

    /// Parsed log date, when one was supplied.
    ///
    /// Validation runs before this, so a `Some` here always parses.
    #[must_use]
    pub fn parsed_log_date(&self) -> Option<NaiveDate> {
        self.log_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }
}

/// Response to a stored check-in.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckInCreateResponse {
    pub ok: bool,
    pub id: Uuid,
}

/// One stored check-in, as returned by the list endpoint.
///
/// Encrypted notes are deliberately absent.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInItem {
    pub id: Uuid,
    pub log_date: NaiveDate,
    pub timezone: String,
    pub sleep_hours: f64,
    pub social_activity: String,
    pub screen_time_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_rating: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<pulsecheck_db::DailyLog> for CheckInItem {
    fn from(log: pulsecheck_db::DailyLog) -> Self {
        Self {
            id: log.id,
            log_date: log.log_date,
            timezone: log.timezone,
            sleep_hours: log.sleep_hours,
            social_activity: log.social_activity,
            screen_time_hours: log.screen_time_hours,
            mood_rating: log.mood_rating,
            created_at: log.created_at,
            updated_at: log.updated_at,
        }
    }
}

/// A page of check-ins.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInListResponse {
    pub items: Vec<CheckInItem>,
    pub next_cursor: Option<String>,
}

/// Query parameters for listing check-ins.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListCheckInsQuery {
    /// Page size, clamped to [1, 100]; defaults to 50.
    pub limit: Option<i64>,
    /// Earliest log date to include (`YYYY-MM-DD`).
    pub from: Option<String>,
    /// Latest log date to include (`YYYY-MM-DD`).
    pub to: Option<String>,
    /// Opaque cursor from a previous page.
    pub cursor: Option<String>,
}

impl ListCheckInsQuery {
    /// Effective page size.
    #[must_use]
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 100)
    }
}

/// A computed risk assessment plus its presentation fields.
#[derive(Debug, Serialize, ToSchema)]
pub struct RiskResponse {
    pub score: u32,
    pub level: RiskLevel,
    /// Display label for the level ("Low"/"Medium"/"High").
    pub label: String,
    /// Badge style classes for the level.
    pub style: String,
    pub reasons: Vec<String>,
}

impl From<RiskAssessment> for RiskResponse {
    fn from(assessment: RiskAssessment) -> Self {
        Self {
            score: assessment.score,
            level: assessment.level,
            label: assessment.level.label().to_string(),
            style: assessment.level.style_classes().to_string(),
            reasons: assessment.reasons,
        }
    }
}

/// Prediction submission payload.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PredictionRequest {
    #[validate(nested)]
    pub input: CheckInRequest,
}

/// Response to a stored prediction.
#[derive(Debug, Serialize, ToSchema)]
pub struct PredictionCreateResponse {
    pub prediction: RiskResponse,
}

/// One stored prediction, as returned by the list endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionItem {
    pub id: Uuid,
    pub model_name: String,
    pub model_version: String,
    pub risk_level: String,
    pub risk_score: i32,
    pub created_at: DateTime<Utc>,
}

impl From<pulsecheck_db::Prediction> for PredictionItem {
    fn from(prediction: pulsecheck_db::Prediction) -> Self {
        Self {
            id: prediction.id,
            model_name: prediction.model_name,
            model_version: prediction.model_version,
            risk_level: prediction.risk_level,
            risk_score: prediction.risk_score,
            created_at: prediction.created_at,
        }
    }
}

/// A page of stored predictions.
#[derive(Debug, Serialize, ToSchema)]
pub struct PredictionListResponse {
    pub items: Vec<PredictionItem>,
    pub limit: i64,
}

/// Query parameters for listing predictions.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPredictionsQuery {
    /// Page size, clamped to [1, 100]; defaults to 20.
    pub limit: Option<i64>,
}

impl ListPredictionsQuery {
    /// Effective page size.
    #[must_use]
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

/// The session's user, as reported by auth endpoints.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub is_anonymous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Response to creating an anonymous session.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnonymousSessionResponse {
    pub user: SessionUser,
    pub ok: bool,
}

/// Response for GET /auth/me.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

/// Generic acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

/// Query parameters for the trends endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct TrendsQuery {
    /// Number of trailing days, clamped to [1, 90]; defaults to 14.
    pub days: Option<i64>,
}

impl TrendsQuery {
    /// Effective window size.
    #[must_use]
    pub fn effective_days(&self) -> i64 {
        self.days.unwrap_or(14).clamp(1, 90)
    }
}

/// One day in a trend series.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Calendar day (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Short display label, e.g. "Feb 6".
    pub label: String,
    /// Risk score for the day's check-in, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<u32>,
    /// Mood rating for the day's check-in, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_rating: Option<i32>,
}

/// Trend series response.
#[derive(Debug, Serialize, ToSchema)]
pub struct TrendsResponse {
    pub days: i64,
    pub points: Vec<TrendPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> CheckInRequest {
        CheckInRequest {
            sleep_hours: 7.5,
            social_activity: SocialActivity::High,
            screen_time_hours: 3.0,
            mood_rating: None,
            log_date: None,
            timezone: None,
            notes: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(base_request().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_sleep_is_rejected() {
        let mut request = base_request();
        request.sleep_hours = 25.0;
        assert!(request.validate().is_err());

        request.sleep_hours = -1.0;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_mood_range_is_validated_when_present() {
        let mut request = base_request();
        request.mood_rating = Some(0.5);
        assert!(request.validate().is_err());

        request.mood_rating = Some(3.0);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_bad_log_date_is_rejected() {
        let mut request = base_request();
        request.log_date = Some("06-02-2026".to_string());
        assert!(request.validate().is_err());

        request.log_date = Some("2026-02-06".to_string());
        assert!(request.validate().is_ok());
        assert_eq!(
            request.parsed_log_date(),
            NaiveDate::from_ymd_opt(2026, 2, 6)
        );
    }

    #[test]
    fn test_empty_timezone_is_rejected() {
        let mut request = base_request();
        request.timezone = Some(String::new());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_oversized_notes_are_rejected() {
        let mut request = base_request();
        request.notes = Some("x".repeat(4001));
        assert!(request.validate().is_err());

        request.notes = Some("x".repeat(4000));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_observation_projection_preserves_fields() {
        let mut request = base_request();
        request.mood_rating = Some(2.0);
        let obs = request.observation();
        assert_eq!(obs.sleep_hours, 7.5);
        assert_eq!(obs.social_activity, SocialActivity::High);
        assert_eq!(obs.mood_rating, Some(2.0));
    }

    #[test]
    fn test_limit_clamping() {
        let query = ListCheckInsQuery {
            limit: Some(1000),
            from: None,
            to: None,
            cursor: None,
        };
        assert_eq!(query.effective_limit(), 100);

        let query = ListCheckInsQuery {
            limit: Some(0),
            from: None,
            to: None,
            cursor: None,
        };
        assert_eq!(query.effective_limit(), 1);

        let query = ListCheckInsQuery {
            limit: None,
            from: None,
            to: None,
            cursor: None,
        };
        assert_eq!(query.effective_limit(), 50);
    }

    #[test]
    fn test_trends_days_clamping() {
        assert_eq!(TrendsQuery { days: None }.effective_days(), 14);
        assert_eq!(TrendsQuery { days: Some(365) }.effective_days(), 90);
        assert_eq!(TrendsQuery { days: Some(0) }.effective_days(), 1);
    }

    #[test]
    fn test_risk_response_carries_presentation_fields() {
        let assessment = pulsecheck_risk::assess(&CheckInObservation {
            sleep_hours: 5.0,
            social_activity: SocialActivity::Low,
            screen_time_hours: 9.0,
            mood_rating: Some(1.0),
        });
        let response = RiskResponse::from(assessment);
        assert_eq!(response.level, RiskLevel::High);
        assert_eq!(response.label, "High");
        assert!(response.style.contains("rose"));
    }
}
