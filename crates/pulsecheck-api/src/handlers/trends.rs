//! Trend series endpoint.

use axum::extract::Query;
use axum::http::HeaderMap;
use axum::{Extension, Json};
use chrono::Duration;

use pulsecheck_core::UserId;
use pulsecheck_db::DailyLog;
use pulsecheck_risk::{assess, CheckInObservation, SocialActivity};

use crate::error::ApiError;
use crate::handlers::checkins::today_utc;
use crate::models::{TrendsQuery, TrendsResponse};
use crate::router::ApiState;
use crate::trends::{build_daily_series, DayObservation};

/// Daily risk/mood series over the trailing window.
///
/// Scores are recomputed from the stored check-in inputs with the current
/// rule set, so the chart always reflects the live engine rather than
/// whatever was persisted at submission time.
#[utoipa::path(
    get,
    path = "/checkins/trends",
    params(TrendsQuery),
    responses(
        (status = 200, description = "Daily trend series", body = TrendsResponse),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "CheckIns"
)]
pub async fn trends_handler(
    Extension(state): Extension<ApiState>,
    headers: HeaderMap,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<TrendsResponse>, ApiError> {
    let identity = state
        .sessions
        .session_from_headers(&headers)
        .ok_or(ApiError::Unauthorized)?;

    let days = query.effective_days();
    let today = today_utc();
    let from = today - Duration::days(days - 1);

    let logs =
        DailyLog::list_since(&state.pool, UserId::from_uuid(identity.user_id), from).await?;

    let observations: Vec<DayObservation> = logs
        .into_iter()
        .filter_map(|log| {
            let social_activity: SocialActivity = log.social_activity.parse().ok()?;
            let assessment = assess(&CheckInObservation {
                sleep_hours: log.sleep_hours,
                social_activity,
                screen_time_hours: log.screen_time_hours,
                mood_rating: log.mood_rating.map(f64::from),
            });
            Some(DayObservation {
                date: log.log_date,
                risk_score: assessment.score,
                mood_rating: log.mood_rating,
            })
        })
        .collect();

    Ok(Json(TrendsResponse {
        days,
        points: build_daily_series(&observations, days, today),
    }))
}
