//! Daily check-in endpoints.

use axum::extract::{FromRequest, Query, Request};
use axum::http::HeaderMap;
use axum::{Extension, Json};
use chrono::{NaiveDate, Utc};
use validator::Validate;

use pulsecheck_core::UserId;
use pulsecheck_db::{DailyLog, DailyLogUpsert};

use crate::crypto::try_encrypt;
use crate::error::{validation_issues, ApiError};
use crate::middleware::client_ip;
use crate::middleware::rate_limit::{enforce_rate_limit, CHECKINS_READ_LIMIT, CHECKINS_WRITE_LIMIT};
use crate::models::{
    CheckInCreateResponse, CheckInItem, CheckInListResponse, CheckInRequest, ListCheckInsQuery,
};
use crate::router::ApiState;

/// Today's date in UTC, the default log date.
pub(crate) fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

fn parse_date_param(name: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match value {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ApiError::Validation(format!("{name} must be YYYY-MM-DD"))),
    }
}

/// Store a daily check-in.
///
/// Upserts on `(user, log_date)`: submitting twice in one day updates the
/// earlier report. Minting a session here is deliberate, so a first-time
/// visitor can check in without a signup step.
#[utoipa::path(
    post,
    path = "/checkins",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Check-in stored", body = CheckInCreateResponse),
        (status = 400, description = "Invalid payload"),
        (status = 429, description = "Rate limit exceeded"),
    ),
    tag = "CheckIns"
)]
pub async fn create_checkin_handler(
    Extension(state): Extension<ApiState>,
    raw_request: Request,
) -> Result<(HeaderMap, Json<CheckInCreateResponse>), ApiError> {
    let (parts, body) = raw_request.into_parts();
    let headers = parts.headers.clone();

    let ip = client_ip(&headers);
    enforce_rate_limit(&state.limiter, "checkins:post", &ip, &CHECKINS_WRITE_LIMIT)?;

    let body_request = Request::from_parts(parts, body);
    let Json(payload) = Json::<CheckInRequest>::from_request(body_request, &())
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    payload.validate().map_err(|e| validation_issues(&e))?;

    let (identity, cookie_headers) = state.sessions.ensure_session(&state.pool, &headers).await?;

    let log_date = payload.parsed_log_date().unwrap_or_else(today_utc);
    let timezone = payload.timezone.clone().unwrap_or_else(|| "UTC".to_string());
    let notes_encrypted = payload
        .notes
        .as_deref()
        .and_then(|notes| try_encrypt(state.encryption.as_deref(), notes));

    let saved = DailyLog::upsert(
        &state.pool,
        DailyLogUpsert {
            user_id: UserId::from_uuid(identity.user_id),
            log_date,
            timezone,
            sleep_hours: payload.sleep_hours,
            social_activity: payload.social_activity.as_str().to_string(),
            screen_time_hours: payload.screen_time_hours,
            mood_rating: payload.mood_rating.map(|m| m.round() as i32),
            notes_encrypted,
        },
    )
    .await?;

    Ok((
        cookie_headers,
        Json(CheckInCreateResponse {
            ok: true,
            id: saved.id,
        }),
    ))
}

/// List the caller's check-ins, newest first.
///
/// Requires an existing session: a history read must never mint a
/// throwaway anonymous user. Encrypted notes are not returned.
#[utoipa::path(
    get,
    path = "/checkins",
    params(ListCheckInsQuery),
    responses(
        (status = 200, description = "A page of check-ins", body = CheckInListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 429, description = "Rate limit exceeded"),
    ),
    tag = "CheckIns"
)]
pub async fn list_checkins_handler(
    Extension(state): Extension<ApiState>,
    headers: HeaderMap,
    Query(query): Query<ListCheckInsQuery>,
) -> Result<Json<CheckInListResponse>, ApiError> {
    let ip = client_ip(&headers);
    enforce_rate_limit(&state.limiter, "checkins:get", &ip, &CHECKINS_READ_LIMIT)?;

    let identity = state
        .sessions
        .session_from_headers(&headers)
        .ok_or(ApiError::Unauthorized)?;

    let from = parse_date_param("from", query.from.as_deref())?;
    let to = parse_date_param("to", query.to.as_deref())?;
    let limit = query.effective_limit();

    let page = DailyLog::list(
        &state.pool,
        UserId::from_uuid(identity.user_id),
        from,
        to,
        query.cursor.as_deref(),
        limit,
    )
    .await?;

    Ok(Json(CheckInListResponse {
        items: page.items.into_iter().map(CheckInItem::from).collect(),
        next_cursor: page.next_cursor,
    }))
}
