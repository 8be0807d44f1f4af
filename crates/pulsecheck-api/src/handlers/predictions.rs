//! Stored prediction endpoints.

use axum::extract::{FromRequest, Query, Request};
use axum::http::HeaderMap;
use axum::{Extension, Json};
use validator::Validate;

use pulsecheck_core::UserId;
use pulsecheck_db::Prediction;
use pulsecheck_risk::assess;

use crate::error::{validation_issues, ApiError};
use crate::handlers::risk::store_prediction;
use crate::middleware::client_ip;
use crate::middleware::rate_limit::{enforce_rate_limit, PREDICTIONS_LIMIT};
use crate::models::{
    ListPredictionsQuery, PredictionCreateResponse, PredictionItem, PredictionListResponse,
    PredictionRequest, RiskResponse,
};
use crate::router::ApiState;

/// Score a wrapped check-in and persist the prediction.
///
/// Same engine as POST /risk; the `{ "input": ... }` envelope and the
/// tighter rate limit exist for programmatic callers.
#[utoipa::path(
    post,
    path = "/predictions",
    request_body = PredictionRequest,
    responses(
        (status = 200, description = "Prediction stored", body = PredictionCreateResponse),
        (status = 400, description = "Invalid payload"),
        (status = 429, description = "Rate limit exceeded"),
    ),
    tag = "Predictions"
)]
pub async fn create_prediction_handler(
    Extension(state): Extension<ApiState>,
    raw_request: Request,
) -> Result<(HeaderMap, Json<PredictionCreateResponse>), ApiError> {
    let (parts, body) = raw_request.into_parts();
    let headers = parts.headers.clone();

    let ip = client_ip(&headers);
    enforce_rate_limit(&state.limiter, "predictions:post", &ip, &PREDICTIONS_LIMIT)?;

    let body_request = Request::from_parts(parts, body);
    let Json(payload) = Json::<PredictionRequest>::from_request(body_request, &())
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    payload.validate().map_err(|e| validation_issues(&e))?;

    let (identity, cookie_headers) = state.sessions.ensure_session(&state.pool, &headers).await?;

    let assessment = assess(&payload.input.observation());
    store_prediction(
        &state,
        UserId::from_uuid(identity.user_id),
        &payload.input,
        &assessment,
    )
    .await?;

    Ok((
        cookie_headers,
        Json(PredictionCreateResponse {
            prediction: RiskResponse::from(assessment),
        }),
    ))
}

/// List the caller's recent predictions, newest first.
#[utoipa::path(
    get,
    path = "/predictions",
    params(ListPredictionsQuery),
    responses(
        (status = 200, description = "Recent predictions", body = PredictionListResponse),
        (status = 401, description = "Not authenticated"),
    ),
    tag = "Predictions"
)]
pub async fn list_predictions_handler(
    Extension(state): Extension<ApiState>,
    headers: HeaderMap,
    Query(query): Query<ListPredictionsQuery>,
) -> Result<Json<PredictionListResponse>, ApiError> {
    let identity = state
        .sessions
        .session_from_headers(&headers)
        .ok_or(ApiError::Unauthorized)?;

    let limit = query.effective_limit();
    let predictions =
        Prediction::list_recent(&state.pool, UserId::from_uuid(identity.user_id), limit).await?;

    Ok(Json(PredictionListResponse {
        items: predictions.into_iter().map(PredictionItem::from).collect(),
        limit,
    }))
}
