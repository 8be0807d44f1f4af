//! On-demand risk assessment endpoint.

use axum::extract::{FromRequest, Request};
use axum::http::HeaderMap;
use axum::{Extension, Json};
use validator::Validate;

use pulsecheck_core::UserId;
use pulsecheck_db::{NewPrediction, Prediction};
use pulsecheck_risk::{assess, RiskAssessment};

use crate::crypto::try_encrypt;
use crate::error::{validation_issues, ApiError};
use crate::middleware::client_ip;
use crate::middleware::rate_limit::{enforce_rate_limit, RISK_LIMIT};
use crate::models::{CheckInRequest, RiskResponse};
use crate::router::ApiState;

/// Name recorded with every stored assessment.
pub const MODEL_NAME: &str = "heuristic-risk";

/// Version recorded with every stored assessment. Bump when the scoring
/// rules change.
pub const MODEL_VERSION: &str = "v1";

/// Persist an assessment as a prediction row, encrypting the inputs and
/// explanation when a data key is configured.
pub(crate) async fn store_prediction(
    state: &ApiState,
    user_id: UserId,
    payload: &CheckInRequest,
    assessment: &RiskAssessment,
) -> Result<Prediction, ApiError> {
    let features_json = serde_json::to_string(&payload.observation())
        .map_err(|e| ApiError::Internal(format!("Feature serialization error: {e}")))?;
    let explanation_json = serde_json::to_string(&serde_json::json!({
        "reasons": assessment.reasons,
    }))
    .map_err(|e| ApiError::Internal(format!("Explanation serialization error: {e}")))?;

    let prediction = Prediction::create(
        &state.pool,
        NewPrediction {
            user_id,
            daily_log_id: None,
            model_name: MODEL_NAME.to_string(),
            model_version: MODEL_VERSION.to_string(),
            risk_level: assessment.level.as_str().to_string(),
            risk_score: assessment.score as i32,
            features_encrypted: try_encrypt(state.encryption.as_deref(), &features_json),
            explanation_encrypted: try_encrypt(state.encryption.as_deref(), &explanation_json),
        },
    )
    .await?;

    Ok(prediction)
}

/// Score a check-in and return the assessment.
///
/// The same payload as POST /checkins, but nothing is written to
/// `daily_logs`; the assessment itself is recorded as a prediction.
#[utoipa::path(
    post,
    path = "/risk",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Risk assessment", body = RiskResponse),
        (status = 400, description = "Invalid payload"),
        (status = 429, description = "Rate limit exceeded"),
    ),
    tag = "Risk"
)]
pub async fn assess_risk_handler(
    Extension(state): Extension<ApiState>,
    raw_request: Request,
) -> Result<(HeaderMap, Json<RiskResponse>), ApiError> {
    let (parts, body) = raw_request.into_parts();
    let headers = parts.headers.clone();

    let ip = client_ip(&headers);
    enforce_rate_limit(&state.limiter, "risk:post", &ip, &RISK_LIMIT)?;

    let body_request = Request::from_parts(parts, body);
    let Json(payload) = Json::<CheckInRequest>::from_request(body_request, &())
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    payload.validate().map_err(|e| validation_issues(&e))?;

    let (identity, cookie_headers) = state.sessions.ensure_session(&state.pool, &headers).await?;

    let assessment = assess(&payload.observation());
    store_prediction(
        &state,
        UserId::from_uuid(identity.user_id),
        &payload,
        &assessment,
    )
    .await?;

    Ok((cookie_headers, Json(RiskResponse::from(assessment))))
}
