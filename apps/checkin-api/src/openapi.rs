//! OpenAPI documentation assembly.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI document for the pulsecheck API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "pulsecheck API",
        description = "Personal wellness check-ins with heuristic risk assessment"
    ),
    paths(
        pulsecheck_api::handlers::auth::create_anonymous_session_handler,
        pulsecheck_api::handlers::auth::me_handler,
        pulsecheck_api::handlers::auth::refresh_handler,
        pulsecheck_api::handlers::auth::logout_handler,
        pulsecheck_api::handlers::auth::google_authorize_handler,
        pulsecheck_api::handlers::auth::google_callback_handler,
        pulsecheck_api::handlers::checkins::create_checkin_handler,
        pulsecheck_api::handlers::checkins::list_checkins_handler,
        pulsecheck_api::handlers::trends::trends_handler,
        pulsecheck_api::handlers::risk::assess_risk_handler,
        pulsecheck_api::handlers::predictions::create_prediction_handler,
        pulsecheck_api::handlers::predictions::list_predictions_handler,
    ),
    components(schemas(
        pulsecheck_api::models::CheckInRequest,
        pulsecheck_api::models::CheckInCreateResponse,
        pulsecheck_api::models::CheckInItem,
        pulsecheck_api::models::CheckInListResponse,
        pulsecheck_api::models::RiskResponse,
        pulsecheck_api::models::PredictionRequest,
        pulsecheck_api::models::PredictionCreateResponse,
        pulsecheck_api::models::PredictionItem,
        pulsecheck_api::models::PredictionListResponse,
        pulsecheck_api::models::SessionUser,
        pulsecheck_api::models::AnonymousSessionResponse,
        pulsecheck_api::models::MeResponse,
        pulsecheck_api::models::OkResponse,
        pulsecheck_api::models::TrendPoint,
        pulsecheck_api::models::TrendsResponse,
        pulsecheck_api::error::ProblemDetails,
        pulsecheck_api::error::FieldIssue,
        pulsecheck_risk::CheckInObservation,
        pulsecheck_risk::RiskAssessment,
        pulsecheck_risk::RiskLevel,
        pulsecheck_risk::SocialActivity,
    )),
    tags(
        (name = "Auth", description = "Sessions and identity bridging"),
        (name = "CheckIns", description = "Daily wellness check-ins"),
        (name = "Risk", description = "Risk assessment"),
        (name = "Predictions", description = "Stored assessments"),
    )
)]
pub struct ApiDoc;

/// Swagger UI routes serving the generated document.
pub fn swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("/checkins"));
        assert!(json.contains("/risk"));
        assert!(json.contains("CheckInRequest"));
    }
}
