//! Error types for the pulsecheck API.

use axum::{
    http::{header::RETRY_AFTER, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// A single field validation error.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldIssue {
    /// The field that failed validation.
    pub field: String,
    /// Human-readable error message.
    pub message: String,
}

/// Error type for the pulsecheck API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Authentication required.
    #[error("Authentication required")]
    Unauthorized,

    /// Resource not found (or owned by another user).
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Validation error with a single message.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Validation failed with one or more field-level issues.
    #[error("Invalid payload")]
    ValidationIssues(Vec<FieldIssue>),

    /// Resource conflict, e.g. an identity already linked elsewhere.
    #[error("{0}")]
    Conflict(String),

    /// Client exceeded a rate limit.
    #[error("Rate limit exceeded")]
    RateLimited {
        /// Seconds until the window has room again.
        retry_after_secs: u64,
    },

    /// Upstream OAuth provider failure.
    #[error("OAuth provider error: {0}")]
    OAuth(String),

    /// Internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<pulsecheck_core::PulsecheckError> for ApiError {
    fn from(err: pulsecheck_core::PulsecheckError) -> Self {
        use pulsecheck_core::PulsecheckError;
        match err {
            PulsecheckError::Unauthorized { .. } => ApiError::Unauthorized,
            PulsecheckError::NotFound { .. } => ApiError::NotFound("Resource"),
            PulsecheckError::Conflict { message } => ApiError::Conflict(message),
            PulsecheckError::ValidationError { field, message } => {
                ApiError::Validation(format!("{field}: {message}"))
            }
            PulsecheckError::RateLimited { retry_after_secs } => {
                ApiError::RateLimited { retry_after_secs }
            }
        }
    }
}

impl From<crate::oauth::OAuthError> for ApiError {
    fn from(err: crate::oauth::OAuthError) -> Self {
        use crate::oauth::OAuthError;
        match err {
            OAuthError::InvalidState => ApiError::Validation("Invalid OAuth state".to_string()),
            OAuthError::Provider(msg) => ApiError::OAuth(msg),
            OAuthError::Http(e) => ApiError::OAuth(e.to_string()),
            OAuthError::MissingField(field) => {
                ApiError::OAuth(format!("response missing {field}"))
            }
        }
    }
}

impl From<pulsecheck_db::DbError> for ApiError {
    fn from(err: pulsecheck_db::DbError) -> Self {
        match err {
            pulsecheck_db::DbError::NotFound(resource) => {
                tracing::warn!(resource = %resource, "Lookup missed");
                ApiError::NotFound("Resource")
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// RFC 7807 Problem Details response format.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Field-level issues (present only for validation failures).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<FieldIssue>>,
}

impl ProblemDetails {
    fn new(problem_type: &str, title: &str, status: u16, detail: Option<String>) -> Self {
        Self {
            problem_type: format!("https://pulsecheck.dev/problems/{problem_type}"),
            title: title.to_string(),
            status,
            detail,
            issues: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, problem) = match &self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ProblemDetails::new(
                    "unauthorized",
                    "Unauthorized",
                    401,
                    Some("Not authenticated".to_string()),
                ),
            ),
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ProblemDetails::new(
                    "not-found",
                    "Not Found",
                    404,
                    Some(format!("{resource} not found")),
                ),
            ),
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ProblemDetails::new("validation-error", "Validation Error", 400, Some(msg.clone())),
            ),
            ApiError::ValidationIssues(issues) => {
                let mut problem = ProblemDetails::new(
                    "validation-error",
                    "Validation Error",
                    400,
                    Some("Invalid payload".to_string()),
                );
                problem.issues = Some(issues.clone());
                (StatusCode::BAD_REQUEST, problem)
            }
            ApiError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ProblemDetails::new("conflict", "Conflict", 409, Some(msg.clone())),
            ),
            ApiError::RateLimited { retry_after_secs } => {
                let problem = ProblemDetails::new(
                    "rate-limited",
                    "Too Many Requests",
                    429,
                    Some("Rate limit exceeded".to_string()),
                );
                let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(problem)).into_response();
                if let Ok(value) = retry_after_secs.to_string().parse() {
                    response.headers_mut().insert(RETRY_AFTER, value);
                }
                return response;
            }
            ApiError::OAuth(msg) => {
                tracing::warn!("OAuth provider error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ProblemDetails::new(
                        "oauth-error",
                        "OAuth Provider Error",
                        502,
                        Some("Identity provider request failed".to_string()),
                    ),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ProblemDetails::new(
                        "internal-error",
                        "Internal Server Error",
                        500,
                        Some("An internal error occurred".to_string()),
                    ),
                )
            }
            ApiError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ProblemDetails::new(
                        "internal-error",
                        "Internal Server Error",
                        500,
                        Some("A database error occurred".to_string()),
                    ),
                )
            }
        };

        (status, Json(problem)).into_response()
    }
}

/// Convert `validator` failures into field-level issues.
pub fn validation_issues(errors: &validator::ValidationErrors) -> ApiError {
    let issues: Vec<FieldIssue> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldIssue {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map_or_else(|| e.code.to_string(), ToString::to_string),
            })
        })
        .collect();
    ApiError::ValidationIssues(issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_maps_to_401() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_rate_limited_sets_retry_after_header() {
        let response = ApiError::RateLimited {
            retry_after_secs: 17,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(RETRY_AFTER).unwrap(), "17");
    }

    #[test]
    fn test_validation_issues_maps_to_400() {
        let err = ApiError::ValidationIssues(vec![FieldIssue {
            field: "sleep_hours".to_string(),
            message: "out of range".to_string(),
        }]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
