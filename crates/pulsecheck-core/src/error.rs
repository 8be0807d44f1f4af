//! Error types
//!
//! Standardized error variants shared across the pulsecheck crates. Each
//! variant maps to a well-known HTTP status so the API layer can render it
//! without guessing.
//!
//! # Example
//!
//! ```
//! use pulsecheck_core::{PulsecheckError, Result};
//!
//! fn find_check_in(id: &str) -> Result<String> {
//!     if id.is_empty() {
//!         return Err(PulsecheckError::NotFound {
//!             resource: "CheckIn".to_string(),
//!             id: None,
//!         });
//!     }
//!     Ok(format!("CheckIn {}", id))
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// Standardized error type for pulsecheck.
///
/// # Variants
///
/// - `Unauthorized` - Missing or invalid session (HTTP 401)
/// - `NotFound` - Resource not found (HTTP 404)
/// - `Conflict` - Uniqueness violation, e.g. an already-linked identity (HTTP 409)
/// - `ValidationError` - Input validation failure (HTTP 400)
/// - `RateLimited` - Too many requests from one client (HTTP 429)
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PulsecheckError {
    /// Authentication failure.
    ///
    /// Use when a request carries no session or an invalid one.
    /// Maps to HTTP 401 Unauthorized.
    #[error("Unauthorized{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Unauthorized {
        /// Optional message providing more context
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Requested resource was not found.
    ///
    /// Use when a database lookup returns no results.
    /// Maps to HTTP 404 Not Found.
    #[error("{resource} not found{}", id.as_ref().map(|i| format!(": {i}")).unwrap_or_default())]
    NotFound {
        /// The type of resource that was not found (e.g. "User", "CheckIn")
        resource: String,
        /// Optional identifier of the resource
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// Uniqueness violation.
    ///
    /// Use when an operation would claim a resource that already belongs to
    /// someone else, such as linking an OAuth identity that is attached to a
    /// different account. Maps to HTTP 409 Conflict.
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflicting state
        message: String,
    },

    /// Input validation failure.
    ///
    /// Use when user input fails validation rules.
    /// Maps to HTTP 400 Bad Request.
    #[error("Validation error on field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },

    /// Client exceeded a rate limit.
    ///
    /// Maps to HTTP 429 Too Many Requests.
    #[error("Rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until the window resets
        retry_after_secs: u64,
    },
}

/// Type alias for Results using [`PulsecheckError`].
///
/// ```
/// use pulsecheck_core::Result;
///
/// fn example() -> Result<String> {
///     Ok("success".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, PulsecheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    mod display_tests {
        use super::*;

        #[test]
        fn test_unauthorized_without_message() {
            let err = PulsecheckError::Unauthorized { message: None };
            assert_eq!(err.to_string(), "Unauthorized");
        }

        #[test]
        fn test_unauthorized_with_message() {
            let err = PulsecheckError::Unauthorized {
                message: Some("session expired".to_string()),
            };
            assert_eq!(err.to_string(), "Unauthorized: session expired");
        }

        #[test]
        fn test_not_found_with_id() {
            let err = PulsecheckError::NotFound {
                resource: "User".to_string(),
                id: Some("abc".to_string()),
            };
            assert_eq!(err.to_string(), "User not found: abc");
        }

        #[test]
        fn test_not_found_without_id() {
            let err = PulsecheckError::NotFound {
                resource: "CheckIn".to_string(),
                id: None,
            };
            assert_eq!(err.to_string(), "CheckIn not found");
        }

        #[test]
        fn test_validation_error() {
            let err = PulsecheckError::ValidationError {
                field: "sleep_hours".to_string(),
                message: "must be between 0 and 24".to_string(),
            };
            assert_eq!(
                err.to_string(),
                "Validation error on field 'sleep_hours': must be between 0 and 24"
            );
        }

        #[test]
        fn test_rate_limited() {
            let err = PulsecheckError::RateLimited {
                retry_after_secs: 42,
            };
            assert_eq!(err.to_string(), "Rate limit exceeded, retry after 42s");
        }
    }

    mod serialize_tests {
        use super::*;

        #[test]
        fn test_serializes_with_type_tag() {
            let err = PulsecheckError::Conflict {
                message: "identity already linked".to_string(),
            };
            let json = serde_json::to_value(&err).unwrap();
            assert_eq!(json["type"], "conflict");
            assert_eq!(json["message"], "identity already linked");
        }

        #[test]
        fn test_skips_absent_optional_fields() {
            let err = PulsecheckError::Unauthorized { message: None };
            let json = serde_json::to_value(&err).unwrap();
            assert!(json.get("message").is_none());
        }
    }
}
