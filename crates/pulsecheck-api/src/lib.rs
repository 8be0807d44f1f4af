//! HTTP API for pulsecheck.
//!
//! This crate provides the REST endpoints for the wellness check-in
//! service:
//! - Session management (POST /auth/anonymous, GET /auth/me,
//!   POST /auth/refresh, POST /auth/logout)
//! - Google identity bridging (GET /auth/google/authorize,
//!   GET /auth/google/callback)
//! - Daily check-ins (POST /checkins, GET /checkins, GET /checkins/trends)
//! - Risk assessment (POST /risk)
//! - Stored predictions (POST /predictions, GET /predictions)
//!
//! # Example
//!
//! ```rust,ignore
//! use pulsecheck_api::router::{api_router, ApiState};
//!
//! let app = api_router(state);
//! ```

pub mod crypto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod oauth;
pub mod privacy;
pub mod router;
pub mod session;
pub mod trends;

// Re-export public API
pub use crypto::{try_encrypt, NotesEncryption, NotesEncryptionError};
pub use error::{ApiError, ProblemDetails};
pub use middleware::{client_ip, RateLimitConfig, RateLimiter};
pub use oauth::{GoogleProvider, OAuthError, OAuthStateSigner};
pub use router::{api_router, ApiState};
pub use session::{SessionIdentity, SessionService};
