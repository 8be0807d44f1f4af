//! API router assembly.

use axum::routing::{get, post};
use axum::{Extension, Router};
use sqlx::PgPool;
use std::sync::Arc;

use crate::crypto::NotesEncryption;
use crate::handlers::auth::{
    create_anonymous_session_handler, google_authorize_handler, google_callback_handler,
    logout_handler, me_handler, refresh_handler,
};
use crate::handlers::checkins::{create_checkin_handler, list_checkins_handler};
use crate::handlers::predictions::{create_prediction_handler, list_predictions_handler};
use crate::handlers::risk::assess_risk_handler;
use crate::handlers::trends::trends_handler;
use crate::middleware::RateLimiter;
use crate::oauth::{GoogleProvider, OAuthStateSigner};
use crate::session::SessionService;

/// Shared state injected into every handler.
///
/// Built once at startup from the loaded configuration and passed down;
/// nothing here is a process-global.
#[derive(Clone)]
pub struct ApiState {
    /// Database connection pool.
    pub pool: PgPool,

    /// Session cookie issuing/verification.
    pub sessions: Arc<SessionService>,

    /// Per-endpoint sliding-window rate limiter.
    pub limiter: RateLimiter,

    /// Encryption for notes and prediction payloads; `None` disables
    /// storing those fields.
    pub encryption: Option<Arc<NotesEncryption>>,

    /// Pepper for email HMACs; `None` disables storing email digests.
    pub email_pepper: Option<String>,

    /// Google OAuth client; `None` disables identity bridging.
    pub google: Option<Arc<GoogleProvider>>,

    /// Signer for OAuth state tokens.
    pub oauth_state: OAuthStateSigner,
}

/// Build the API router.
pub fn api_router(state: ApiState) -> Router {
    Router::new()
        .route("/auth/anonymous", post(create_anonymous_session_handler))
        .route("/auth/me", get(me_handler))
        .route("/auth/refresh", post(refresh_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/auth/google/authorize", get(google_authorize_handler))
        .route("/auth/google/callback", get(google_callback_handler))
        .route(
            "/checkins",
            post(create_checkin_handler).get(list_checkins_handler),
        )
        .route("/checkins/trends", get(trends_handler))
        .route("/risk", post(assess_risk_handler))
        .route(
            "/predictions",
            post(create_prediction_handler).get(list_predictions_handler),
        )
        .layer(Extension(state))
}
