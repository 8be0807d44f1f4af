//! Session and identity-bridging endpoints.

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Redirect;
use axum::{Extension, Json};
use serde::Deserialize;

use pulsecheck_db::{AuthIdentity, User};

use crate::error::ApiError;
use crate::middleware::rate_limit::{
    enforce_rate_limit, OAUTH_AUTHORIZE_LIMIT, OAUTH_CALLBACK_LIMIT,
};
use crate::middleware::client_ip;
use crate::models::{AnonymousSessionResponse, MeResponse, OkResponse, SessionUser};
use crate::oauth::{decide_bridge, BridgeAction};
use crate::privacy::hmac_email;
use crate::router::ApiState;

/// Create an anonymous user and start a session for it.
///
/// The normal path mints sessions lazily on first write; this endpoint
/// exists for clients that want cookies up front.
#[utoipa::path(
    post,
    path = "/auth/anonymous",
    responses(
        (status = 201, description = "Anonymous session created", body = AnonymousSessionResponse),
    ),
    tag = "Auth"
)]
pub async fn create_anonymous_session_handler(
    Extension(state): Extension<ApiState>,
) -> Result<(StatusCode, HeaderMap, Json<AnonymousSessionResponse>), ApiError> {
    let user = User::create_anonymous(&state.pool).await?;

    let mut headers = HeaderMap::new();
    state.sessions.issue_cookies(&mut headers, user.id, true)?;

    Ok((
        StatusCode::CREATED,
        headers,
        Json(AnonymousSessionResponse {
            user: SessionUser {
                id: user.id,
                is_anonymous: true,
                created_at: Some(user.created_at),
            },
            ok: true,
        }),
    ))
}

/// Report the current session, if any.
///
/// Always 200; an unauthenticated caller simply gets
/// `{"authenticated": false}`.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Session status", body = MeResponse),
    ),
    tag = "Auth"
)]
pub async fn me_handler(
    Extension(state): Extension<ApiState>,
    headers: HeaderMap,
) -> Json<MeResponse> {
    match state.sessions.session_from_headers(&headers) {
        Some(identity) => Json(MeResponse {
            authenticated: true,
            user: Some(SessionUser {
                id: identity.user_id,
                is_anonymous: identity.is_anonymous,
                created_at: None,
            }),
        }),
        None => Json(MeResponse {
            authenticated: false,
            user: None,
        }),
    }
}

/// Rotate the session cookies from a valid refresh cookie.
///
/// The user row is re-read so a deactivated account (or a stale
/// `is_anonymous` flag after linking) cannot be extended from an old
/// cookie.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "Session refreshed", body = OkResponse),
        (status = 401, description = "No valid refresh cookie"),
    ),
    tag = "Auth"
)]
pub async fn refresh_handler(
    Extension(state): Extension<ApiState>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<OkResponse>), ApiError> {
    let identity = state
        .sessions
        .refresh_from_headers(&headers)
        .ok_or(ApiError::Unauthorized)?;

    let user = User::find_active_by_id(&state.pool, identity.user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let mut response_headers = HeaderMap::new();
    state
        .sessions
        .issue_cookies(&mut response_headers, user.id, user.is_anonymous)?;

    Ok((response_headers, Json(OkResponse { ok: true })))
}

/// End the session by expiring both cookies.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Session cleared"),
    ),
    tag = "Auth"
)]
pub async fn logout_handler(Extension(state): Extension<ApiState>) -> (StatusCode, HeaderMap) {
    let mut headers = HeaderMap::new();
    state.sessions.clear_cookies(&mut headers);
    (StatusCode::NO_CONTENT, headers)
}

/// Start the Google authorization-code flow.
#[utoipa::path(
    get,
    path = "/auth/google/authorize",
    responses(
        (status = 307, description = "Redirect to Google"),
        (status = 404, description = "Google OAuth not configured"),
        (status = 429, description = "Rate limit exceeded"),
    ),
    tag = "Auth"
)]
pub async fn google_authorize_handler(
    Extension(state): Extension<ApiState>,
    headers: HeaderMap,
) -> Result<Redirect, ApiError> {
    let ip = client_ip(&headers);
    enforce_rate_limit(
        &state.limiter,
        "auth:google:authorize",
        &ip,
        &OAUTH_AUTHORIZE_LIMIT,
    )?;

    let provider = state
        .google
        .as_ref()
        .ok_or(ApiError::NotFound("OAuth provider"))?;

    let oauth_state = state.oauth_state.issue()?;
    Ok(Redirect::temporary(
        &provider.authorization_url(&oauth_state),
    ))
}

/// Query parameters Google sends back to the callback.
#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Complete the Google flow: exchange the code, then bridge the identity
/// onto an app user.
///
/// Three outcomes, decided by what already exists:
/// - the identity is known: sign that user in (409 if the caller holds a
///   session for a different user);
/// - the caller has a session and the identity is new: link it to the
///   session's user, converting them to non-anonymous;
/// - neither: create a fresh non-anonymous user with the identity.
#[utoipa::path(
    get,
    path = "/auth/google/callback",
    responses(
        (status = 200, description = "Identity bridged", body = MeResponse),
        (status = 400, description = "Invalid state or provider error response"),
        (status = 409, description = "Identity already linked to another user"),
        (status = 429, description = "Rate limit exceeded"),
        (status = 502, description = "Provider request failed"),
    ),
    tag = "Auth"
)]
pub async fn google_callback_handler(
    Extension(state): Extension<ApiState>,
    headers: HeaderMap,
    Query(query): Query<GoogleCallbackQuery>,
) -> Result<(HeaderMap, Json<MeResponse>), ApiError> {
    let ip = client_ip(&headers);
    enforce_rate_limit(
        &state.limiter,
        "auth:google:callback",
        &ip,
        &OAUTH_CALLBACK_LIMIT,
    )?;

    let provider = state
        .google
        .as_ref()
        .ok_or(ApiError::NotFound("OAuth provider"))?;

    if let Some(error) = query.error {
        return Err(ApiError::Validation(format!(
            "Google sign-in was not completed: {error}"
        )));
    }

    let code = query
        .code
        .ok_or_else(|| ApiError::Validation("Missing authorization code".to_string()))?;
    let oauth_state = query
        .state
        .ok_or_else(|| ApiError::Validation("Missing OAuth state".to_string()))?;
    state.oauth_state.verify(&oauth_state)?;

    let access_token = provider.exchange_code(&code).await?;
    let userinfo = provider.fetch_userinfo(&access_token).await?;

    let email_hmac = userinfo
        .email
        .as_deref()
        .and_then(|email| hmac_email(email, state.email_pepper.as_deref()));

    let current_session = state.sessions.session_from_headers(&headers);
    let existing = AuthIdentity::find_by_provider_subject(&state.pool, "google", &userinfo.sub)
        .await?;

    let action = decide_bridge(
        existing.map(|identity| identity.user_id),
        current_session.map(|session| session.user_id),
    )?;

    let user = match action {
        BridgeAction::SignIn(owner) => User::find_active_by_id(&state.pool, owner)
            .await?
            .ok_or(ApiError::Unauthorized)?,
        BridgeAction::Link(current) => {
            let user = User::find_active_by_id(&state.pool, current)
                .await?
                .ok_or(ApiError::Unauthorized)?;
            AuthIdentity::create_for_user(
                &state.pool,
                user.id,
                "google",
                &userinfo.sub,
                email_hmac.as_deref(),
            )
            .await?;
            User::mark_linked(&state.pool, user.id).await?;
            tracing::info!(user_id = %user.id, "Linked Google identity to existing user");
            user
        }
        BridgeAction::CreateUser => {
            let user = User::create_with_identity(
                &state.pool,
                "google",
                &userinfo.sub,
                email_hmac.as_deref(),
            )
            .await?;
            tracing::info!(user_id = %user.id, "Created user from Google identity");
            user
        }
    };

    let mut response_headers = HeaderMap::new();
    state
        .sessions
        .issue_cookies(&mut response_headers, user.id, false)?;

    Ok((
        response_headers,
        Json(MeResponse {
            authenticated: true,
            user: Some(SessionUser {
                id: user.id,
                is_anonymous: false,
                created_at: Some(user.created_at),
            }),
        }),
    ))
}
