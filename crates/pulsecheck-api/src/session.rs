//! Cookie-backed app sessions.
//!
//! Sessions are a pair of HS256 JWT cookies: a short-lived access token
//! and a long-lived refresh token. Both carry the same
//! [`SessionClaims`]; only their TTLs differ. Cookies are written and
//! parsed by hand against the `Set-Cookie`/`Cookie` headers.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use pulsecheck_auth::{
    decode_session_token, encode_session_token, AuthError, SessionClaims, SessionKey,
};
use pulsecheck_db::User;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Cookie holding the access token.
pub const ACCESS_COOKIE: &str = "pc_access";

/// Cookie holding the refresh token.
pub const REFRESH_COOKIE: &str = "pc_refresh";

/// Access token validity: 15 minutes.
pub const ACCESS_TTL_SECONDS: i64 = 15 * 60;

/// Refresh token validity: 30 days.
pub const REFRESH_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

/// The authenticated identity resolved from a session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: Uuid,
    pub is_anonymous: bool,
}

impl From<&SessionClaims> for SessionIdentity {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            is_anonymous: claims.is_anonymous,
        }
    }
}

/// Issues, verifies, and clears session cookies.
#[derive(Clone)]
pub struct SessionService {
    key: SessionKey,
    secure_cookies: bool,
}

impl SessionService {
    /// Create a session service.
    ///
    /// `secure_cookies` adds the `Secure` flag and should be true in
    /// production.
    #[must_use]
    pub fn new(key: SessionKey, secure_cookies: bool) -> Self {
        Self {
            key,
            secure_cookies,
        }
    }

    fn build_cookie(&self, name: &str, value: &str, max_age: i64) -> String {
        let secure_flag = if self.secure_cookies { "; Secure" } else { "" };
        format!("{name}={value}; HttpOnly{secure_flag}; SameSite=Lax; Path=/; Max-Age={max_age}")
    }

    /// Issue fresh access and refresh cookies for a user, appending the
    /// `Set-Cookie` headers to `headers`.
    pub fn issue_cookies(
        &self,
        headers: &mut HeaderMap,
        user_id: Uuid,
        is_anonymous: bool,
    ) -> Result<(), ApiError> {
        let access = encode_session_token(
            &SessionClaims::new(user_id, is_anonymous, ACCESS_TTL_SECONDS),
            &self.key,
        )
        .map_err(|e| ApiError::Internal(format!("Token generation error: {e}")))?;
        let refresh = encode_session_token(
            &SessionClaims::new(user_id, is_anonymous, REFRESH_TTL_SECONDS),
            &self.key,
        )
        .map_err(|e| ApiError::Internal(format!("Token generation error: {e}")))?;

        for (name, value, ttl) in [
            (ACCESS_COOKIE, access, ACCESS_TTL_SECONDS),
            (REFRESH_COOKIE, refresh, REFRESH_TTL_SECONDS),
        ] {
            let cookie = self.build_cookie(name, &value, ttl);
            let header_value = HeaderValue::from_str(&cookie)
                .map_err(|e| ApiError::Internal(format!("Cookie encoding error: {e}")))?;
            headers.append(SET_COOKIE, header_value);
        }

        Ok(())
    }

    /// Expire both session cookies.
    pub fn clear_cookies(&self, headers: &mut HeaderMap) {
        for name in [ACCESS_COOKIE, REFRESH_COOKIE] {
            let cookie = self.build_cookie(name, "", 0);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                headers.append(SET_COOKIE, value);
            }
        }
    }

    /// Resolve the session from the access cookie, if present and valid.
    #[must_use]
    pub fn session_from_headers(&self, headers: &HeaderMap) -> Option<SessionIdentity> {
        self.verify_cookie(headers, ACCESS_COOKIE)
    }

    /// Resolve the session from the refresh cookie, if present and valid.
    #[must_use]
    pub fn refresh_from_headers(&self, headers: &HeaderMap) -> Option<SessionIdentity> {
        self.verify_cookie(headers, REFRESH_COOKIE)
    }

    fn verify_cookie(&self, headers: &HeaderMap, name: &str) -> Option<SessionIdentity> {
        let token = extract_cookie(headers, name)?;
        match decode_session_token(&token, &self.key) {
            Ok(claims) => Some(SessionIdentity::from(&claims)),
            Err(AuthError::TokenExpired) => None,
            Err(e) => {
                tracing::debug!("Session cookie rejected: {}", e);
                None
            }
        }
    }

    /// Resolve the session, minting an anonymous user when there is none.
    ///
    /// Returns the identity plus any `Set-Cookie` headers the caller must
    /// attach to its response. Only used by write endpoints; reads should
    /// call [`Self::session_from_headers`] and 401 instead, so that
    /// fetching history never creates throwaway accounts.
    pub async fn ensure_session(
        &self,
        pool: &PgPool,
        request_headers: &HeaderMap,
    ) -> Result<(SessionIdentity, HeaderMap), ApiError> {
        if let Some(identity) = self.session_from_headers(request_headers) {
            return Ok((identity, HeaderMap::new()));
        }

        let user = User::create_anonymous(pool).await?;
        tracing::info!(user_id = %user.id, "Minted anonymous user for new session");

        let mut response_headers = HeaderMap::new();
        self.issue_cookies(&mut response_headers, user.id, true)?;

        Ok((
            SessionIdentity {
                user_id: user.id,
                is_anonymous: true,
            },
            response_headers,
        ))
    }
}

/// Extract a cookie value from the `Cookie` request header.
#[must_use]
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie_header = headers.get(COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;

    // Cookie header format: "name1=value1; name2=value2"
    for part in cookie_str.split(';') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix(name) {
            if let Some(value) = value.strip_prefix('=') {
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    None
}
