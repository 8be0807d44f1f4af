//! Session claim payload.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by an app session token.
///
/// This is the strongly typed replacement for loosely typed token payload
/// maps: the claim set is fixed, validated once at decode time, and handler
/// code never touches raw JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The user this session belongs to.
    pub sub: Uuid,

    /// Whether the user is still anonymous (no linked OAuth identity).
    #[serde(rename = "isAnonymous")]
    pub is_anonymous: bool,

    /// Issued-at, seconds since the epoch.
    pub iat: i64,

    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl SessionClaims {
    /// Create claims for `user_id` expiring `ttl_seconds` from now.
    #[must_use]
    pub fn new(user_id: Uuid, is_anonymous: bool, ttl_seconds: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id,
            is_anonymous,
            iat: now,
            exp: now + ttl_seconds,
        }
    }
}
