//! Error types for session token operations.

use thiserror::Error;

/// Errors that can occur while handling session tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The signing secret is unusable.
    #[error("Invalid session key: {0}")]
    InvalidKey(String),

    /// The token could not be encoded or decoded.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The token's signature did not verify.
    #[error("Token signature verification failed")]
    InvalidSignature,

    /// The token is past its expiry (beyond leeway).
    #[error("Token expired")]
    TokenExpired,
}
