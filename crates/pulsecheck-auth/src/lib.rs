//! Session token library for pulsecheck.
//!
//! This crate provides:
//! - HS256 JWT encoding and decoding for app session tokens
//! - A strongly typed [`SessionClaims`] payload (no untyped claim maps)
//! - Secret key handling with base64 or raw UTF-8 input
//!
//! # Example
//!
//! ```
//! use pulsecheck_auth::{decode_session_token, encode_session_token, SessionClaims, SessionKey};
//! use uuid::Uuid;
//!
//! let key = SessionKey::from_secret_str("0123456789abcdef0123456789abcdef").unwrap();
//! let claims = SessionClaims::new(Uuid::new_v4(), true, 900);
//!
//! let token = encode_session_token(&claims, &key).unwrap();
//! let decoded = decode_session_token(&token, &key).unwrap();
//! assert_eq!(decoded.sub, claims.sub);
//! assert!(decoded.is_anonymous);
//! ```

mod claims;
mod error;
mod jwt;
mod key;

pub use claims::SessionClaims;
pub use error::AuthError;
pub use jwt::{decode_session_token, encode_session_token, ValidationConfig};
pub use key::{SessionKey, MIN_SECRET_BYTES};
