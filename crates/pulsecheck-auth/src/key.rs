//! Session signing key handling.

use crate::error::AuthError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Minimum acceptable secret length in bytes (256 bits for HS256).
pub const MIN_SECRET_BYTES: usize = 32;

/// Symmetric key used to sign and verify session tokens.
///
/// Built from the `AUTH_JWT_SECRET` configuration value. Base64 input is
/// preferred; if decoding does not yield at least [`MIN_SECRET_BYTES`], the
/// raw UTF-8 bytes are used instead. Secrets shorter than 32 bytes are
/// rejected outright.
#[derive(Clone)]
pub struct SessionKey {
    bytes: Vec<u8>,
}

impl SessionKey {
    /// Build a key from the configured secret string.
    pub fn from_secret_str(secret: &str) -> Result<Self, AuthError> {
        let bytes = match STANDARD.decode(secret) {
            Ok(decoded) if decoded.len() >= MIN_SECRET_BYTES => decoded,
            _ => secret.as_bytes().to_vec(),
        };

        if bytes.len() < MIN_SECRET_BYTES {
            return Err(AuthError::InvalidKey(format!(
                "secret must be at least {MIN_SECRET_BYTES} bytes"
            )));
        }

        Ok(Self { bytes })
    }

    /// Raw key bytes for the HS256 signer.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
