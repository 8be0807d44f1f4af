//! Signed OAuth state tokens.
//!
//! The `state` parameter round-trips through the provider and must come
//! back untouched; signing it as a short-lived HS256 JWT makes forgery
//! and replay-after-expiry detectable without server-side storage.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use pulsecheck_auth::SessionKey;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::OAuthError;

/// State token validity: 10 minutes, enough for the provider round trip.
const STATE_TTL_SECONDS: i64 = 10 * 60;

/// Fixed purpose claim so state tokens can never pass as session tokens.
const STATE_PURPOSE: &str = "oauth-state";

#[derive(Debug, Serialize, Deserialize)]
struct StateClaims {
    purpose: String,
    nonce: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies OAuth state tokens.
#[derive(Clone)]
pub struct OAuthStateSigner {
    key: SessionKey,
}

impl OAuthStateSigner {
    /// Create a signer sharing the app's session key.
    #[must_use]
    pub fn new(key: SessionKey) -> Self {
        Self { key }
    }

    /// Issue a fresh state token.
    pub fn issue(&self) -> Result<String, OAuthError> {
        let mut nonce_bytes = [0u8; 16];
        rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);

        let now = Utc::now().timestamp();
        let claims = StateClaims {
            purpose: STATE_PURPOSE.to_string(),
            nonce: URL_SAFE_NO_PAD.encode(nonce_bytes),
            iat: now,
            exp: now + STATE_TTL_SECONDS,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.key.as_bytes()),
        )
        .map_err(|e| OAuthError::Provider(format!("State signing failed: {e}")))
    }

    /// Verify a state token returned by the provider redirect.
    pub fn verify(&self, token: &str) -> Result<(), OAuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 30;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<StateClaims>(
            token,
            &DecodingKey::from_secret(self.key.as_bytes()),
            &validation,
        )
        .map_err(|_| OAuthError::InvalidState)?;

        if data.claims.purpose != STATE_PURPOSE {
            return Err(OAuthError::InvalidState);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> OAuthStateSigner {
        let key = SessionKey::from_secret_str("0123456789abcdef0123456789abcdef").unwrap();
        OAuthStateSigner::new(key)
    }

    #[test]
    fn test_issue_then_verify() {
        let signer = signer();
        let state = signer.issue().unwrap();
        assert!(signer.verify(&state).is_ok());
    }

    #[test]
    fn test_states_are_unique() {
        let signer = signer();
        assert_ne!(signer.issue().unwrap(), signer.issue().unwrap());
    }

    #[test]
    fn test_garbage_state_is_rejected() {
        let signer = signer();
        assert!(matches!(
            signer.verify("garbage"),
            Err(OAuthError::InvalidState)
        ));
    }

    #[test]
    fn test_session_token_cannot_pass_as_state() {
        // A token signed with the same key but without the state purpose
        // must be rejected.
        let key = SessionKey::from_secret_str("0123456789abcdef0123456789abcdef").unwrap();
        let session_token = pulsecheck_auth::encode_session_token(
            &pulsecheck_auth::SessionClaims::new(uuid::Uuid::new_v4(), true, 600),
            &key,
        )
        .unwrap();

        let signer = signer();
        assert!(matches!(
            signer.verify(&session_token),
            Err(OAuthError::InvalidState)
        ));
    }
}
