//! HS256 encoding and decoding of session tokens.

use crate::claims::SessionClaims;
use crate::error::AuthError;
use crate::key::SessionKey;
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

/// Configuration for session token validation.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Leeway in seconds for exp/iat validation (clock skew tolerance).
    pub leeway: u64,
    /// Whether to validate expiration.
    pub validate_exp: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            leeway: 60, // 60 seconds clock skew tolerance
            validate_exp: true,
        }
    }
}

impl ValidationConfig {
    /// Create a validation config with custom leeway.
    #[must_use]
    pub fn with_leeway(leeway: u64) -> Self {
        Self {
            leeway,
            ..Default::default()
        }
    }

    /// Disable expiration validation (use with caution).
    #[must_use]
    pub fn skip_exp_validation(mut self) -> Self {
        self.validate_exp = false;
        self
    }
}

/// Encode session claims into a signed HS256 token.
pub fn encode_session_token(
    claims: &SessionClaims,
    key: &SessionKey,
) -> Result<String, AuthError> {
    let header = Header::new(Algorithm::HS256);
    let encoding_key = EncodingKey::from_secret(key.as_bytes());

    encode(&header, claims, &encoding_key)
        .map_err(|e| AuthError::InvalidToken(format!("Encoding failed: {e}")))
}

/// Decode and validate a session token with default validation.
pub fn decode_session_token(
    token: &str,
    key: &SessionKey,
) -> Result<SessionClaims, AuthError> {
    decode_session_token_with_config(token, key, &ValidationConfig::default())
}

/// Decode and validate a session token with explicit validation settings.
pub fn decode_session_token_with_config(
    token: &str,
    key: &SessionKey,
    config: &ValidationConfig,
) -> Result<SessionClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = config.leeway;
    validation.validate_exp = config.validate_exp;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let decoding_key = DecodingKey::from_secret(key.as_bytes());

    match decode::<SessionClaims>(token, &decoding_key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) => match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(AuthError::TokenExpired),
            jsonwebtoken::errors::ErrorKind::InvalidSignature => Err(AuthError::InvalidSignature),
            _ => Err(AuthError::InvalidToken(e.to_string())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_key() -> SessionKey {
        SessionKey::from_secret_str("test-secret-test-secret-test-secret!").unwrap()
    }

    #[test]
    fn test_round_trip_preserves_claims() {
        let key = test_key();
        let claims = SessionClaims::new(Uuid::new_v4(), true, 900);

        let token = encode_session_token(&claims, &key).unwrap();
        let decoded = decode_session_token(&token, &key).unwrap();

        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let key = test_key();
        // Expired 10 minutes ago, well past the 60s leeway
        let claims = SessionClaims::new(Uuid::new_v4(), false, -600);

        let token = encode_session_token(&claims, &key).unwrap();
        let result = decode_session_token(&token, &key);

        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_expired_token_passes_without_exp_validation() {
        let key = test_key();
        let claims = SessionClaims::new(Uuid::new_v4(), false, -600);

        let token = encode_session_token(&claims, &key).unwrap();
        let config = ValidationConfig::default().skip_exp_validation();
        let decoded = decode_session_token_with_config(&token, &key, &config).unwrap();

        assert_eq!(decoded.sub, claims.sub);
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let key = test_key();
        let other = SessionKey::from_secret_str("another-secret-another-secret-ok!!").unwrap();
        let claims = SessionClaims::new(Uuid::new_v4(), true, 900);

        let token = encode_session_token(&claims, &key).unwrap();
        let result = decode_session_token(&token, &other);

        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let key = test_key();
        let claims = SessionClaims::new(Uuid::new_v4(), true, 900);

        let mut token = encode_session_token(&claims, &key).unwrap();
        // Flip a character in the payload segment
        let dot = token.find('.').unwrap() + 1;
        let replacement = if token.as_bytes()[dot] == b'A' { 'B' } else { 'A' };
        token.replace_range(dot..=dot, &replacement.to_string());

        assert!(decode_session_token(&token, &key).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let key = test_key();
        assert!(decode_session_token("not-a-jwt", &key).is_err());
    }
}
