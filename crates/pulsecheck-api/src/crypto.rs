//! Encryption at rest for free-text fields.
//!
//! AES-256-GCM with the envelope layout `iv(12) || tag(16) || ciphertext`
//! stored in a single BYTEA column. The key is optional: without one,
//! sensitive fields are simply not persisted.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::RngCore;
use thiserror::Error;

/// Size of the AES-256 key in bytes.
const KEY_SIZE: usize = 32;

/// Size of the GCM nonce (IV) in bytes.
const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag in bytes.
const TAG_SIZE: usize = 16;

/// Errors that can occur during notes encryption operations.
#[derive(Debug, Error)]
pub enum NotesEncryptionError {
    #[error("Invalid encryption key length: expected {KEY_SIZE} bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid encrypted payload: {0} bytes is shorter than iv+tag")]
    InvalidPayload(usize),
}

/// Handles encryption and decryption of user notes and feature payloads.
#[derive(Clone)]
pub struct NotesEncryption {
    cipher: Aes256Gcm,
}

impl NotesEncryption {
    /// Create an instance from the configured secret string.
    ///
    /// Base64 input is preferred when it decodes to exactly 32 bytes;
    /// otherwise the raw UTF-8 bytes are used and must be exactly 32.
    pub fn from_secret_str(secret: &str) -> Result<Self, NotesEncryptionError> {
        let key = match STANDARD.decode(secret.trim()) {
            Ok(decoded) if decoded.len() == KEY_SIZE => decoded,
            _ => secret.as_bytes().to_vec(),
        };
        Self::from_key(&key)
    }

    /// Create an instance from raw key bytes.
    pub fn from_key(key: &[u8]) -> Result<Self, NotesEncryptionError> {
        if key.len() != KEY_SIZE {
            return Err(NotesEncryptionError::InvalidKeyLength(key.len()));
        }

        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| NotesEncryptionError::InvalidKeyFormat(e.to_string()))?;

        Ok(Self { cipher })
    }

    /// Encrypt a plaintext into an `iv || tag || ciphertext` envelope.
    pub fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>, NotesEncryptionError> {
        let mut iv = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut iv);
        let nonce = Nonce::from_slice(&iv);

        // aes-gcm appends the tag to the ciphertext; the stored envelope
        // wants it up front, after the iv.
        let sealed = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| NotesEncryptionError::EncryptionFailed(e.to_string()))?;
        let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_SIZE);

        let mut envelope = Vec::with_capacity(NONCE_SIZE + TAG_SIZE + ciphertext.len());
        envelope.extend_from_slice(&iv);
        envelope.extend_from_slice(tag);
        envelope.extend_from_slice(ciphertext);
        Ok(envelope)
    }

    /// Decrypt an `iv || tag || ciphertext` envelope.
    pub fn decrypt(&self, envelope: &[u8]) -> Result<String, NotesEncryptionError> {
        if envelope.len() < NONCE_SIZE + TAG_SIZE {
            return Err(NotesEncryptionError::InvalidPayload(envelope.len()));
        }

        let (iv, rest) = envelope.split_at(NONCE_SIZE);
        let (tag, ciphertext) = rest.split_at(TAG_SIZE);
        let nonce = Nonce::from_slice(iv);

        let mut sealed = Vec::with_capacity(ciphertext.len() + TAG_SIZE);
        sealed.extend_from_slice(ciphertext);
        sealed.extend_from_slice(tag);

        let plaintext = self
            .cipher
            .decrypt(nonce, sealed.as_ref())
            .map_err(|e| NotesEncryptionError::DecryptionFailed(e.to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|e| NotesEncryptionError::DecryptionFailed(e.to_string()))
    }

    /// Generate a new random base64 key (for initial setup).
    #[must_use]
    pub fn generate_key() -> String {
        let mut key = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut key);
        STANDARD.encode(key)
    }
}

impl std::fmt::Debug for NotesEncryption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotesEncryption")
            .field("cipher", &"[REDACTED]")
            .finish()
    }
}

/// Best-effort encryption: `None` when no key is configured, and `None`
/// with a log line on the (unexpected) cipher failure path, so a missing
/// key never blocks a check-in from being stored.
#[must_use]
pub fn try_encrypt(encryption: Option<&NotesEncryption>, plaintext: &str) -> Option<Vec<u8>> {
    let encryption = encryption?;
    match encryption.encrypt(plaintext) {
        Ok(envelope) => Some(envelope),
        Err(e) => {
            tracing::error!("Dropping sensitive field, encryption failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> Vec<u8> {
        (0u8..32).collect()
    }

    #[test]
    fn test_round_trip() {
        let enc = NotesEncryption::from_key(&test_key()).unwrap();
        let envelope = enc.encrypt("slept badly, long day").unwrap();
        assert_eq!(enc.decrypt(&envelope).unwrap(), "slept badly, long day");
    }

    #[test]
    fn test_envelope_layout() {
        let enc = NotesEncryption::from_key(&test_key()).unwrap();
        let plaintext = "hello";
        let envelope = enc.encrypt(plaintext).unwrap();
        // iv(12) + tag(16) + ciphertext(len(plaintext) for GCM)
        assert_eq!(envelope.len(), 12 + 16 + plaintext.len());
    }

    #[test]
    fn test_encrypt_is_randomized() {
        let enc = NotesEncryption::from_key(&test_key()).unwrap();
        let a = enc.encrypt("same text").unwrap();
        let b = enc.encrypt("same text").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_tampered_envelope_is_rejected() {
        let enc = NotesEncryption::from_key(&test_key()).unwrap();
        let mut envelope = enc.encrypt("integrity matters").unwrap();
        let last = envelope.len() - 1;
        envelope[last] ^= 0x01;
        assert!(matches!(
            enc.decrypt(&envelope),
            Err(NotesEncryptionError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn test_short_payload_is_rejected() {
        let enc = NotesEncryption::from_key(&test_key()).unwrap();
        assert!(matches!(
            enc.decrypt(&[0u8; 27]),
            Err(NotesEncryptionError::InvalidPayload(27))
        ));
    }

    #[test]
    fn test_wrong_key_length_is_rejected() {
        assert!(matches!(
            NotesEncryption::from_key(&[0u8; 16]),
            Err(NotesEncryptionError::InvalidKeyLength(16))
        ));
    }

    #[test]
    fn test_base64_secret_accepted() {
        let secret = NotesEncryption::generate_key();
        assert!(NotesEncryption::from_secret_str(&secret).is_ok());
    }

    #[test]
    fn test_utf8_secret_of_exactly_32_bytes_accepted() {
        assert!(NotesEncryption::from_secret_str("0123456789abcdef0123456789abcdef").is_ok());
        assert!(NotesEncryption::from_secret_str("too-short").is_err());
    }

    #[test]
    fn test_try_encrypt_without_key_is_none() {
        assert_eq!(try_encrypt(None, "anything"), None);
    }

    #[test]
    fn test_try_encrypt_with_key_round_trips() {
        let enc = NotesEncryption::from_key(&test_key()).unwrap();
        let envelope = try_encrypt(Some(&enc), "note").unwrap();
        assert_eq!(enc.decrypt(&envelope).unwrap(), "note");
    }
}
