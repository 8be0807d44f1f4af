//! Email privacy helpers.
//!
//! Emails from OAuth providers are never stored in plaintext. When a
//! pepper is configured they are normalized and HMAC-SHA-256'd, which
//! still allows equality lookups; without a pepper nothing is stored.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Canonical form used for hashing: trimmed and lowercased.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// HMAC the normalized email with the configured pepper.
///
/// Returns `None` when no pepper is configured, mirroring the storage
/// policy: no pepper, no stored email in any form.
#[must_use]
pub fn hmac_email(email: &str, pepper: Option<&str>) -> Option<String> {
    let pepper = pepper?;
    let normalized = normalize_email(email);

    let mut mac = HmacSha256::new_from_slice(pepper.as_bytes()).ok()?;
    mac.update(normalized.as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
    }

    #[test]
    fn test_hmac_requires_pepper() {
        assert_eq!(hmac_email("user@example.com", None), None);
    }

    #[test]
    fn test_hmac_is_deterministic_and_normalized() {
        let pepper = Some("a-pepper-of-sufficient-length");
        let a = hmac_email("User@Example.com", pepper).unwrap();
        let b = hmac_email("  user@example.COM", pepper).unwrap();
        assert_eq!(a, b);
        // 32-byte digest, hex encoded
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_different_peppers_give_different_digests() {
        let a = hmac_email("user@example.com", Some("pepper-one")).unwrap();
        let b = hmac_email("user@example.com", Some("pepper-two")).unwrap();
        assert_ne!(a, b);
    }
}
