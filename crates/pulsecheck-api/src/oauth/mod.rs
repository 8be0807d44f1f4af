//! OAuth identity bridging.
//!
//! pulsecheck does not run its own password auth; accounts are anonymous
//! until the user attaches a Google identity through the standard
//! authorization-code flow. This module holds the provider client and the
//! signed state tokens used for CSRF protection.

pub mod google;
pub mod state;

pub use google::{GoogleProvider, GoogleUserInfo};
pub use state::OAuthStateSigner;

use pulsecheck_core::PulsecheckError;
use thiserror::Error;
use uuid::Uuid;

/// Errors from the OAuth bridge.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The state parameter was missing, expired, or failed verification.
    #[error("Invalid OAuth state")]
    InvalidState,

    /// The provider rejected or failed the request.
    #[error("Provider error: {0}")]
    Provider(String),

    /// A network failure talking to the provider.
    #[error("Provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider response lacked a required field.
    #[error("Provider response missing {0}")]
    MissingField(&'static str),
}

/// What the callback should do with a verified provider identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeAction {
    /// The identity is already attached to this user: sign them in.
    SignIn(Uuid),
    /// The caller's session user gains the identity.
    Link(Uuid),
    /// Nobody owns the identity and there is no session: new account.
    CreateUser,
}

/// Decide how a verified identity maps onto app users.
///
/// `identity_owner` is the user already holding this `(provider, subject)`
/// pair, if any; `session_user` is the caller's current session user, if
/// any. An identity owned by a different user than the session's is a
/// conflict: identities never move between accounts implicitly.
pub fn decide_bridge(
    identity_owner: Option<Uuid>,
    session_user: Option<Uuid>,
) -> Result<BridgeAction, PulsecheckError> {
    match (identity_owner, session_user) {
        (Some(owner), Some(current)) if owner != current => Err(PulsecheckError::Conflict {
            message: "This Google account is already linked to another user".to_string(),
        }),
        (Some(owner), _) => Ok(BridgeAction::SignIn(owner)),
        (None, Some(current)) => Ok(BridgeAction::Link(current)),
        (None, None) => Ok(BridgeAction::CreateUser),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_identity_signs_in_its_owner() {
        let owner = Uuid::new_v4();
        assert_eq!(
            decide_bridge(Some(owner), None).unwrap(),
            BridgeAction::SignIn(owner)
        );
        // Same user holding the session is fine too
        assert_eq!(
            decide_bridge(Some(owner), Some(owner)).unwrap(),
            BridgeAction::SignIn(owner)
        );
    }

    #[test]
    fn test_identity_owned_elsewhere_conflicts() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let err = decide_bridge(Some(owner), Some(other)).unwrap_err();
        assert!(matches!(err, PulsecheckError::Conflict { .. }));
    }

    #[test]
    fn test_fresh_identity_links_to_session_user() {
        let current = Uuid::new_v4();
        assert_eq!(
            decide_bridge(None, Some(current)).unwrap(),
            BridgeAction::Link(current)
        );
    }

    #[test]
    fn test_no_identity_no_session_creates_user() {
        assert_eq!(decide_bridge(None, None).unwrap(), BridgeAction::CreateUser);
    }
}
