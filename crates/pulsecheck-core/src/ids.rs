//! Strongly typed identifiers
//!
//! Newtype wrappers around [`Uuid`] for the entities pulsecheck persists.
//! Using distinct types prevents accidentally passing a check-in id where a
//! user id is expected.
//!
//! # Example
//!
//! ```
//! use pulsecheck_core::{UserId, CheckInId};
//!
//! let user = UserId::new();
//! let check_in = CheckInId::new();
//!
//! fn requires_user(id: UserId) -> String {
//!     id.to_string()
//! }
//!
//! let _ = requires_user(user);
//! // requires_user(check_in); // does not compile
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Error type for ID parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse.
    pub id_type: &'static str,
    /// The underlying UUID parse error message.
    pub message: String,
}

impl Display for ParseIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse {}: {}", self.id_type, self.message)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to define a strongly-typed ID type.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random ID using UUID v4.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns a reference to the underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| ParseIdError {
                        id_type: stringify!($name),
                        message: e.to_string(),
                    })
            }
        }
    };
}

define_id!(
    /// Strongly typed identifier for user accounts.
    ///
    /// Users may be anonymous (minted on first write) or bridged to an
    /// OAuth identity; the id stays stable across that transition.
    ///
    /// # Example
    ///
    /// ```
    /// use pulsecheck_core::UserId;
    /// use uuid::Uuid;
    ///
    /// let user_id = UserId::new();
    ///
    /// let uuid = Uuid::new_v4();
    /// let user_id = UserId::from_uuid(uuid);
    /// assert_eq!(user_id.as_uuid(), &uuid);
    ///
    /// let user_id: UserId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
    /// ```
    UserId
);

define_id!(
    /// Strongly typed identifier for daily check-in records.
    CheckInId
);

define_id!(
    /// Strongly typed identifier for stored risk predictions.
    PredictionId
);
