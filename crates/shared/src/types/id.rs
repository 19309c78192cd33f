//! Typed IDs for type-safe entity references.
//!
//! Every entity is identified by an opaque 24-hex-character id: twelve bytes
//! rendered as lowercase hex, with a 4-byte unix-seconds prefix so that
//! freshly generated ids sort roughly by creation time. Parsing accepts
//! either case and canonicalizes to lowercase on display. Typed wrappers
//! prevent accidentally passing a `UserId` where an `AccountId` is expected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an entity id from a string fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseIdError {
    /// The input is not exactly 24 characters long.
    #[error("Entity id must be exactly 24 characters, got {0}")]
    InvalidLength(usize),

    /// The input contains a non-hexadecimal character.
    #[error("Entity id must be hex, found invalid character at position {0}")]
    InvalidCharacter(usize),
}

/// An opaque 12-byte entity identifier, rendered as 24 lowercase hex chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId([u8; 12]);

impl EntityId {
    /// Creates a new id: 4-byte big-endian unix seconds + 8 random bytes.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new() -> Self {
        let seconds = chrono::Utc::now().timestamp() as u32;
        let tail: [u8; 8] = rand::random();

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..].copy_from_slice(&tail);
        Self(bytes)
    }

    /// Creates an id from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn into_bytes(self) -> [u8; 12] {
        self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for EntityId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 24 {
            return Err(ParseIdError::InvalidLength(s.len()));
        }

        let mut bytes = [0u8; 12];
        for (i, chunk) in s.as_bytes().chunks_exact(2).enumerate() {
            let pair = std::str::from_utf8(chunk)
                .map_err(|_| ParseIdError::InvalidCharacter(i * 2))?;
            bytes[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| ParseIdError::InvalidCharacter(i * 2))?;
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for EntityId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.to_string()
    }
}

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub EntityId);

        impl $name {
            /// Creates a new random ID.
            #[must_use]
            pub fn new() -> Self {
                Self(EntityId::new())
            }

            /// Returns the inner entity id.
            #[must_use]
            pub const fn into_inner(self) -> EntityId {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user.");
typed_id!(AccountId, "Unique identifier for an account.");
typed_id!(CategoryId, "Unique identifier for a category.");
typed_id!(TransactionId, "Unique identifier for a transaction.");
typed_id!(BudgetId, "Unique identifier for a budget.");
