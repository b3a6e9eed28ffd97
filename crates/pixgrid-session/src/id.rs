//! Session identifiers.

use std::borrow::Borrow;
use std::fmt;

use crate::error::SessionError;

/// Random bytes per identifier (128 bits).
pub const ID_BYTES: usize = 16;

/// Opaque, unguessable session identifier.
///
/// Rendered as 32 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Draw a fresh identifier from the OS random number generator.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Randomness`] if the generator fails.
    /// The failure is not retried.
    pub fn generate() -> Result<Self, SessionError> {
        let mut bytes = [0u8; ID_BYTES];
        getrandom::fill(&mut bytes).map_err(SessionError::Randomness)?;
        Ok(Self(hex::encode(bytes)))
    }

    /// The identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}
