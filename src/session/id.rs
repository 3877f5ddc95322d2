//! Session key derivation.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};

/// Stable identity for a shell session as seen by the renderer.
///
/// The key is the SHA-256 digest of the session's unique name, rendered as
/// lowercase hex. The same name always yields the same key, and the raw
/// name never reaches the renderer process.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    /// Length of a key in hex characters.
    pub const LEN: usize = 64;

    /// Derive the key for a session name.
    pub fn derive(name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionKey {
    type Err = hex::FromHexError;

    /// Parse an already-derived key, e.g. one read back from the renderer's
    /// environment.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        if bytes.len() != Self::LEN / 2 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        Ok(Self(s.to_ascii_lowercase()))
    }
}
