//! Invitation token generation and hashing.
//!
//! The raw token is 32 cryptographically random bytes, hex-encoded, and
//! leaves the system exactly once (inside the invitation email). Storage
//! only ever sees the SHA-256 digest, so a leaked database cannot redeem
//! outstanding invitations.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex-encoded SHA-256 digest of a raw invitation token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenHash(String);

impl TokenHash {
    /// Hashes a raw token for storage or lookup.
    #[must_use]
    pub fn of(raw_token: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(raw_token.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Returns the digest as a hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A freshly generated raw token together with its storage hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    raw: String,
    hash: TokenHash,
}

impl IssuedToken {
    /// Generates a new random token pair.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let raw = hex::encode(bytes);
        let hash = TokenHash::of(&raw);
        Self { raw, hash }
    }

    /// Returns the raw token; transmitted once, never stored.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the storage hash.
    #[must_use]
    pub const fn hash(&self) -> &TokenHash {
        &self.hash
    }

    /// Splits the pair, consuming it.
    #[must_use]
    pub fn into_parts(self) -> (String, TokenHash) {
        (self.raw, self.hash)
    }
}
