//! Validated email address type.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum accepted address length, matching the persistence column.
const MAX_EMAIL_LENGTH: usize = 255;

/// Error returned when an email address fails validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid email address: {0}")]
pub struct InvalidEmail(pub String);

/// Validated, case-normalised email address.
///
/// Addresses are trimmed and lowercased on construction, so equality and
/// hashing over the stored form are case-insensitive. Validation is
/// shallow (one `@` with non-empty sides); deliverability is the
/// notification boundary's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidEmail`] when the trimmed value is empty, longer than
    /// 255 characters, or not of the form `local@domain`.
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidEmail> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();

        if normalized.is_empty() || normalized.len() > MAX_EMAIL_LENGTH {
            return Err(InvalidEmail(raw));
        }

        let mut parts = normalized.split('@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        let has_more = parts.next().is_some();

        if local.is_empty() || domain.is_empty() || has_more || domain.contains(char::is_whitespace)
        {
            return Err(InvalidEmail(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalised address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
