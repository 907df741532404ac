//! Error-kind taxonomy shared by every service boundary.
//!
//! Rejected mutations carry both a human-readable reason (the error's
//! `Display` output) and one of these kinds so transport layers can map them
//! to protocol responses without matching on context-specific variants.

use std::fmt;

/// Classification of a rejected core operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The target entity does not exist.
    NotFound,
    /// The actor lacks the membership or role the operation requires.
    Forbidden,
    /// A uniqueness or concurrency invariant was violated.
    Conflict,
    /// The entity is in the wrong lifecycle state for the transition.
    InvalidState,
    /// A token or recovery window has passed its deadline.
    Expired,
    /// The target project is locked against mutation.
    LockedResource,
}

impl ErrorKind {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Conflict => "conflict",
            Self::InvalidState => "invalid_state",
            Self::Expired => "expired",
            Self::LockedResource => "locked_resource",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
