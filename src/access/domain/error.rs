//! Error types for membership and role parsing.

use super::UserId;
use thiserror::Error;

/// Errors returned by membership list mutations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MembershipError {
    /// The designated principal's record cannot be removed or re-roled.
    #[error("the designated owner record for user {0} is immutable")]
    OwnerImmutable(UserId),

    /// The user already appears in the member list.
    #[error("user {0} is already a member")]
    DuplicateMember(UserId),

    /// The user does not appear in the member list.
    #[error("user {0} is not in the member list")]
    MemberNotFound(UserId),
}

/// Error returned while parsing roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);
