//! Error types for invitation state transitions and parsing.

use super::InvitationStatus;
use thiserror::Error;

/// Errors returned by invitation state transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvitationDomainError {
    /// The invitation has already left the pending state; every such
    /// transition is terminal.
    #[error("invitation is {0}, only pending invitations can transition")]
    InvalidState(InvitationStatus),
}

/// Error returned while parsing invitation statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown invitation status: {0}")]
pub struct ParseInvitationStatusError(pub String);
