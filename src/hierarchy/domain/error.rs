//! Error types for hierarchy domain validation and state transitions.

use crate::access::domain::UserId;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned while constructing or mutating hierarchy aggregates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HierarchyDomainError {
    /// The display name is empty after trimming.
    #[error("name must not be empty")]
    EmptyName,

    /// The display name exceeds the persisted maximum.
    #[error("name '{0}' exceeds 120 characters")]
    NameTooLong(String),

    /// A deletion request already exists.
    #[error("deletion is already scheduled for {scheduled_at}")]
    AlreadyScheduled {
        /// When the pending deletion becomes permanent.
        scheduled_at: DateTime<Utc>,
    },

    /// Recovery or purge was requested while no deletion is scheduled.
    #[error("no deletion is scheduled")]
    NotScheduled,

    /// The recovery window has closed.
    #[error("the recovery window closed at {scheduled_at}")]
    WindowExpired {
        /// The deadline that has passed.
        scheduled_at: DateTime<Utc>,
    },

    /// The entity is scheduled for deletion and rejects mutation.
    #[error("the entity is pending deletion")]
    DeletionPending,

    /// The due date precedes the start date.
    #[error("due date {due} precedes start date {start}")]
    InvalidSchedule {
        /// Scheduled start.
        start: DateTime<Utc>,
        /// Scheduled due date.
        due: DateTime<Utc>,
    },

    /// The project is locked against mutation.
    #[error("project is locked by user {locked_by}")]
    ProjectLocked {
        /// Who locked the project.
        locked_by: UserId,
    },

    /// Unlock was requested on a project that is not locked.
    #[error("project is not locked")]
    ProjectNotLocked,

    /// The note body is empty after trimming.
    #[error("note body must not be empty")]
    EmptyNoteBody,
}

/// Error returned while parsing status and priority values from
/// persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown status value: {0}")]
pub struct ParseStatusError(pub String);
