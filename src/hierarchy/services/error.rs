//! Shared error and result types for hierarchy services.

use crate::access::domain::{AccessError, MembershipError, UserId};
use crate::hierarchy::domain::{
    HierarchyDomainError, OrganizationId, ProjectId, SubtaskId, TaskId, WorkspaceId,
};
use crate::hierarchy::ports::HierarchyRepositoryError;
use crate::taxonomy::ErrorKind;
use thiserror::Error;

/// Result type for hierarchy service operations.
pub type HierarchyServiceResult<T> = Result<T, HierarchyServiceError>;

/// Errors returned by hierarchy services.
#[derive(Debug, Error)]
pub enum HierarchyServiceError {
    /// Domain validation or state transition failed.
    #[error(transparent)]
    Domain(#[from] HierarchyDomainError),

    /// The actor failed the access check.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// A membership list invariant was violated.
    #[error(transparent)]
    Membership(#[from] MembershipError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] HierarchyRepositoryError),

    /// No organization exists with the given identifier.
    #[error("organization {0} not found")]
    OrganizationNotFound(OrganizationId),

    /// No workspace exists with the given identifier.
    #[error("workspace {0} not found")]
    WorkspaceNotFound(WorkspaceId),

    /// No project exists with the given identifier.
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),

    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    /// No subtask exists with the given identifier.
    #[error("subtask {0} not found")]
    SubtaskNotFound(SubtaskId),

    /// Only the task reporter may perform the operation.
    #[error("user {user} is not the reporter of task {task}")]
    NotTaskReporter {
        /// The denied actor.
        user: UserId,
        /// The task whose priority was touched.
        task: TaskId,
    },

    /// The organization owner role is assigned at creation and never
    /// granted through membership operations.
    #[error("the owner role cannot be granted to user {0}")]
    OwnerRoleReserved(UserId),
}

impl HierarchyServiceError {
    /// Maps the error onto the transport-facing taxonomy.
    ///
    /// Returns `None` for persistence-layer failures, which have no
    /// transport mapping and propagate unchanged.
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Domain(domain) => Some(match domain {
                HierarchyDomainError::AlreadyScheduled { .. } => ErrorKind::Conflict,
                HierarchyDomainError::WindowExpired { .. } => ErrorKind::Expired,
                HierarchyDomainError::ProjectLocked { .. } => ErrorKind::LockedResource,
                HierarchyDomainError::EmptyName
                | HierarchyDomainError::NameTooLong(_)
                | HierarchyDomainError::NotScheduled
                | HierarchyDomainError::DeletionPending
                | HierarchyDomainError::InvalidSchedule { .. }
                | HierarchyDomainError::ProjectNotLocked
                | HierarchyDomainError::EmptyNoteBody => ErrorKind::InvalidState,
            }),
            Self::Access(access) => Some(match access {
                AccessError::EntityNotFound => ErrorKind::NotFound,
                AccessError::NotAMember(_) | AccessError::InsufficientRole { .. } => {
                    ErrorKind::Forbidden
                }
            }),
            Self::Membership(membership) => Some(match membership {
                MembershipError::OwnerImmutable(_) => ErrorKind::Forbidden,
                MembershipError::DuplicateMember(_) => ErrorKind::Conflict,
                MembershipError::MemberNotFound(_) => ErrorKind::NotFound,
            }),
            Self::Repository(repository) => match repository {
                HierarchyRepositoryError::DuplicateId(_)
                | HierarchyRepositoryError::DuplicateName(_)
                | HierarchyRepositoryError::VersionConflict { .. } => Some(ErrorKind::Conflict),
                HierarchyRepositoryError::OrganizationNotFound(_)
                | HierarchyRepositoryError::WorkspaceNotFound(_)
                | HierarchyRepositoryError::ProjectNotFound(_)
                | HierarchyRepositoryError::TaskNotFound(_)
                | HierarchyRepositoryError::SubtaskNotFound(_) => Some(ErrorKind::NotFound),
                HierarchyRepositoryError::Persistence(_) => None,
            },
            Self::OrganizationNotFound(_)
            | Self::WorkspaceNotFound(_)
            | Self::ProjectNotFound(_)
            | Self::TaskNotFound(_)
            | Self::SubtaskNotFound(_) => Some(ErrorKind::NotFound),
            Self::NotTaskReporter { .. } => Some(ErrorKind::Forbidden),
            Self::OwnerRoleReserved(_) => Some(ErrorKind::Conflict),
        }
    }
}
