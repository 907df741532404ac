//! Repository port for invitation persistence.

use crate::access::domain::{EmailAddress, UserId};
use crate::hierarchy::domain::OrganizationId;
use crate::invitation::domain::{Invitation, InvitationId, TokenHash};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for invitation repository operations.
pub type InvitationRepoResult<T> = Result<T, InvitationRepositoryError>;

/// Errors returned by invitation repository implementations.
#[derive(Debug, Clone, Error)]
pub enum InvitationRepositoryError {
    /// An invitation with the same identifier already exists.
    #[error("duplicate invitation identifier: {0}")]
    DuplicateId(InvitationId),

    /// The invitation was not found.
    #[error("invitation not found: {0}")]
    NotFound(InvitationId),

    /// The stored version no longer matches the loaded one.
    #[error("stale invitation write: expected version {expected}, stored {stored}")]
    VersionConflict {
        /// The version carried by the write.
        expected: u64,
        /// The version found in storage.
        stored: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl InvitationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Invitation persistence contract.
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Stores a new invitation.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationRepositoryError::DuplicateId`] when the id is
    /// taken.
    async fn insert(&self, invitation: &Invitation) -> InvitationRepoResult<()>;

    /// Persists a state transition on an existing invitation.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationRepositoryError::NotFound`] for unknown ids and
    /// [`InvitationRepositoryError::VersionConflict`] for stale writes —
    /// which is what makes redeeming a token single-use under races.
    async fn update(&self, invitation: &Invitation) -> InvitationRepoResult<()>;

    /// Finds an invitation by id; `None` when absent.
    async fn find(&self, id: InvitationId) -> InvitationRepoResult<Option<Invitation>>;

    /// Finds an invitation by its token hash; `None` when absent.
    async fn find_by_token_hash(&self, hash: &TokenHash)
    -> InvitationRepoResult<Option<Invitation>>;

    /// Finds a pending invitation for the same email, inviter, and
    /// organization; `None` when absent.
    async fn find_pending(
        &self,
        email: &EmailAddress,
        invited_by: UserId,
        organization: OrganizationId,
    ) -> InvitationRepoResult<Option<Invitation>>;

    /// Returns every invitation issued for the organization.
    async fn list_for_organization(
        &self,
        organization: OrganizationId,
    ) -> InvitationRepoResult<Vec<Invitation>>;
}
