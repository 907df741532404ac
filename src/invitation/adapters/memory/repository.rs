//! In-memory invitation repository.

use crate::access::domain::{EmailAddress, UserId};
use crate::hierarchy::domain::OrganizationId;
use crate::invitation::domain::{Invitation, InvitationId, InvitationStatus, TokenHash};
use crate::invitation::ports::{
    InvitationRepoResult, InvitationRepository, InvitationRepositoryError,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory invitation repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInvitationRepository {
    state: Arc<RwLock<InvitationState>>,
}

#[derive(Debug, Default)]
struct InvitationState {
    invitations: HashMap<InvitationId, Invitation>,
    hash_index: HashMap<TokenHash, InvitationId>,
}

impl InMemoryInvitationRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> InvitationRepositoryError {
    InvitationRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl InvitationRepository for InMemoryInvitationRepository {
    async fn insert(&self, invitation: &Invitation) -> InvitationRepoResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.invitations.contains_key(&invitation.id()) {
            return Err(InvitationRepositoryError::DuplicateId(invitation.id()));
        }
        state
            .hash_index
            .insert(invitation.token_hash().clone(), invitation.id());
        state
            .invitations
            .insert(invitation.id(), invitation.clone());
        Ok(())
    }

    async fn update(&self, invitation: &Invitation) -> InvitationRepoResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let stored = state
            .invitations
            .get(&invitation.id())
            .ok_or(InvitationRepositoryError::NotFound(invitation.id()))?;
        if stored.version() != invitation.version() {
            return Err(InvitationRepositoryError::VersionConflict {
                expected: invitation.version(),
                stored: stored.version(),
            });
        }
        let mut updated = invitation.clone();
        updated.bump_version();
        state.invitations.insert(invitation.id(), updated);
        Ok(())
    }

    async fn find(&self, id: InvitationId) -> InvitationRepoResult<Option<Invitation>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.invitations.get(&id).cloned())
    }

    async fn find_by_token_hash(
        &self,
        hash: &TokenHash,
    ) -> InvitationRepoResult<Option<Invitation>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .hash_index
            .get(hash)
            .and_then(|id| state.invitations.get(id))
            .cloned())
    }

    async fn find_pending(
        &self,
        email: &EmailAddress,
        invited_by: UserId,
        organization: OrganizationId,
    ) -> InvitationRepoResult<Option<Invitation>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .invitations
            .values()
            .find(|invitation| {
                invitation.status() == InvitationStatus::Pending
                    && invitation.email() == email
                    && invitation.invited_by() == invited_by
                    && invitation.organization() == organization
            })
            .cloned())
    }

    async fn list_for_organization(
        &self,
        organization: OrganizationId,
    ) -> InvitationRepoResult<Vec<Invitation>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .invitations
            .values()
            .filter(|invitation| invitation.organization() == organization)
            .cloned()
            .collect())
    }
}
