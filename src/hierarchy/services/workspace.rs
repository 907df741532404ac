//! Service layer for workspace creation and lookup.

use super::{HierarchyServiceError, HierarchyServiceResult};
use crate::access::domain::{OrganizationRole, UserId, WorkspaceRole, evaluate};
use crate::hierarchy::domain::{EntityName, OrganizationId, Workspace, WorkspaceId};
use crate::hierarchy::ports::{OrganizationRepository, WorkspaceRepository};
use mockable::Clock;
use std::sync::Arc;

/// Workspace construction and lookup service.
#[derive(Clone)]
pub struct WorkspaceService<O, W, C>
where
    O: OrganizationRepository,
    W: WorkspaceRepository,
    C: Clock + Send + Sync,
{
    organizations: Arc<O>,
    workspaces: Arc<W>,
    clock: Arc<C>,
}

impl<O, W, C> WorkspaceService<O, W, C>
where
    O: OrganizationRepository,
    W: WorkspaceRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new workspace service.
    #[must_use]
    pub const fn new(organizations: Arc<O>, workspaces: Arc<W>, clock: Arc<C>) -> Self {
        Self {
            organizations,
            workspaces,
            clock,
        }
    }

    /// Creates a workspace inside an organization.
    ///
    /// The creating actor must hold owner or admin on the organization and
    /// becomes the workspace's designated admin. The organization owner,
    /// when distinct from the creator, is seeded as a workspace `owner`
    /// member so the tenancy account keeps administrative reach without
    /// role inheritance.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyServiceError::OrganizationNotFound`] for unknown
    /// organizations, access errors for insufficient roles, and
    /// [`crate::hierarchy::domain::HierarchyDomainError::DeletionPending`]
    /// while the organization is scheduled for deletion.
    pub async fn create(
        &self,
        organization: OrganizationId,
        name: impl Into<String> + Send,
        actor: UserId,
    ) -> HierarchyServiceResult<Workspace> {
        let mut parent = self
            .organizations
            .find(organization)
            .await?
            .ok_or(HierarchyServiceError::OrganizationNotFound(organization))?;
        evaluate(
            actor,
            parent.members(),
            &[OrganizationRole::Owner, OrganizationRole::Admin],
        )?;
        parent.ensure_active()?;

        let name = EntityName::new(name)?;
        let mut workspace = Workspace::new(name, parent.id(), actor, &*self.clock);
        if parent.owner() != actor {
            workspace.add_member(parent.owner(), WorkspaceRole::Owner, &*self.clock)?;
        }

        self.workspaces.insert(&workspace).await?;
        parent.attach_workspace(workspace.id(), &*self.clock);
        self.organizations.update(&parent).await?;
        Ok(workspace)
    }

    /// Finds a workspace by id.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyServiceError::WorkspaceNotFound`] when absent.
    pub async fn get(&self, id: WorkspaceId) -> HierarchyServiceResult<Workspace> {
        self.workspaces
            .find(id)
            .await?
            .ok_or(HierarchyServiceError::WorkspaceNotFound(id))
    }
}
