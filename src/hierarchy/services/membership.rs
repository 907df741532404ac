//! Membership store: typed member operations per hierarchy level.
//!
//! All member mutations flow through this service so the structural
//! invariants (single immutable owner, at-most-once membership) are
//! enforced in one place instead of ad hoc array edits in callers.
//! Membership lists are independent between levels; nothing here copies
//! or inherits roles across them.

use super::{HierarchyServiceError, HierarchyServiceResult};
use crate::access::domain::{
    OrganizationRole, ProjectRole, UserId, WorkspaceRole, evaluate,
};
use crate::hierarchy::domain::{Organization, OrganizationId, Project, ProjectId, Workspace, WorkspaceId};
use crate::hierarchy::ports::{OrganizationRepository, ProjectRepository, WorkspaceRepository};
use mockable::Clock;
use std::sync::Arc;

/// Roles allowed to manage organization membership.
const ORG_MANAGE: [OrganizationRole; 2] = [OrganizationRole::Owner, OrganizationRole::Admin];

/// Roles allowed to manage workspace membership.
const WORKSPACE_MANAGE: [WorkspaceRole; 2] = [WorkspaceRole::Owner, WorkspaceRole::Admin];

/// Roles allowed to manage project membership.
const PROJECT_MANAGE: [ProjectRole; 2] = [ProjectRole::Owner, ProjectRole::Admin];

/// Membership operations across all three membership-bearing levels.
#[derive(Clone)]
pub struct MembershipService<O, W, P, C>
where
    O: OrganizationRepository,
    W: WorkspaceRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    organizations: Arc<O>,
    workspaces: Arc<W>,
    projects: Arc<P>,
    clock: Arc<C>,
}

impl<O, W, P, C> MembershipService<O, W, P, C>
where
    O: OrganizationRepository,
    W: WorkspaceRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new membership service.
    #[must_use]
    pub const fn new(
        organizations: Arc<O>,
        workspaces: Arc<W>,
        projects: Arc<P>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            organizations,
            workspaces,
            projects,
            clock,
        }
    }

    async fn find_organization(
        &self,
        id: OrganizationId,
    ) -> HierarchyServiceResult<Organization> {
        self.organizations
            .find(id)
            .await?
            .ok_or(HierarchyServiceError::OrganizationNotFound(id))
    }

    async fn find_workspace(&self, id: WorkspaceId) -> HierarchyServiceResult<Workspace> {
        self.workspaces
            .find(id)
            .await?
            .ok_or(HierarchyServiceError::WorkspaceNotFound(id))
    }

    async fn find_project(&self, id: ProjectId) -> HierarchyServiceResult<Project> {
        self.projects
            .find(id)
            .await?
            .ok_or(HierarchyServiceError::ProjectNotFound(id))
    }

    /// Adds a member to an organization.
    ///
    /// The owner role is assigned at creation only and can never be
    /// granted here; that keeps the exactly-one-owner invariant local to
    /// construction.
    ///
    /// # Errors
    ///
    /// Returns not-found, access, lifecycle, and membership invariant
    /// errors per the standard evaluation order.
    pub async fn add_organization_member(
        &self,
        organization: OrganizationId,
        actor: UserId,
        user: UserId,
        role: OrganizationRole,
    ) -> HierarchyServiceResult<()> {
        let mut target = self.find_organization(organization).await?;
        evaluate(actor, target.members(), &ORG_MANAGE)?;
        target.ensure_active()?;
        if role == OrganizationRole::Owner {
            return Err(HierarchyServiceError::OwnerRoleReserved(user));
        }
        target.add_member(user, role, &*self.clock)?;
        self.organizations.update(&target).await?;
        Ok(())
    }

    /// Removes a member from an organization.
    ///
    /// # Errors
    ///
    /// Returns [`crate::access::domain::MembershipError::OwnerImmutable`]
    /// for the owner, plus the standard guards.
    pub async fn remove_organization_member(
        &self,
        organization: OrganizationId,
        actor: UserId,
        user: UserId,
    ) -> HierarchyServiceResult<()> {
        let mut target = self.find_organization(organization).await?;
        evaluate(actor, target.members(), &ORG_MANAGE)?;
        target.ensure_active()?;
        target.remove_member(user, &*self.clock)?;
        self.organizations.update(&target).await?;
        Ok(())
    }

    /// Changes an organization member's role.
    ///
    /// # Errors
    ///
    /// Returns [`crate::access::domain::MembershipError::OwnerImmutable`]
    /// for the owner, [`HierarchyServiceError::OwnerRoleReserved`] when
    /// promoting to owner, plus the standard guards.
    pub async fn update_organization_member_role(
        &self,
        organization: OrganizationId,
        actor: UserId,
        user: UserId,
        role: OrganizationRole,
    ) -> HierarchyServiceResult<()> {
        let mut target = self.find_organization(organization).await?;
        evaluate(actor, target.members(), &ORG_MANAGE)?;
        target.ensure_active()?;
        if role == OrganizationRole::Owner {
            return Err(HierarchyServiceError::OwnerRoleReserved(user));
        }
        target.update_member_role(user, role, &*self.clock)?;
        self.organizations.update(&target).await?;
        Ok(())
    }

    /// Adds a member to a workspace.
    ///
    /// # Errors
    ///
    /// Returns not-found, access, lifecycle, and membership invariant
    /// errors per the standard evaluation order.
    pub async fn add_workspace_member(
        &self,
        workspace: WorkspaceId,
        actor: UserId,
        user: UserId,
        role: WorkspaceRole,
    ) -> HierarchyServiceResult<()> {
        let mut target = self.find_workspace(workspace).await?;
        evaluate(actor, target.members(), &WORKSPACE_MANAGE)?;
        target.ensure_active()?;
        target.add_member(user, role, &*self.clock)?;
        self.workspaces.update(&target).await?;
        Ok(())
    }

    /// Removes a member from a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`crate::access::domain::MembershipError::OwnerImmutable`]
    /// for the designated admin, plus the standard guards.
    pub async fn remove_workspace_member(
        &self,
        workspace: WorkspaceId,
        actor: UserId,
        user: UserId,
    ) -> HierarchyServiceResult<()> {
        let mut target = self.find_workspace(workspace).await?;
        evaluate(actor, target.members(), &WORKSPACE_MANAGE)?;
        target.ensure_active()?;
        target.remove_member(user, &*self.clock)?;
        self.workspaces.update(&target).await?;
        Ok(())
    }

    /// Changes a workspace member's role.
    ///
    /// # Errors
    ///
    /// Returns [`crate::access::domain::MembershipError::OwnerImmutable`]
    /// for the designated admin, plus the standard guards.
    pub async fn update_workspace_member_role(
        &self,
        workspace: WorkspaceId,
        actor: UserId,
        user: UserId,
        role: WorkspaceRole,
    ) -> HierarchyServiceResult<()> {
        let mut target = self.find_workspace(workspace).await?;
        evaluate(actor, target.members(), &WORKSPACE_MANAGE)?;
        target.ensure_active()?;
        target.update_member_role(user, role, &*self.clock)?;
        self.workspaces.update(&target).await?;
        Ok(())
    }

    /// Adds a member to a project.
    ///
    /// # Errors
    ///
    /// Returns not-found, access, lock, and membership invariant errors
    /// per the standard evaluation order.
    pub async fn add_project_member(
        &self,
        project: ProjectId,
        actor: UserId,
        user: UserId,
        role: ProjectRole,
    ) -> HierarchyServiceResult<()> {
        let mut target = self.find_project(project).await?;
        evaluate(actor, target.members(), &PROJECT_MANAGE)?;
        target.ensure_unlocked()?;
        target.add_member(user, role, &*self.clock)?;
        self.projects.update(&target).await?;
        Ok(())
    }

    /// Removes a member from a project.
    ///
    /// # Errors
    ///
    /// Returns [`crate::access::domain::MembershipError::OwnerImmutable`]
    /// for the project owner, plus the standard guards.
    pub async fn remove_project_member(
        &self,
        project: ProjectId,
        actor: UserId,
        user: UserId,
    ) -> HierarchyServiceResult<()> {
        let mut target = self.find_project(project).await?;
        evaluate(actor, target.members(), &PROJECT_MANAGE)?;
        target.ensure_unlocked()?;
        target.remove_member(user, &*self.clock)?;
        self.projects.update(&target).await?;
        Ok(())
    }

    /// Changes a project member's role.
    ///
    /// # Errors
    ///
    /// Returns [`crate::access::domain::MembershipError::OwnerImmutable`]
    /// for the project owner, plus the standard guards.
    pub async fn update_project_member_role(
        &self,
        project: ProjectId,
        actor: UserId,
        user: UserId,
        role: ProjectRole,
    ) -> HierarchyServiceResult<()> {
        let mut target = self.find_project(project).await?;
        evaluate(actor, target.members(), &PROJECT_MANAGE)?;
        target.ensure_unlocked()?;
        target.update_member_role(user, role, &*self.clock)?;
        self.projects.update(&target).await?;
        Ok(())
    }

    /// Derives the account-level display role from organization
    /// memberships at read time.
    ///
    /// The highest-ranked role across all memberships wins; an account
    /// with no organization membership has no display role. Nothing is
    /// stored, so there is no second source of truth to drift.
    ///
    /// # Errors
    ///
    /// Returns repository errors from the membership scan.
    pub async fn account_role(
        &self,
        user: UserId,
    ) -> HierarchyServiceResult<Option<OrganizationRole>> {
        let organizations = self.organizations.list_with_member(user).await?;
        Ok(organizations
            .iter()
            .filter_map(|organization| organization.members().role_of(user))
            .max_by_key(|role| role.authority()))
    }
}
