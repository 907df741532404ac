//! Lifecycle manager: soft deletion, recovery, and cascading purges.

use super::cascade::collect_workspace_subtree;
use super::{HierarchyServiceError, HierarchyServiceResult};
use crate::access::domain::{OrganizationRole, UserId, WorkspaceRole, evaluate};
use crate::hierarchy::domain::{
    Organization, OrganizationId, ParentDetach, PurgePlan, Workspace, WorkspaceId,
};
use crate::hierarchy::ports::{
    OrganizationRepository, ProjectRepository, PurgeExecutor, TaskRepository, WorkspaceRepository,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Result of a purge attempt.
///
/// The purge path re-checks the deletion schedule at execution time, so a
/// sweep racing a user-initiated recovery resolves to a skip instead of
/// deleting a live entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeOutcome {
    /// The subtree was removed; carries the number of deleted entities.
    Purged {
        /// How many entities the cascade removed.
        entities: usize,
    },
    /// The entity was recovered between scheduling and execution.
    SkippedActive,
    /// The deletion deadline has not passed yet.
    SkippedNotDue,
    /// The entity no longer exists (already purged).
    Missing,
}

impl PurgeOutcome {
    /// Returns whether the entity was actually removed.
    #[must_use]
    pub const fn is_purged(&self) -> bool {
        matches!(self, Self::Purged { .. })
    }
}

/// Soft-delete lifecycle orchestration for organizations and workspaces.
#[derive(Clone)]
pub struct LifecycleService<O, W, P, T, X, C>
where
    O: OrganizationRepository,
    W: WorkspaceRepository,
    P: ProjectRepository,
    T: TaskRepository,
    X: PurgeExecutor,
    C: Clock + Send + Sync,
{
    organizations: Arc<O>,
    workspaces: Arc<W>,
    projects: Arc<P>,
    tasks: Arc<T>,
    purge: Arc<X>,
    clock: Arc<C>,
}

impl<O, W, P, T, X, C> LifecycleService<O, W, P, T, X, C>
where
    O: OrganizationRepository,
    W: WorkspaceRepository,
    P: ProjectRepository,
    T: TaskRepository,
    X: PurgeExecutor,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service.
    #[must_use]
    pub const fn new(
        organizations: Arc<O>,
        workspaces: Arc<W>,
        projects: Arc<P>,
        tasks: Arc<T>,
        purge: Arc<X>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            organizations,
            workspaces,
            projects,
            tasks,
            purge,
            clock,
        }
    }

    async fn find_organization(&self, id: OrganizationId) -> HierarchyServiceResult<Organization> {
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

    /// Requests deletion of an organization, opening its 28-day recovery
    /// window.
    ///
    /// Only the organization owner may request deletion of the tenancy.
    ///
    /// # Errors
    ///
    /// Returns not-found and access errors, and
    /// [`crate::hierarchy::domain::HierarchyDomainError::AlreadyScheduled`]
    /// when a request is already pending.
    pub async fn request_organization_deletion(
        &self,
        id: OrganizationId,
        actor: UserId,
        reason: Option<String>,
    ) -> HierarchyServiceResult<Organization> {
        let mut organization = self.find_organization(id).await?;
        evaluate(actor, organization.members(), &[OrganizationRole::Owner])?;
        organization.request_deletion(actor, reason, &*self.clock)?;
        self.organizations.update(&organization).await?;
        info!(organization = %id, "organization deletion scheduled");
        Ok(organization)
    }

    /// Recovers an organization from a pending deletion.
    ///
    /// # Errors
    ///
    /// Returns not-found and access errors,
    /// [`crate::hierarchy::domain::HierarchyDomainError::NotScheduled`]
    /// when nothing is pending, and
    /// [`crate::hierarchy::domain::HierarchyDomainError::WindowExpired`]
    /// once the deadline has passed.
    pub async fn recover_organization(
        &self,
        id: OrganizationId,
        actor: UserId,
    ) -> HierarchyServiceResult<Organization> {
        let mut organization = self.find_organization(id).await?;
        evaluate(
            actor,
            organization.members(),
            &[OrganizationRole::Owner, OrganizationRole::Admin],
        )?;
        organization.recover(&*self.clock)?;
        self.organizations.update(&organization).await?;
        info!(organization = %id, "organization recovered");
        Ok(organization)
    }

    /// Requests deletion of a workspace, opening its 12-day recovery
    /// window.
    ///
    /// # Errors
    ///
    /// Returns not-found and access errors, and
    /// [`crate::hierarchy::domain::HierarchyDomainError::AlreadyScheduled`]
    /// when a request is already pending.
    pub async fn request_workspace_deletion(
        &self,
        id: WorkspaceId,
        actor: UserId,
        reason: Option<String>,
    ) -> HierarchyServiceResult<Workspace> {
        let mut workspace = self.find_workspace(id).await?;
        evaluate(
            actor,
            workspace.members(),
            &[WorkspaceRole::Owner, WorkspaceRole::Admin],
        )?;
        workspace.request_deletion(actor, reason, &*self.clock)?;
        self.workspaces.update(&workspace).await?;
        info!(workspace = %id, "workspace deletion scheduled");
        Ok(workspace)
    }

    /// Recovers a workspace from a pending deletion.
    ///
    /// # Errors
    ///
    /// Returns not-found and access errors,
    /// [`crate::hierarchy::domain::HierarchyDomainError::NotScheduled`]
    /// when nothing is pending, and
    /// [`crate::hierarchy::domain::HierarchyDomainError::WindowExpired`]
    /// once the deadline has passed.
    pub async fn recover_workspace(
        &self,
        id: WorkspaceId,
        actor: UserId,
    ) -> HierarchyServiceResult<Workspace> {
        let mut workspace = self.find_workspace(id).await?;
        evaluate(
            actor,
            workspace.members(),
            &[WorkspaceRole::Owner, WorkspaceRole::Admin],
        )?;
        workspace.recover(&*self.clock)?;
        self.workspaces.update(&workspace).await?;
        info!(workspace = %id, "workspace recovered");
        Ok(workspace)
    }

    /// Permanently deletes an organization whose deadline has passed,
    /// cascading through every workspace, project, task, subtask, and
    /// note beneath it.
    ///
    /// The schedule is re-checked against `now` on the loaded entity, not
    /// the query snapshot that selected it, so a concurrent recovery wins
    /// and the purge is skipped.
    ///
    /// # Errors
    ///
    /// Returns repository errors from descendant collection or the atomic
    /// purge.
    pub async fn purge_organization(
        &self,
        id: OrganizationId,
        now: DateTime<Utc>,
    ) -> HierarchyServiceResult<PurgeOutcome> {
        let Some(organization) = self.organizations.find(id).await? else {
            return Ok(PurgeOutcome::Missing);
        };
        if !organization.lifecycle().is_pending_deletion() {
            info!(organization = %id, "purge skipped: organization was recovered");
            return Ok(PurgeOutcome::SkippedActive);
        }
        if !organization.lifecycle().is_due(now) {
            return Ok(PurgeOutcome::SkippedNotDue);
        }

        let mut plan = PurgePlan::new();
        for workspace in self.workspaces.list_for_organization(id).await? {
            collect_workspace_subtree(&*self.projects, &*self.tasks, workspace.id(), &mut plan)
                .await?;
        }
        plan.organization = Some(id);

        let entities = plan.entity_count();
        self.purge.purge(&plan).await?;
        info!(organization = %id, entities, "organization permanently deleted");
        Ok(PurgeOutcome::Purged { entities })
    }

    /// Permanently deletes a workspace whose deadline has passed,
    /// cascading through its projects, tasks, subtasks, and notes, and
    /// detaching it from the parent organization's workspace list.
    ///
    /// # Errors
    ///
    /// Returns repository errors from descendant collection or the atomic
    /// purge.
    pub async fn purge_workspace(
        &self,
        id: WorkspaceId,
        now: DateTime<Utc>,
    ) -> HierarchyServiceResult<PurgeOutcome> {
        let Some(workspace) = self.workspaces.find(id).await? else {
            return Ok(PurgeOutcome::Missing);
        };
        if !workspace.lifecycle().is_pending_deletion() {
            info!(workspace = %id, "purge skipped: workspace was recovered");
            return Ok(PurgeOutcome::SkippedActive);
        }
        if !workspace.lifecycle().is_due(now) {
            return Ok(PurgeOutcome::SkippedNotDue);
        }

        let mut plan = PurgePlan::new();
        collect_workspace_subtree(&*self.projects, &*self.tasks, workspace.id(), &mut plan)
            .await?;
        plan.detach = Some(ParentDetach::WorkspaceFromOrganization {
            organization: workspace.organization(),
            workspace: workspace.id(),
        });

        let entities = plan.entity_count();
        self.purge.purge(&plan).await?;
        info!(workspace = %id, entities, "workspace permanently deleted");
        Ok(PurgeOutcome::Purged { entities })
    }
}
