//! Workspace aggregate root.

use super::{EntityName, HierarchyDomainError, LifecycleState, OrganizationId, ProjectId, WorkspaceId};
use crate::access::domain::{MemberList, MembershipError, UserId, WorkspaceRole};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Second-level aggregate grouping projects inside an organization.
///
/// The designated admin is the principal of the member list. The parent
/// organization reference is required and must point at a live
/// organization; that referential invariant is checked by the services
/// that create workspaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    id: WorkspaceId,
    name: EntityName,
    admin: UserId,
    organization: OrganizationId,
    members: MemberList<WorkspaceRole>,
    projects: Vec<ProjectId>,
    lifecycle: LifecycleState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl Workspace {
    /// Days between a deletion request and permanent removal. Shorter than
    /// the organization window: a workspace is cheaper to re-create.
    pub const DELETION_WINDOW_DAYS: i64 = 12;

    /// Creates a new workspace administered by `admin`.
    #[must_use]
    pub fn new(
        name: EntityName,
        organization: OrganizationId,
        admin: UserId,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: WorkspaceId::new(),
            name,
            admin,
            organization,
            members: MemberList::new(admin, WorkspaceRole::Admin, timestamp),
            projects: Vec::new(),
            lifecycle: LifecycleState::active(),
            created_at: timestamp,
            updated_at: timestamp,
            version: 1,
        }
    }

    /// Returns the workspace identifier.
    #[must_use]
    pub const fn id(&self) -> WorkspaceId {
        self.id
    }

    /// Returns the workspace name.
    #[must_use]
    pub const fn name(&self) -> &EntityName {
        &self.name
    }

    /// Returns the designated administrator.
    #[must_use]
    pub const fn admin(&self) -> UserId {
        self.admin
    }

    /// Returns the parent organization identifier.
    #[must_use]
    pub const fn organization(&self) -> OrganizationId {
        self.organization
    }

    /// Returns the member list.
    #[must_use]
    pub const fn members(&self) -> &MemberList<WorkspaceRole> {
        &self.members
    }

    /// Returns the attached project identifiers.
    #[must_use]
    pub fn projects(&self) -> &[ProjectId] {
        &self.projects
    }

    /// Returns the soft-delete lifecycle state.
    #[must_use]
    pub const fn lifecycle(&self) -> &LifecycleState {
        &self.lifecycle
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the optimistic concurrency version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Advances the version counter; called by repositories on successful
    /// update.
    pub const fn bump_version(&mut self) {
        self.version += 1;
    }

    /// Adds a member.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::DuplicateMember`] when the user is
    /// already present.
    pub fn add_member(
        &mut self,
        user: UserId,
        role: WorkspaceRole,
        clock: &impl Clock,
    ) -> Result<(), MembershipError> {
        self.members.add(user, role, clock.utc())?;
        self.touch(clock);
        Ok(())
    }

    /// Removes a member.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::OwnerImmutable`] for the admin and
    /// [`MembershipError::MemberNotFound`] for absent users.
    pub fn remove_member(
        &mut self,
        user: UserId,
        clock: &impl Clock,
    ) -> Result<(), MembershipError> {
        self.members.remove(user)?;
        self.touch(clock);
        Ok(())
    }

    /// Changes a member's role.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::OwnerImmutable`] for the admin and
    /// [`MembershipError::MemberNotFound`] for absent users.
    pub fn update_member_role(
        &mut self,
        user: UserId,
        new_role: WorkspaceRole,
        clock: &impl Clock,
    ) -> Result<(), MembershipError> {
        self.members.update_role(user, new_role)?;
        self.touch(clock);
        Ok(())
    }

    /// Records a newly created project.
    pub fn attach_project(&mut self, project: ProjectId, clock: &impl Clock) {
        if !self.projects.contains(&project) {
            self.projects.push(project);
            self.touch(clock);
        }
    }

    /// Removes a project reference, returning whether it was present.
    ///
    /// Used by the purge executor inside the storage transaction; the
    /// timestamp refresh belongs to the surrounding operation.
    pub fn detach_project(&mut self, project: ProjectId) -> bool {
        let before = self.projects.len();
        self.projects.retain(|id| *id != project);
        self.projects.len() != before
    }

    /// Requests deletion, opening the 12-day recovery window.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::AlreadyScheduled`] when a request is
    /// already pending.
    pub fn request_deletion(
        &mut self,
        requested_by: UserId,
        reason: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), HierarchyDomainError> {
        self.lifecycle.request(
            Duration::days(Self::DELETION_WINDOW_DAYS),
            requested_by,
            reason,
            clock,
        )?;
        self.touch(clock);
        Ok(())
    }

    /// Recovers from a pending deletion, clearing all deletion fields.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::NotScheduled`] when nothing is
    /// pending and [`HierarchyDomainError::WindowExpired`] when the
    /// deadline has passed.
    pub fn recover(&mut self, clock: &impl Clock) -> Result<(), HierarchyDomainError> {
        self.lifecycle.recover(clock)?;
        self.touch(clock);
        Ok(())
    }

    /// Guards mutations that require a live workspace.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::DeletionPending`] while deletion is
    /// scheduled.
    pub const fn ensure_active(&self) -> Result<(), HierarchyDomainError> {
        self.lifecycle.ensure_active()
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
