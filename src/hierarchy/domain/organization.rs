//! Organization aggregate root.

use super::{EntityName, HierarchyDomainError, LifecycleState, OrganizationId, WorkspaceId};
use crate::access::domain::{MemberList, MembershipError, OrganizationRole, UserId};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Top-level tenancy aggregate.
///
/// The owner is the designated principal of the member list: always
/// present with role [`OrganizationRole::Owner`], never removable, never
/// demotable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    id: OrganizationId,
    name: EntityName,
    owner: UserId,
    members: MemberList<OrganizationRole>,
    workspaces: Vec<WorkspaceId>,
    lifecycle: LifecycleState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl Organization {
    /// Days between a deletion request and permanent removal.
    pub const DELETION_WINDOW_DAYS: i64 = 28;

    /// Creates a new organization owned by `owner`.
    #[must_use]
    pub fn new(name: EntityName, owner: UserId, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: OrganizationId::new(),
            name,
            owner,
            members: MemberList::new(owner, OrganizationRole::Owner, timestamp),
            workspaces: Vec::new(),
            lifecycle: LifecycleState::active(),
            created_at: timestamp,
            updated_at: timestamp,
            version: 1,
        }
    }

    /// Returns the organization identifier.
    #[must_use]
    pub const fn id(&self) -> OrganizationId {
        self.id
    }

    /// Returns the organization name.
    #[must_use]
    pub const fn name(&self) -> &EntityName {
        &self.name
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the member list.
    #[must_use]
    pub const fn members(&self) -> &MemberList<OrganizationRole> {
        &self.members
    }

    /// Returns the attached workspace identifiers.
    #[must_use]
    pub fn workspaces(&self) -> &[WorkspaceId] {
        &self.workspaces
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
        role: OrganizationRole,
        clock: &impl Clock,
    ) -> Result<(), MembershipError> {
        self.members.add(user, role, clock.utc())?;
        self.touch(clock);
        Ok(())
    }

    /// Adds a member when absent, reporting whether a record was inserted.
    ///
    /// Conditional write applied at the persistence boundary by invitation
    /// acceptance; `joined_at` is stamped by the caller and timestamps are
    /// otherwise untouched.
    pub fn record_member_if_absent(
        &mut self,
        user: UserId,
        role: OrganizationRole,
        joined_at: DateTime<Utc>,
    ) -> bool {
        self.members.add_if_absent(user, role, joined_at)
    }

    /// Removes a member.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::OwnerImmutable`] for the owner and
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
    /// Returns [`MembershipError::OwnerImmutable`] for the owner and
    /// [`MembershipError::MemberNotFound`] for absent users.
    pub fn update_member_role(
        &mut self,
        user: UserId,
        new_role: OrganizationRole,
        clock: &impl Clock,
    ) -> Result<(), MembershipError> {
        self.members.update_role(user, new_role)?;
        self.touch(clock);
        Ok(())
    }

    /// Records a newly created workspace.
    pub fn attach_workspace(&mut self, workspace: WorkspaceId, clock: &impl Clock) {
        if !self.workspaces.contains(&workspace) {
            self.workspaces.push(workspace);
            self.touch(clock);
        }
    }

    /// Removes a workspace reference, returning whether it was present.
    ///
    /// Used by the purge executor inside the storage transaction; the
    /// timestamp refresh belongs to the surrounding operation.
    pub fn detach_workspace(&mut self, workspace: WorkspaceId) -> bool {
        let before = self.workspaces.len();
        self.workspaces.retain(|id| *id != workspace);
        self.workspaces.len() != before
    }

    /// Requests deletion, opening the 28-day recovery window.
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

    /// Guards mutations that require a live organization.
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
