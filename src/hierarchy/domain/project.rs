//! Project aggregate root, its status set, schedule, and lock flag.

use super::{EntityName, HierarchyDomainError, ParseStatusError, Priority, ProjectId, TaskId, WorkspaceId};
use crate::access::domain::{MemberList, MembershipError, ProjectRole, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Being scoped; work has not started.
    Planning,
    /// Work is in flight.
    Active,
    /// Temporarily parked.
    OnHold,
    /// All work finished.
    Completed,
}

impl ProjectStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Active => "active",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProjectStatus {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "planning" => Ok(Self::Planning),
            "active" => Ok(Self::Active),
            "on_hold" => Ok(Self::OnHold),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseStatusError(value.to_owned())),
        }
    }
}

/// Validated start/due date pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSchedule {
    start_date: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
}

impl ProjectSchedule {
    /// Creates a schedule, enforcing `due_date >= start_date` when both are
    /// present.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::InvalidSchedule`] when the due date
    /// precedes the start date.
    pub fn new(
        start_date: Option<DateTime<Utc>>,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Self, HierarchyDomainError> {
        if let (Some(start), Some(due)) = (start_date, due_date)
            && due < start
        {
            return Err(HierarchyDomainError::InvalidSchedule { start, due });
        }
        Ok(Self {
            start_date,
            due_date,
        })
    }

    /// Returns the scheduled start, if any.
    #[must_use]
    pub const fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    /// Returns the scheduled due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }
}

/// Who locked a project, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLock {
    locked_by: UserId,
    locked_at: DateTime<Utc>,
}

impl ProjectLock {
    /// Returns the user who locked the project.
    #[must_use]
    pub const fn locked_by(&self) -> UserId {
        self.locked_by
    }

    /// Returns when the lock was taken.
    #[must_use]
    pub const fn locked_at(&self) -> DateTime<Utc> {
        self.locked_at
    }
}

/// Third-level aggregate grouping tasks inside a workspace.
///
/// The lock flag is distinct from soft deletion: a locked project still
/// exists and is readable, but every mutation of it or its tasks fails
/// with a lock error until an owner or admin unlocks it. `progress` is a
/// derived aggregate: only the recalculator writes it, never a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: EntityName,
    workspace: WorkspaceId,
    created_by: UserId,
    members: MemberList<ProjectRole>,
    tasks: Vec<TaskId>,
    lock: Option<ProjectLock>,
    status: ProjectStatus,
    priority: Priority,
    schedule: ProjectSchedule,
    progress: u8,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl Project {
    /// Creates a new project owned by its creator.
    #[must_use]
    pub fn new(
        name: EntityName,
        workspace: WorkspaceId,
        created_by: UserId,
        priority: Priority,
        schedule: ProjectSchedule,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ProjectId::new(),
            name,
            workspace,
            created_by,
            members: MemberList::new(created_by, ProjectRole::Owner, timestamp),
            tasks: Vec::new(),
            lock: None,
            status: ProjectStatus::Planning,
            priority,
            schedule,
            progress: 0,
            created_at: timestamp,
            updated_at: timestamp,
            version: 1,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub const fn name(&self) -> &EntityName {
        &self.name
    }

    /// Returns the parent workspace identifier.
    #[must_use]
    pub const fn workspace(&self) -> WorkspaceId {
        self.workspace
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the member list.
    #[must_use]
    pub const fn members(&self) -> &MemberList<ProjectRole> {
        &self.members
    }

    /// Returns the attached task identifiers.
    #[must_use]
    pub fn tasks(&self) -> &[TaskId] {
        &self.tasks
    }

    /// Returns the current lock, if the project is locked.
    #[must_use]
    pub const fn lock_state(&self) -> Option<&ProjectLock> {
        self.lock.as_ref()
    }

    /// Returns whether the project accepts mutations.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.lock.is_none()
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the schedule.
    #[must_use]
    pub const fn schedule(&self) -> ProjectSchedule {
        self.schedule
    }

    /// Returns the derived progress percentage (0–100).
    #[must_use]
    pub const fn progress(&self) -> u8 {
        self.progress
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
        role: ProjectRole,
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
    /// Returns [`MembershipError::OwnerImmutable`] for the project owner
    /// and [`MembershipError::MemberNotFound`] for absent users.
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
    /// Returns [`MembershipError::OwnerImmutable`] for the project owner
    /// and [`MembershipError::MemberNotFound`] for absent users.
    pub fn update_member_role(
        &mut self,
        user: UserId,
        new_role: ProjectRole,
        clock: &impl Clock,
    ) -> Result<(), MembershipError> {
        self.members.update_role(user, new_role)?;
        self.touch(clock);
        Ok(())
    }

    /// Records a newly created task.
    pub fn attach_task(&mut self, task: TaskId, clock: &impl Clock) {
        if !self.tasks.contains(&task) {
            self.tasks.push(task);
            self.touch(clock);
        }
    }

    /// Removes a task reference, returning whether it was present.
    ///
    /// Used by the purge executor inside the storage transaction; the
    /// timestamp refresh belongs to the surrounding operation.
    pub fn detach_task(&mut self, task: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|id| *id != task);
        self.tasks.len() != before
    }

    /// Locks the project against mutation.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::ProjectLocked`] when already locked.
    pub fn lock(&mut self, actor: UserId, clock: &impl Clock) -> Result<(), HierarchyDomainError> {
        if let Some(lock) = &self.lock {
            return Err(HierarchyDomainError::ProjectLocked {
                locked_by: lock.locked_by(),
            });
        }
        self.lock = Some(ProjectLock {
            locked_by: actor,
            locked_at: clock.utc(),
        });
        self.touch(clock);
        Ok(())
    }

    /// Releases the lock.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::ProjectNotLocked`] when the project
    /// is not locked.
    pub fn unlock(&mut self, clock: &impl Clock) -> Result<(), HierarchyDomainError> {
        if self.lock.is_none() {
            return Err(HierarchyDomainError::ProjectNotLocked);
        }
        self.lock = None;
        self.touch(clock);
        Ok(())
    }

    /// Guards mutations that require an unlocked project.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::ProjectLocked`] while the lock is
    /// held.
    pub const fn ensure_unlocked(&self) -> Result<(), HierarchyDomainError> {
        match &self.lock {
            None => Ok(()),
            Some(lock) => Err(HierarchyDomainError::ProjectLocked {
                locked_by: lock.locked_by(),
            }),
        }
    }

    /// Changes the workflow status.
    pub fn set_status(&mut self, status: ProjectStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Changes the priority.
    pub fn set_priority(&mut self, priority: Priority, clock: &impl Clock) {
        self.priority = priority;
        self.touch(clock);
    }

    /// Replaces the schedule.
    pub fn reschedule(&mut self, schedule: ProjectSchedule, clock: &impl Clock) {
        self.schedule = schedule;
        self.touch(clock);
    }

    /// Stores a recomputed progress value.
    ///
    /// Only the progress recalculator calls this; progress is derived from
    /// task statuses and is never accepted from a client.
    pub fn record_progress(&mut self, progress: u8, clock: &impl Clock) {
        self.progress = progress.min(100);
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
