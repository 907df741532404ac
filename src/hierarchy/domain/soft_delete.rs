//! Soft-delete lifecycle shared by organizations and workspaces.
//!
//! The state machine is `Active → PendingDeletion → Active` (recovery
//! strictly before the deadline) with permanent removal handled outside
//! the aggregate by the purge path once the deadline passes.

use super::HierarchyDomainError;
use crate::access::domain::UserId;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Details of a pending deletion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionSchedule {
    requested_at: DateTime<Utc>,
    scheduled_at: DateTime<Utc>,
    requested_by: UserId,
    reason: Option<String>,
}

impl DeletionSchedule {
    /// Returns when deletion was requested.
    #[must_use]
    pub const fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    /// Returns when the deletion becomes permanent.
    #[must_use]
    pub const fn scheduled_at(&self) -> DateTime<Utc> {
        self.scheduled_at
    }

    /// Returns who requested the deletion.
    #[must_use]
    pub const fn requested_by(&self) -> UserId {
        self.requested_by
    }

    /// Returns the stated reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

/// Soft-delete lifecycle state of an organization or workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LifecycleState {
    /// The entity is live.
    Active {
        /// Set when the entity has previously been recovered.
        recovered_at: Option<DateTime<Utc>>,
    },
    /// Deletion has been requested and the recovery window is open.
    PendingDeletion(DeletionSchedule),
}

impl LifecycleState {
    /// Returns the initial state for a freshly created entity.
    #[must_use]
    pub const fn active() -> Self {
        Self::Active { recovered_at: None }
    }

    /// Returns whether a deletion request is pending.
    #[must_use]
    pub const fn is_pending_deletion(&self) -> bool {
        matches!(self, Self::PendingDeletion(_))
    }

    /// Returns the pending schedule, if any.
    #[must_use]
    pub const fn schedule(&self) -> Option<&DeletionSchedule> {
        match self {
            Self::Active { .. } => None,
            Self::PendingDeletion(schedule) => Some(schedule),
        }
    }

    /// Returns when the entity was last recovered, if ever.
    #[must_use]
    pub const fn recovered_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Active { recovered_at } => *recovered_at,
            Self::PendingDeletion(_) => None,
        }
    }

    /// Returns whether the deadline has passed and the entity is due for
    /// permanent deletion.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.schedule()
            .is_some_and(|schedule| schedule.scheduled_at() <= now)
    }

    /// Requests deletion, opening a recovery window of `window` from now.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::AlreadyScheduled`] when a request is
    /// already pending.
    pub fn request(
        &mut self,
        window: Duration,
        requested_by: UserId,
        reason: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), HierarchyDomainError> {
        if let Some(schedule) = self.schedule() {
            return Err(HierarchyDomainError::AlreadyScheduled {
                scheduled_at: schedule.scheduled_at(),
            });
        }
        let now = clock.utc();
        *self = Self::PendingDeletion(DeletionSchedule {
            requested_at: now,
            scheduled_at: now + window,
            requested_by,
            reason,
        });
        Ok(())
    }

    /// Recovers the entity, clearing every deletion field.
    ///
    /// Recovery is valid strictly before the scheduled deadline; at or
    /// after it the reaper owns the entity.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::NotScheduled`] when nothing is
    /// pending and [`HierarchyDomainError::WindowExpired`] when the
    /// deadline has passed.
    pub fn recover(&mut self, clock: &impl Clock) -> Result<(), HierarchyDomainError> {
        let schedule = self.schedule().ok_or(HierarchyDomainError::NotScheduled)?;
        let now = clock.utc();
        if now >= schedule.scheduled_at() {
            return Err(HierarchyDomainError::WindowExpired {
                scheduled_at: schedule.scheduled_at(),
            });
        }
        *self = Self::Active {
            recovered_at: Some(now),
        };
        Ok(())
    }

    /// Guards mutations that require a live entity.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::DeletionPending`] while a deletion
    /// request is open.
    pub const fn ensure_active(&self) -> Result<(), HierarchyDomainError> {
        match self {
            Self::Active { .. } => Ok(()),
            Self::PendingDeletion(_) => Err(HierarchyDomainError::DeletionPending),
        }
    }
}
