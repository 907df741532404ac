//! Per-entity membership list with its structural invariants.

use super::{MembershipError, Role, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single membership tuple: who, as what, since when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord<R> {
    user: UserId,
    role: R,
    joined_at: DateTime<Utc>,
}

impl<R: Role> MemberRecord<R> {
    /// Returns the member's user identifier.
    #[must_use]
    pub const fn user(&self) -> UserId {
        self.user
    }

    /// Returns the member's role on this entity.
    #[must_use]
    pub const fn role(&self) -> R {
        self.role
    }

    /// Returns when the member joined this entity.
    #[must_use]
    pub const fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }
}

/// Membership list carried by every organization, workspace, and project.
///
/// Each list designates one **principal** (the organization owner, the
/// workspace admin, the project owner). The principal's record is immutable:
/// it can neither be removed nor have its role changed. Beyond that, a user
/// appears at most once per list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberList<R> {
    principal: UserId,
    records: Vec<MemberRecord<R>>,
}

impl<R: Role> MemberList<R> {
    /// Creates a list seeded with the designated principal.
    #[must_use]
    pub fn new(principal: UserId, principal_role: R, joined_at: DateTime<Utc>) -> Self {
        Self {
            principal,
            records: vec![MemberRecord {
                user: principal,
                role: principal_role,
                joined_at,
            }],
        }
    }

    /// Returns the designated principal.
    #[must_use]
    pub const fn principal(&self) -> UserId {
        self.principal
    }

    /// Returns the membership records in join order.
    #[must_use]
    pub fn records(&self) -> &[MemberRecord<R>] {
        &self.records
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the list is empty.
    ///
    /// A well-formed list never is: the principal is seeded at construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns whether the user appears in the list.
    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        self.records.iter().any(|record| record.user == user)
    }

    /// Returns the role the user holds, if any.
    #[must_use]
    pub fn role_of(&self, user: UserId) -> Option<R> {
        self.records
            .iter()
            .find(|record| record.user == user)
            .map(|record| record.role)
    }

    /// Adds a member.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::DuplicateMember`] when the user already
    /// appears in the list.
    pub fn add(&mut self, user: UserId, role: R, joined_at: DateTime<Utc>) -> Result<(), MembershipError> {
        if self.contains(user) {
            return Err(MembershipError::DuplicateMember(user));
        }
        self.records.push(MemberRecord {
            user,
            role,
            joined_at,
        });
        Ok(())
    }

    /// Adds a member, doing nothing when the user is already present.
    ///
    /// Returns whether a record was inserted. This is the conditional write
    /// used by invitation acceptance to stay idempotent under races.
    pub fn add_if_absent(&mut self, user: UserId, role: R, joined_at: DateTime<Utc>) -> bool {
        if self.contains(user) {
            return false;
        }
        self.records.push(MemberRecord {
            user,
            role,
            joined_at,
        });
        true
    }

    /// Removes a member.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::OwnerImmutable`] for the principal and
    /// [`MembershipError::MemberNotFound`] when the user is absent.
    pub fn remove(&mut self, user: UserId) -> Result<(), MembershipError> {
        if user == self.principal {
            return Err(MembershipError::OwnerImmutable(user));
        }
        let before = self.records.len();
        self.records.retain(|record| record.user != user);
        if self.records.len() == before {
            return Err(MembershipError::MemberNotFound(user));
        }
        Ok(())
    }

    /// Changes a member's role.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::OwnerImmutable`] for the principal and
    /// [`MembershipError::MemberNotFound`] when the user is absent.
    pub fn update_role(&mut self, user: UserId, new_role: R) -> Result<(), MembershipError> {
        if user == self.principal {
            return Err(MembershipError::OwnerImmutable(user));
        }
        let record = self
            .records
            .iter_mut()
            .find(|record| record.user == user)
            .ok_or(MembershipError::MemberNotFound(user))?;
        record.role = new_role;
        Ok(())
    }
}
