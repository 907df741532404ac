//! Invitation aggregate root and its terminal-state machine.

use super::{InvitationDomainError, InvitationId, ParseInvitationStatusError, TokenHash};
use crate::access::domain::{EmailAddress, OrganizationRole, UserId};
use crate::hierarchy::domain::OrganizationId;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of an invitation. Everything except `Pending` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Awaiting a response, within the expiry window.
    Pending,
    /// Accepted by the invited identity.
    Accepted,
    /// Declined by the invited identity.
    Rejected,
    /// The expiry deadline passed before a response.
    Expired,
    /// Withdrawn by the inviter or an organization admin.
    Revoked,
}

impl InvitationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for InvitationStatus {
    type Error = ParseInvitationStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "expired" => Ok(Self::Expired),
            "revoked" => Ok(Self::Revoked),
            _ => Err(ParseInvitationStatusError(value.to_owned())),
        }
    }
}

/// Invitation aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    id: InvitationId,
    organization: OrganizationId,
    email: EmailAddress,
    role: OrganizationRole,
    invited_by: UserId,
    message: Option<String>,
    token_hash: TokenHash,
    status: InvitationStatus,
    expires_at: DateTime<Utc>,
    accepted_by: Option<UserId>,
    accepted_at: Option<DateTime<Utc>>,
    metadata: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl Invitation {
    /// Days from issue to expiry.
    pub const TTL_DAYS: i64 = 7;

    /// Issues a new pending invitation.
    #[must_use]
    pub fn issue(
        organization: OrganizationId,
        email: EmailAddress,
        role: OrganizationRole,
        invited_by: UserId,
        message: Option<String>,
        token_hash: TokenHash,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: InvitationId::new(),
            organization,
            email,
            role,
            invited_by,
            message,
            token_hash,
            status: InvitationStatus::Pending,
            expires_at: timestamp + Duration::days(Self::TTL_DAYS),
            accepted_by: None,
            accepted_at: None,
            metadata: None,
            created_at: timestamp,
            updated_at: timestamp,
            version: 1,
        }
    }

    /// Returns the invitation identifier.
    #[must_use]
    pub const fn id(&self) -> InvitationId {
        self.id
    }

    /// Returns the target organization.
    #[must_use]
    pub const fn organization(&self) -> OrganizationId {
        self.organization
    }

    /// Returns the invited email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the prospective role.
    #[must_use]
    pub const fn role(&self) -> OrganizationRole {
        self.role
    }

    /// Returns the inviting user.
    #[must_use]
    pub const fn invited_by(&self) -> UserId {
        self.invited_by
    }

    /// Returns the personal message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the stored token hash.
    #[must_use]
    pub const fn token_hash(&self) -> &TokenHash {
        &self.token_hash
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> InvitationStatus {
        self.status
    }

    /// Returns the expiry deadline.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns who accepted, when accepted.
    #[must_use]
    pub const fn accepted_by(&self) -> Option<UserId> {
        self.accepted_by
    }

    /// Returns when the invitation was accepted, if it was.
    #[must_use]
    pub const fn accepted_at(&self) -> Option<DateTime<Utc>> {
        self.accepted_at
    }

    /// Returns the attached metadata, if any.
    #[must_use]
    pub const fn metadata(&self) -> Option<&serde_json::Value> {
        self.metadata.as_ref()
    }

    /// Attaches free-form metadata (campaign tags, import markers).
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest transition timestamp.
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

    /// Returns whether the deadline has passed as of `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    fn transition(
        &mut self,
        status: InvitationStatus,
        clock: &impl Clock,
    ) -> Result<(), InvitationDomainError> {
        if self.status != InvitationStatus::Pending {
            return Err(InvitationDomainError::InvalidState(self.status));
        }
        self.status = status;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Marks the invitation accepted.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationDomainError::InvalidState`] unless pending.
    pub fn accept(
        &mut self,
        actor: Option<UserId>,
        clock: &impl Clock,
    ) -> Result<(), InvitationDomainError> {
        self.transition(InvitationStatus::Accepted, clock)?;
        self.accepted_by = actor;
        self.accepted_at = Some(clock.utc());
        Ok(())
    }

    /// Marks the invitation rejected.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationDomainError::InvalidState`] unless pending.
    pub fn reject(&mut self, clock: &impl Clock) -> Result<(), InvitationDomainError> {
        self.transition(InvitationStatus::Rejected, clock)
    }

    /// Marks the invitation revoked.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationDomainError::InvalidState`] unless pending.
    pub fn revoke(&mut self, clock: &impl Clock) -> Result<(), InvitationDomainError> {
        self.transition(InvitationStatus::Revoked, clock)
    }

    /// Marks the invitation expired.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationDomainError::InvalidState`] unless pending.
    pub fn mark_expired(&mut self, clock: &impl Clock) -> Result<(), InvitationDomainError> {
        self.transition(InvitationStatus::Expired, clock)
    }
}
