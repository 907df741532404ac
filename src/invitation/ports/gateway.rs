//! Narrow gateway onto the organization store.
//!
//! The invitation workflow needs three things from the hierarchy: does the
//! organization exist and is it live, what role (if any) a user holds on
//! it, and a conditional member insert. Keeping the port this narrow keeps
//! the workflow decoupled from the hierarchy's full repository surface.

use crate::access::domain::{OrganizationRole, UserId};
use crate::hierarchy::domain::OrganizationId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by organization gateway implementations.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The organization does not exist.
    #[error("organization not found: {0}")]
    OrganizationNotFound(OrganizationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl GatewayError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// What the invitation workflow knows about an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationSummary {
    /// The organization identifier.
    pub id: OrganizationId,
    /// The display name, used in invitation emails.
    pub name: String,
    /// Whether the organization is live (not pending deletion).
    pub active: bool,
}

/// Membership-facing contract against the organization store.
#[async_trait]
pub trait OrganizationGateway: Send + Sync {
    /// Returns a summary of the organization; `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Persistence`] when the store is
    /// unavailable.
    async fn find_summary(
        &self,
        organization: OrganizationId,
    ) -> Result<Option<OrganizationSummary>, GatewayError>;

    /// Returns the role a user holds on the organization; `None` when the
    /// user is not a member.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::OrganizationNotFound`] for unknown
    /// organizations.
    async fn role_of(
        &self,
        organization: OrganizationId,
        user: UserId,
    ) -> Result<Option<OrganizationRole>, GatewayError>;

    /// Adds the user to the organization's members unless already present,
    /// returning whether a record was inserted.
    ///
    /// The insert is conditional on "member not already present" inside
    /// the store, which keeps double-accept races idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::OrganizationNotFound`] for unknown
    /// organizations.
    async fn add_member_if_absent(
        &self,
        organization: OrganizationId,
        user: UserId,
        role: OrganizationRole,
        joined_at: DateTime<Utc>,
    ) -> Result<bool, GatewayError>;
}
