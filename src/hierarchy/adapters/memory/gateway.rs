//! Organization gateway implementation over the in-memory store.
//!
//! The conditional member insert happens under the store's write lock,
//! which is what makes invitation acceptance idempotent under races here
//! the way a conditional update makes it idempotent in a durable store.

use super::store::InMemoryHierarchy;
use crate::access::domain::{OrganizationRole, UserId};
use crate::hierarchy::domain::OrganizationId;
use crate::invitation::ports::{GatewayError, OrganizationGateway, OrganizationSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

fn poisoned(err: impl std::fmt::Display) -> GatewayError {
    GatewayError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl OrganizationGateway for InMemoryHierarchy {
    async fn find_summary(
        &self,
        organization: OrganizationId,
    ) -> Result<Option<OrganizationSummary>, GatewayError> {
        let state = self.read().map_err(poisoned)?;
        Ok(state
            .organizations
            .get(&organization)
            .map(|stored| OrganizationSummary {
                id: stored.id(),
                name: stored.name().as_str().to_owned(),
                active: !stored.lifecycle().is_pending_deletion(),
            }))
    }

    async fn role_of(
        &self,
        organization: OrganizationId,
        user: UserId,
    ) -> Result<Option<OrganizationRole>, GatewayError> {
        let state = self.read().map_err(poisoned)?;
        let stored = state
            .organizations
            .get(&organization)
            .ok_or(GatewayError::OrganizationNotFound(organization))?;
        Ok(stored.members().role_of(user))
    }

    async fn add_member_if_absent(
        &self,
        organization: OrganizationId,
        user: UserId,
        role: OrganizationRole,
        joined_at: DateTime<Utc>,
    ) -> Result<bool, GatewayError> {
        let mut state = self.write().map_err(poisoned)?;
        let stored = state
            .organizations
            .get_mut(&organization)
            .ok_or(GatewayError::OrganizationNotFound(organization))?;
        let added = stored.record_member_if_absent(user, role, joined_at);
        if added {
            stored.bump_version();
        }
        Ok(added)
    }
}
