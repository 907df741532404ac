//! In-memory organization repository.

use super::store::InMemoryHierarchy;
use crate::access::domain::UserId;
use crate::hierarchy::domain::{EntityName, Organization, OrganizationId};
use crate::hierarchy::ports::{
    HierarchyRepoResult, HierarchyRepositoryError, OrganizationRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl OrganizationRepository for InMemoryHierarchy {
    async fn insert(&self, organization: &Organization) -> HierarchyRepoResult<()> {
        let mut state = self.write()?;
        if state.organizations.contains_key(&organization.id()) {
            return Err(HierarchyRepositoryError::DuplicateId(
                organization.id().to_string(),
            ));
        }
        let key = organization.name().index_key();
        if state.organization_names.contains_key(&key) {
            return Err(HierarchyRepositoryError::DuplicateName(
                organization.name().as_str().to_owned(),
            ));
        }
        state.organization_names.insert(key, organization.id());
        state
            .organizations
            .insert(organization.id(), organization.clone());
        Ok(())
    }

    async fn update(&self, organization: &Organization) -> HierarchyRepoResult<()> {
        let mut state = self.write()?;
        let stored = state
            .organizations
            .get(&organization.id())
            .ok_or(HierarchyRepositoryError::OrganizationNotFound(
                organization.id(),
            ))?;
        if stored.version() != organization.version() {
            return Err(HierarchyRepositoryError::VersionConflict {
                entity: "organization",
                expected: organization.version(),
                stored: stored.version(),
            });
        }

        let old_key = stored.name().index_key();
        let new_key = organization.name().index_key();
        if old_key != new_key {
            if state
                .organization_names
                .get(&new_key)
                .is_some_and(|id| *id != organization.id())
            {
                return Err(HierarchyRepositoryError::DuplicateName(
                    organization.name().as_str().to_owned(),
                ));
            }
            state.organization_names.remove(&old_key);
            state.organization_names.insert(new_key, organization.id());
        }

        let mut updated = organization.clone();
        updated.bump_version();
        state.organizations.insert(organization.id(), updated);
        Ok(())
    }

    async fn find(&self, id: OrganizationId) -> HierarchyRepoResult<Option<Organization>> {
        let state = self.read()?;
        Ok(state.organizations.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &EntityName) -> HierarchyRepoResult<Option<Organization>> {
        let state = self.read()?;
        Ok(state
            .organization_names
            .get(&name.index_key())
            .and_then(|id| state.organizations.get(id))
            .cloned())
    }

    async fn list_with_member(&self, user: UserId) -> HierarchyRepoResult<Vec<Organization>> {
        let state = self.read()?;
        Ok(state
            .organizations
            .values()
            .filter(|organization| organization.members().contains(user))
            .cloned()
            .collect())
    }

    async fn due_for_deletion(
        &self,
        now: DateTime<Utc>,
    ) -> HierarchyRepoResult<Vec<OrganizationId>> {
        let state = self.read()?;
        Ok(state
            .organizations
            .values()
            .filter(|organization| organization.lifecycle().is_due(now))
            .map(Organization::id)
            .collect())
    }
}
