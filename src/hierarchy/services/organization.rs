//! Service layer for organization creation and lookup.

use super::{HierarchyServiceError, HierarchyServiceResult};
use crate::access::domain::UserId;
use crate::hierarchy::domain::{EntityName, Organization, OrganizationId};
use crate::hierarchy::ports::OrganizationRepository;
use mockable::Clock;
use std::sync::Arc;

/// Organization construction and lookup service.
#[derive(Clone)]
pub struct OrganizationService<O, C>
where
    O: OrganizationRepository,
    C: Clock + Send + Sync,
{
    organizations: Arc<O>,
    clock: Arc<C>,
}

impl<O, C> OrganizationService<O, C>
where
    O: OrganizationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new organization service.
    #[must_use]
    pub const fn new(organizations: Arc<O>, clock: Arc<C>) -> Self {
        Self {
            organizations,
            clock,
        }
    }

    /// Creates an organization owned by `owner`.
    ///
    /// The owner is seeded as the designated principal of the member list.
    ///
    /// # Errors
    ///
    /// Returns name validation errors and
    /// [`crate::hierarchy::ports::HierarchyRepositoryError::DuplicateName`]
    /// when the name is taken.
    pub async fn create(
        &self,
        name: impl Into<String> + Send,
        owner: UserId,
    ) -> HierarchyServiceResult<Organization> {
        let name = EntityName::new(name)?;
        let organization = Organization::new(name, owner, &*self.clock);
        self.organizations.insert(&organization).await?;
        Ok(organization)
    }

    /// Finds an organization by id.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyServiceError::OrganizationNotFound`] when absent.
    pub async fn get(&self, id: OrganizationId) -> HierarchyServiceResult<Organization> {
        self.organizations
            .find(id)
            .await?
            .ok_or(HierarchyServiceError::OrganizationNotFound(id))
    }

    /// Finds an organization by its unique name.
    ///
    /// Returns `Ok(None)` when no organization carries the name.
    ///
    /// # Errors
    ///
    /// Returns name validation and repository errors.
    pub async fn find_by_name(
        &self,
        name: impl Into<String> + Send,
    ) -> HierarchyServiceResult<Option<Organization>> {
        let name = EntityName::new(name)?;
        Ok(self.organizations.find_by_name(&name).await?)
    }
}
