//! In-memory workspace repository.

use super::store::InMemoryHierarchy;
use crate::hierarchy::domain::{EntityName, OrganizationId, Workspace, WorkspaceId};
use crate::hierarchy::ports::{
    HierarchyRepoResult, HierarchyRepositoryError, WorkspaceRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl WorkspaceRepository for InMemoryHierarchy {
    async fn insert(&self, workspace: &Workspace) -> HierarchyRepoResult<()> {
        let mut state = self.write()?;
        if state.workspaces.contains_key(&workspace.id()) {
            return Err(HierarchyRepositoryError::DuplicateId(
                workspace.id().to_string(),
            ));
        }
        let key = workspace.name().index_key();
        if state.workspace_names.contains_key(&key) {
            return Err(HierarchyRepositoryError::DuplicateName(
                workspace.name().as_str().to_owned(),
            ));
        }
        state.workspace_names.insert(key, workspace.id());
        state.workspaces.insert(workspace.id(), workspace.clone());
        Ok(())
    }

    async fn update(&self, workspace: &Workspace) -> HierarchyRepoResult<()> {
        let mut state = self.write()?;
        let stored = state
            .workspaces
            .get(&workspace.id())
            .ok_or(HierarchyRepositoryError::WorkspaceNotFound(workspace.id()))?;
        if stored.version() != workspace.version() {
            return Err(HierarchyRepositoryError::VersionConflict {
                entity: "workspace",
                expected: workspace.version(),
                stored: stored.version(),
            });
        }

        let old_key = stored.name().index_key();
        let new_key = workspace.name().index_key();
        if old_key != new_key {
            if state
                .workspace_names
                .get(&new_key)
                .is_some_and(|id| *id != workspace.id())
            {
                return Err(HierarchyRepositoryError::DuplicateName(
                    workspace.name().as_str().to_owned(),
                ));
            }
            state.workspace_names.remove(&old_key);
            state.workspace_names.insert(new_key, workspace.id());
        }

        let mut updated = workspace.clone();
        updated.bump_version();
        state.workspaces.insert(workspace.id(), updated);
        Ok(())
    }

    async fn find(&self, id: WorkspaceId) -> HierarchyRepoResult<Option<Workspace>> {
        let state = self.read()?;
        Ok(state.workspaces.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &EntityName) -> HierarchyRepoResult<Option<Workspace>> {
        let state = self.read()?;
        Ok(state
            .workspace_names
            .get(&name.index_key())
            .and_then(|id| state.workspaces.get(id))
            .cloned())
    }

    async fn list_for_organization(
        &self,
        organization: OrganizationId,
    ) -> HierarchyRepoResult<Vec<Workspace>> {
        let state = self.read()?;
        Ok(state
            .workspaces
            .values()
            .filter(|workspace| workspace.organization() == organization)
            .cloned()
            .collect())
    }

    async fn due_for_deletion(&self, now: DateTime<Utc>) -> HierarchyRepoResult<Vec<WorkspaceId>> {
        let state = self.read()?;
        Ok(state
            .workspaces
            .values()
            .filter(|workspace| workspace.lifecycle().is_due(now))
            .map(Workspace::id)
            .collect())
    }
}
