//! In-memory project repository.

use super::store::InMemoryHierarchy;
use crate::hierarchy::domain::{Project, ProjectId, WorkspaceId};
use crate::hierarchy::ports::{HierarchyRepoResult, HierarchyRepositoryError, ProjectRepository};
use async_trait::async_trait;

#[async_trait]
impl ProjectRepository for InMemoryHierarchy {
    async fn insert(&self, project: &Project) -> HierarchyRepoResult<()> {
        let mut state = self.write()?;
        if state.projects.contains_key(&project.id()) {
            return Err(HierarchyRepositoryError::DuplicateId(
                project.id().to_string(),
            ));
        }
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn update(&self, project: &Project) -> HierarchyRepoResult<()> {
        let mut state = self.write()?;
        let stored = state
            .projects
            .get(&project.id())
            .ok_or(HierarchyRepositoryError::ProjectNotFound(project.id()))?;
        if stored.version() != project.version() {
            return Err(HierarchyRepositoryError::VersionConflict {
                entity: "project",
                expected: project.version(),
                stored: stored.version(),
            });
        }
        let mut updated = project.clone();
        updated.bump_version();
        state.projects.insert(project.id(), updated);
        Ok(())
    }

    async fn find(&self, id: ProjectId) -> HierarchyRepoResult<Option<Project>> {
        let state = self.read()?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn list_for_workspace(
        &self,
        workspace: WorkspaceId,
    ) -> HierarchyRepoResult<Vec<Project>> {
        let state = self.read()?;
        Ok(state
            .projects
            .values()
            .filter(|project| project.workspace() == workspace)
            .cloned()
            .collect())
    }
}
