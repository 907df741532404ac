//! Shared in-memory store and the atomic purge executor.

use crate::hierarchy::domain::{
    Note, NoteId, Organization, OrganizationId, ParentDetach, Project, ProjectId, PurgePlan,
    Subtask, SubtaskId, Task, TaskId, Workspace, WorkspaceId,
};
use crate::hierarchy::ports::{HierarchyRepoResult, HierarchyRepositoryError, PurgeExecutor};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory hierarchy store.
///
/// Implements every hierarchy repository port and the purge executor over
/// one lock, which is what makes cascades atomic here the way a
/// multi-document transaction makes them atomic in a durable store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHierarchy {
    state: Arc<RwLock<HierarchyState>>,
}

#[derive(Debug, Default)]
pub(super) struct HierarchyState {
    pub(super) organizations: HashMap<OrganizationId, Organization>,
    pub(super) organization_names: HashMap<String, OrganizationId>,
    pub(super) workspaces: HashMap<WorkspaceId, Workspace>,
    pub(super) workspace_names: HashMap<String, WorkspaceId>,
    pub(super) projects: HashMap<ProjectId, Project>,
    pub(super) tasks: HashMap<TaskId, Task>,
    pub(super) subtasks: HashMap<SubtaskId, Subtask>,
    pub(super) notes: HashMap<NoteId, Note>,
}

impl InMemoryHierarchy {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn read(&self) -> HierarchyRepoResult<RwLockReadGuard<'_, HierarchyState>> {
        self.state.read().map_err(|err| {
            HierarchyRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    pub(super) fn write(&self) -> HierarchyRepoResult<RwLockWriteGuard<'_, HierarchyState>> {
        self.state.write().map_err(|err| {
            HierarchyRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn apply_detach(state: &mut HierarchyState, detach: ParentDetach) {
    match detach {
        ParentDetach::WorkspaceFromOrganization {
            organization,
            workspace,
        } => {
            if let Some(parent) = state.organizations.get_mut(&organization) {
                parent.detach_workspace(workspace);
            }
        }
        ParentDetach::ProjectFromWorkspace { workspace, project } => {
            if let Some(parent) = state.workspaces.get_mut(&workspace) {
                parent.detach_project(project);
            }
        }
        ParentDetach::TaskFromProject { project, task } => {
            if let Some(parent) = state.projects.get_mut(&project) {
                parent.detach_task(task);
            }
        }
    }
}

#[async_trait]
impl PurgeExecutor for InMemoryHierarchy {
    async fn purge(&self, plan: &PurgePlan) -> HierarchyRepoResult<()> {
        let mut state = self.write()?;

        for note in &plan.notes {
            state.notes.remove(note);
        }
        for subtask in &plan.subtasks {
            state.subtasks.remove(subtask);
        }
        for task in &plan.tasks {
            state.tasks.remove(task);
        }
        for project in &plan.projects {
            state.projects.remove(project);
        }
        for workspace in &plan.workspaces {
            if let Some(removed) = state.workspaces.remove(workspace) {
                state.workspace_names.remove(&removed.name().index_key());
            }
        }
        if let Some(organization) = plan.organization
            && let Some(removed) = state.organizations.remove(&organization)
        {
            state.organization_names.remove(&removed.name().index_key());
        }
        if let Some(detach) = plan.detach {
            apply_detach(&mut state, detach);
        }
        Ok(())
    }
}
