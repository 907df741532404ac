//! Purge plans: explicit, bottom-up cascade descriptions.
//!
//! A cascade is collected into a plan first (every descendant id, leaves
//! first) and then handed to the purge executor as one atomic operation.
//! Readers never observe a partial cascade.

use super::{NoteId, OrganizationId, ProjectId, SubtaskId, TaskId, WorkspaceId};

/// Back-reference removal applied together with a purge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentDetach {
    /// Remove a workspace id from its organization's workspace list.
    WorkspaceFromOrganization {
        /// The surviving parent organization.
        organization: OrganizationId,
        /// The workspace being purged.
        workspace: WorkspaceId,
    },
    /// Remove a project id from its workspace's project list.
    ProjectFromWorkspace {
        /// The surviving parent workspace.
        workspace: WorkspaceId,
        /// The project being purged.
        project: ProjectId,
    },
    /// Remove a task id from its project's task list.
    TaskFromProject {
        /// The surviving parent project.
        project: ProjectId,
        /// The task being purged.
        task: TaskId,
    },
}

/// Everything one permanent deletion removes, ordered leaves-first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgePlan {
    /// Notes to delete.
    pub notes: Vec<NoteId>,
    /// Subtasks to delete.
    pub subtasks: Vec<SubtaskId>,
    /// Tasks to delete.
    pub tasks: Vec<TaskId>,
    /// Projects to delete.
    pub projects: Vec<ProjectId>,
    /// Workspaces to delete.
    pub workspaces: Vec<WorkspaceId>,
    /// The organization to delete, for organization purges.
    pub organization: Option<OrganizationId>,
    /// Back-reference to remove from the surviving parent, when the root
    /// of the purge is not itself a top-level organization.
    pub detach: Option<ParentDetach>,
}

impl PurgePlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of entities the plan removes.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.notes.len()
            + self.subtasks.len()
            + self.tasks.len()
            + self.projects.len()
            + self.workspaces.len()
            + usize::from(self.organization.is_some())
    }

    /// Returns whether the plan removes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0
    }
}
