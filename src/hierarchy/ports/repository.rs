//! Repository ports for hierarchy persistence.
//!
//! Updates carry the aggregate's loaded version; implementations reject a
//! write whose expected version no longer matches the stored one, which
//! serializes concurrent mutations of the same entity. The purge executor
//! applies a whole [`PurgePlan`] atomically.

use crate::access::domain::UserId;
use crate::hierarchy::domain::{
    EntityName, Note, Organization, OrganizationId, Project, ProjectId, PurgePlan, Subtask,
    SubtaskId, Task, TaskId, Workspace, WorkspaceId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for hierarchy repository operations.
pub type HierarchyRepoResult<T> = Result<T, HierarchyRepositoryError>;

/// Errors returned by hierarchy repository implementations.
#[derive(Debug, Clone, Error)]
pub enum HierarchyRepositoryError {
    /// An entity with the same identifier already exists.
    #[error("duplicate identifier: {0}")]
    DuplicateId(String),

    /// Another entity of the same kind already uses the name.
    #[error("duplicate name: {0}")]
    DuplicateName(String),

    /// The organization was not found.
    #[error("organization not found: {0}")]
    OrganizationNotFound(OrganizationId),

    /// The workspace was not found.
    #[error("workspace not found: {0}")]
    WorkspaceNotFound(WorkspaceId),

    /// The project was not found.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The subtask was not found.
    #[error("subtask not found: {0}")]
    SubtaskNotFound(SubtaskId),

    /// The stored version no longer matches the loaded one.
    #[error("stale write for {entity}: expected version {expected}, stored {stored}")]
    VersionConflict {
        /// Which entity kind was written.
        entity: &'static str,
        /// The version carried by the write.
        expected: u64,
        /// The version found in storage.
        stored: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl HierarchyRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Organization persistence contract.
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Stores a new organization.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyRepositoryError::DuplicateId`] or
    /// [`HierarchyRepositoryError::DuplicateName`] on uniqueness
    /// violations.
    async fn insert(&self, organization: &Organization) -> HierarchyRepoResult<()>;

    /// Persists changes to an existing organization.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyRepositoryError::OrganizationNotFound`] for
    /// unknown ids and [`HierarchyRepositoryError::VersionConflict`] for
    /// stale writes.
    async fn update(&self, organization: &Organization) -> HierarchyRepoResult<()>;

    /// Finds an organization by id; `None` when absent.
    async fn find(&self, id: OrganizationId) -> HierarchyRepoResult<Option<Organization>>;

    /// Finds an organization by its unique name; `None` when absent.
    async fn find_by_name(&self, name: &EntityName) -> HierarchyRepoResult<Option<Organization>>;

    /// Returns every organization the user is a member of.
    async fn list_with_member(&self, user: UserId) -> HierarchyRepoResult<Vec<Organization>>;

    /// Returns ids of organizations whose deletion deadline has passed.
    async fn due_for_deletion(&self, now: DateTime<Utc>)
    -> HierarchyRepoResult<Vec<OrganizationId>>;
}

/// Workspace persistence contract.
#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Stores a new workspace.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyRepositoryError::DuplicateId`] or
    /// [`HierarchyRepositoryError::DuplicateName`] on uniqueness
    /// violations.
    async fn insert(&self, workspace: &Workspace) -> HierarchyRepoResult<()>;

    /// Persists changes to an existing workspace.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyRepositoryError::WorkspaceNotFound`] for unknown
    /// ids and [`HierarchyRepositoryError::VersionConflict`] for stale
    /// writes.
    async fn update(&self, workspace: &Workspace) -> HierarchyRepoResult<()>;

    /// Finds a workspace by id; `None` when absent.
    async fn find(&self, id: WorkspaceId) -> HierarchyRepoResult<Option<Workspace>>;

    /// Finds a workspace by its unique name; `None` when absent.
    async fn find_by_name(&self, name: &EntityName) -> HierarchyRepoResult<Option<Workspace>>;

    /// Returns every workspace attached to the organization.
    async fn list_for_organization(
        &self,
        organization: OrganizationId,
    ) -> HierarchyRepoResult<Vec<Workspace>>;

    /// Returns ids of workspaces whose deletion deadline has passed.
    async fn due_for_deletion(&self, now: DateTime<Utc>) -> HierarchyRepoResult<Vec<WorkspaceId>>;
}

/// Project persistence contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyRepositoryError::DuplicateId`] when the id is
    /// taken.
    async fn insert(&self, project: &Project) -> HierarchyRepoResult<()>;

    /// Persists changes to an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyRepositoryError::ProjectNotFound`] for unknown
    /// ids and [`HierarchyRepositoryError::VersionConflict`] for stale
    /// writes.
    async fn update(&self, project: &Project) -> HierarchyRepoResult<()>;

    /// Finds a project by id; `None` when absent.
    async fn find(&self, id: ProjectId) -> HierarchyRepoResult<Option<Project>>;

    /// Returns every project attached to the workspace.
    async fn list_for_workspace(&self, workspace: WorkspaceId)
    -> HierarchyRepoResult<Vec<Project>>;
}

/// Task, subtask, and note persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyRepositoryError::DuplicateId`] when the id is
    /// taken.
    async fn insert(&self, task: &Task) -> HierarchyRepoResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyRepositoryError::TaskNotFound`] for unknown ids
    /// and [`HierarchyRepositoryError::VersionConflict`] for stale writes.
    async fn update(&self, task: &Task) -> HierarchyRepoResult<()>;

    /// Finds a task by id; `None` when absent.
    async fn find(&self, id: TaskId) -> HierarchyRepoResult<Option<Task>>;

    /// Returns every task attached to the project.
    async fn list_for_project(&self, project: ProjectId) -> HierarchyRepoResult<Vec<Task>>;

    /// Stores a new subtask.
    async fn insert_subtask(&self, subtask: &Subtask) -> HierarchyRepoResult<()>;

    /// Persists changes to an existing subtask.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyRepositoryError::SubtaskNotFound`] for unknown
    /// ids.
    async fn update_subtask(&self, subtask: &Subtask) -> HierarchyRepoResult<()>;

    /// Returns every subtask attached to the task.
    async fn list_subtasks(&self, task: TaskId) -> HierarchyRepoResult<Vec<Subtask>>;

    /// Stores a new note.
    async fn insert_note(&self, note: &Note) -> HierarchyRepoResult<()>;

    /// Returns every note attached to the task.
    async fn list_notes(&self, task: TaskId) -> HierarchyRepoResult<Vec<Note>>;
}

/// Atomic cascade execution contract.
#[async_trait]
pub trait PurgeExecutor: Send + Sync {
    /// Applies the whole plan in one transaction: deletes every listed
    /// entity, leaves first, and removes the parent back-reference. Either
    /// the full subtree disappears or nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyRepositoryError::Persistence`] when the
    /// transaction cannot be applied.
    async fn purge(&self, plan: &PurgePlan) -> HierarchyRepoResult<()>;
}
