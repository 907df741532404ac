//! Aggregate recalculator for project progress.

use super::{HierarchyServiceError, HierarchyServiceResult};
use crate::hierarchy::domain::{ProjectId, TaskStatus, progress};
use crate::hierarchy::ports::{ProjectRepository, TaskRepository};
use mockable::Clock;
use std::sync::Arc;

/// Recomputes the derived progress value of a project from its task set.
///
/// Runs synchronously after every task creation, deletion, and status
/// change, before the triggering request returns, so the stored value is
/// always consistent with the task set. Clients can never write progress
/// directly.
#[derive(Clone)]
pub struct ProgressRecalculator<P, T, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    tasks: Arc<T>,
    clock: Arc<C>,
}

impl<P, T, C> ProgressRecalculator<P, T, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new recalculator.
    #[must_use]
    pub const fn new(projects: Arc<P>, tasks: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            projects,
            tasks,
            clock,
        }
    }

    /// Recomputes and persists the project's progress, returning the new
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyServiceError::ProjectNotFound`] for unknown
    /// projects and repository errors from the read or write.
    pub async fn recompute(&self, id: ProjectId) -> HierarchyServiceResult<u8> {
        let tasks = self.tasks.list_for_project(id).await?;
        let completed = tasks
            .iter()
            .filter(|task| task.status() == TaskStatus::Completed)
            .count();
        let value = progress(completed, tasks.len());

        let mut project = self
            .projects
            .find(id)
            .await?
            .ok_or(HierarchyServiceError::ProjectNotFound(id))?;
        project.record_progress(value, &*self.clock);
        self.projects.update(&project).await?;
        Ok(value)
    }
}
