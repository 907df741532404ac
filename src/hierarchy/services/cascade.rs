//! Descendant collection for purge plans.
//!
//! Cascades are collected from the store rather than from the parent's
//! reference lists, so a dangling or missing back-reference can never
//! leave an orphan behind.

use crate::hierarchy::domain::{ProjectId, PurgePlan, TaskId, WorkspaceId};
use crate::hierarchy::ports::{HierarchyRepoResult, ProjectRepository, TaskRepository};

/// Adds a task and its subtasks and notes to the plan.
pub(crate) async fn collect_task_subtree<T>(
    tasks: &T,
    task: TaskId,
    plan: &mut PurgePlan,
) -> HierarchyRepoResult<()>
where
    T: TaskRepository + ?Sized,
{
    for subtask in tasks.list_subtasks(task).await? {
        plan.subtasks.push(subtask.id());
    }
    for note in tasks.list_notes(task).await? {
        plan.notes.push(note.id());
    }
    plan.tasks.push(task);
    Ok(())
}

/// Adds a project and its whole task subtree to the plan.
pub(crate) async fn collect_project_subtree<T>(
    tasks: &T,
    project: ProjectId,
    plan: &mut PurgePlan,
) -> HierarchyRepoResult<()>
where
    T: TaskRepository + ?Sized,
{
    for task in tasks.list_for_project(project).await? {
        collect_task_subtree(tasks, task.id(), plan).await?;
    }
    plan.projects.push(project);
    Ok(())
}

/// Adds a workspace and its whole project subtree to the plan.
pub(crate) async fn collect_workspace_subtree<P, T>(
    projects: &P,
    tasks: &T,
    workspace: WorkspaceId,
    plan: &mut PurgePlan,
) -> HierarchyRepoResult<()>
where
    P: ProjectRepository + ?Sized,
    T: TaskRepository + ?Sized,
{
    for project in projects.list_for_workspace(workspace).await? {
        collect_project_subtree(tasks, project.id(), plan).await?;
    }
    plan.workspaces.push(workspace);
    Ok(())
}
