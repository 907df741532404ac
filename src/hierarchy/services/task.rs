//! Service layer for task creation, transitions, children, and deletion.

use super::cascade::collect_task_subtree;
use super::{HierarchyServiceError, HierarchyServiceResult, ProgressRecalculator};
use crate::access::domain::{AccessError, ProjectRole, UserId, evaluate};
use crate::hierarchy::domain::{
    Attachment, EntityName, Note, ParentDetach, Priority, Project, ProjectId, PurgePlan, Subtask,
    SubtaskId, Task, TaskCounts, TaskId, TaskStatus, count_tasks,
};
use crate::hierarchy::ports::{
    OverdueNotifier, ProjectRepository, PurgeExecutor, TaskRepository,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::warn;

/// Roles allowed to create and edit tasks.
const EDIT_ROLES: [ProjectRole; 4] = [
    ProjectRole::Owner,
    ProjectRole::Admin,
    ProjectRole::Manager,
    ProjectRole::Member,
];

/// Roles with administrative reach over any task in the project.
const ADMIN_ROLES: [ProjectRole; 2] = [ProjectRole::Owner, ProjectRole::Admin];

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    project: ProjectId,
    title: String,
    assigned_to: Option<UserId>,
    priority: Priority,
    due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(project: ProjectId, title: impl Into<String>) -> Self {
        Self {
            project,
            title: title.into(),
            assigned_to: None,
            priority: Priority::default(),
            due_date: None,
        }
    }

    /// Sets the initial assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assigned_to = Some(assignee);
        self
    }

    /// Sets the task priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Task orchestration service.
#[derive(Clone)]
pub struct TaskService<P, T, X, N, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    X: PurgeExecutor,
    N: OverdueNotifier,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    tasks: Arc<T>,
    purge: Arc<X>,
    notifier: Arc<N>,
    clock: Arc<C>,
    recalculator: ProgressRecalculator<P, T, C>,
}

impl<P, T, X, N, C> TaskService<P, T, X, N, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    X: PurgeExecutor,
    N: OverdueNotifier,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub fn new(
        projects: Arc<P>,
        tasks: Arc<T>,
        purge: Arc<X>,
        notifier: Arc<N>,
        clock: Arc<C>,
    ) -> Self {
        let recalculator =
            ProgressRecalculator::new(projects.clone(), tasks.clone(), clock.clone());
        Self {
            projects,
            tasks,
            purge,
            notifier,
            clock,
            recalculator,
        }
    }

    async fn find_task_or_error(&self, id: TaskId) -> HierarchyServiceResult<Task> {
        self.tasks
            .find(id)
            .await?
            .ok_or(HierarchyServiceError::TaskNotFound(id))
    }

    async fn find_parent_or_error(&self, task: &Task) -> HierarchyServiceResult<Project> {
        self.projects
            .find(task.project())
            .await?
            .ok_or(HierarchyServiceError::ProjectNotFound(task.project()))
    }

    /// Authorizes status transitions and day-to-day edits: the assignee,
    /// the reporter, or a member holding an editing role.
    fn authorize_edit(
        actor: UserId,
        task: &Task,
        project: &Project,
    ) -> Result<(), AccessError> {
        if task.assigned_to() == Some(actor) || task.reporter() == actor {
            return Ok(());
        }
        evaluate(actor, project.members(), &EDIT_ROLES)
    }

    /// Authorizes transition-level operations: the assignee, the reporter,
    /// or a project owner/admin.
    fn authorize_transition(
        actor: UserId,
        task: &Task,
        project: &Project,
    ) -> Result<(), AccessError> {
        if task.assigned_to() == Some(actor) || task.reporter() == actor {
            return Ok(());
        }
        evaluate(actor, project.members(), &ADMIN_ROLES)
    }

    /// Authorizes administrative operations: the reporter or a project
    /// owner/admin.
    fn authorize_admin(actor: UserId, task: &Task, project: &Project) -> Result<(), AccessError> {
        if task.reporter() == actor {
            return Ok(());
        }
        evaluate(actor, project.members(), &ADMIN_ROLES)
    }

    /// Creates a task; the creating actor becomes its reporter.
    ///
    /// Progress is recomputed synchronously before the call returns.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyServiceError::ProjectNotFound`] for unknown
    /// projects, access errors for viewers and non-members, and lock
    /// errors while the project is locked.
    pub async fn create(
        &self,
        request: CreateTaskRequest,
        actor: UserId,
    ) -> HierarchyServiceResult<Task> {
        let mut project = self
            .projects
            .find(request.project)
            .await?
            .ok_or(HierarchyServiceError::ProjectNotFound(request.project))?;
        evaluate(actor, project.members(), &EDIT_ROLES)?;
        project.ensure_unlocked()?;

        let title = EntityName::new(request.title)?;
        let task = Task::new(
            project.id(),
            title,
            actor,
            request.assigned_to,
            request.priority,
            request.due_date,
            &*self.clock,
        );
        self.tasks.insert(&task).await?;
        project.attach_task(task.id(), &*self.clock);
        self.projects.update(&project).await?;
        self.recalculator.recompute(project.id()).await?;
        Ok(task)
    }

    /// Finds a task by id.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyServiceError::TaskNotFound`] when absent.
    pub async fn get(&self, id: TaskId) -> HierarchyServiceResult<Task> {
        self.find_task_or_error(id).await
    }

    /// Moves a task to a new status.
    ///
    /// Only the assignee, the reporter, or a project owner/admin may
    /// transition a task. The first transition into completed stamps
    /// `completed_at`; progress is recomputed synchronously.
    ///
    /// # Errors
    ///
    /// Returns not-found, access, and lock errors per the standard
    /// evaluation order.
    pub async fn change_status(
        &self,
        id: TaskId,
        actor: UserId,
        status: TaskStatus,
    ) -> HierarchyServiceResult<Task> {
        let mut task = self.find_task_or_error(id).await?;
        let project = self.find_parent_or_error(&task).await?;
        Self::authorize_transition(actor, &task, &project)?;
        project.ensure_unlocked()?;

        task.change_status(status, &*self.clock);
        self.tasks.update(&task).await?;
        self.recalculator.recompute(project.id()).await?;
        Ok(task)
    }

    /// Changes a task's priority.
    ///
    /// Priority is the reporter's call alone.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyServiceError::NotTaskReporter`] for any other
    /// actor, plus not-found and lock errors.
    pub async fn change_priority(
        &self,
        id: TaskId,
        actor: UserId,
        priority: Priority,
    ) -> HierarchyServiceResult<Task> {
        let mut task = self.find_task_or_error(id).await?;
        let project = self.find_parent_or_error(&task).await?;
        if task.reporter() != actor {
            return Err(HierarchyServiceError::NotTaskReporter {
                user: actor,
                task: id,
            });
        }
        project.ensure_unlocked()?;

        task.set_priority(priority, &*self.clock);
        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Reassigns a task; `None` unassigns it.
    ///
    /// # Errors
    ///
    /// Returns access errors unless the actor is the reporter or a project
    /// owner/admin, plus not-found and lock errors.
    pub async fn reassign(
        &self,
        id: TaskId,
        actor: UserId,
        assignee: Option<UserId>,
    ) -> HierarchyServiceResult<Task> {
        let mut task = self.find_task_or_error(id).await?;
        let project = self.find_parent_or_error(&task).await?;
        Self::authorize_admin(actor, &task, &project)?;
        project.ensure_unlocked()?;

        task.assign(assignee, &*self.clock);
        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Adds a subtask to a task.
    ///
    /// # Errors
    ///
    /// Returns not-found, access, lock, and title validation errors.
    pub async fn add_subtask(
        &self,
        id: TaskId,
        actor: UserId,
        title: impl Into<String> + Send,
    ) -> HierarchyServiceResult<Subtask> {
        let mut task = self.find_task_or_error(id).await?;
        let project = self.find_parent_or_error(&task).await?;
        Self::authorize_edit(actor, &task, &project)?;
        project.ensure_unlocked()?;

        let subtask = Subtask::new(task.id(), EntityName::new(title)?, &*self.clock);
        self.tasks.insert_subtask(&subtask).await?;
        task.attach_subtask(subtask.id(), &*self.clock);
        self.tasks.update(&task).await?;
        Ok(subtask)
    }

    /// Checks a subtask off.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyServiceError::SubtaskNotFound`] when the subtask
    /// does not belong to the task, plus the standard guards.
    pub async fn complete_subtask(
        &self,
        id: TaskId,
        subtask_id: SubtaskId,
        actor: UserId,
    ) -> HierarchyServiceResult<Subtask> {
        let task = self.find_task_or_error(id).await?;
        let project = self.find_parent_or_error(&task).await?;
        Self::authorize_edit(actor, &task, &project)?;
        project.ensure_unlocked()?;

        let mut subtask = self
            .tasks
            .list_subtasks(task.id())
            .await?
            .into_iter()
            .find(|subtask| subtask.id() == subtask_id)
            .ok_or(HierarchyServiceError::SubtaskNotFound(subtask_id))?;
        subtask.complete();
        self.tasks.update_subtask(&subtask).await?;
        Ok(subtask)
    }

    /// Adds a note to a task.
    ///
    /// # Errors
    ///
    /// Returns not-found, access, lock, and body validation errors.
    pub async fn add_note(
        &self,
        id: TaskId,
        actor: UserId,
        body: impl Into<String> + Send,
    ) -> HierarchyServiceResult<Note> {
        let mut task = self.find_task_or_error(id).await?;
        let project = self.find_parent_or_error(&task).await?;
        Self::authorize_edit(actor, &task, &project)?;
        project.ensure_unlocked()?;

        let note = Note::new(task.id(), actor, body, &*self.clock)?;
        self.tasks.insert_note(&note).await?;
        task.attach_note(note.id(), &*self.clock);
        self.tasks.update(&task).await?;
        Ok(note)
    }

    /// Records an attachment on a task.
    ///
    /// The file itself lives behind the upload boundary; only the record
    /// is kept here.
    ///
    /// # Errors
    ///
    /// Returns not-found, access, and lock errors.
    pub async fn add_attachment(
        &self,
        id: TaskId,
        actor: UserId,
        file_name: impl Into<String> + Send,
    ) -> HierarchyServiceResult<Task> {
        let mut task = self.find_task_or_error(id).await?;
        let project = self.find_parent_or_error(&task).await?;
        Self::authorize_edit(actor, &task, &project)?;
        project.ensure_unlocked()?;

        let attachment = Attachment::new(file_name, actor, &*self.clock);
        task.add_attachment(attachment, &*self.clock);
        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Permanently deletes a task together with its subtasks and notes.
    ///
    /// The cascade is applied atomically and the project's back-reference
    /// is removed in the same transaction; progress is recomputed
    /// synchronously afterwards.
    ///
    /// # Errors
    ///
    /// Returns access errors unless the actor is the reporter or a project
    /// owner/admin, plus not-found and lock errors.
    pub async fn delete(&self, id: TaskId, actor: UserId) -> HierarchyServiceResult<()> {
        let task = self.find_task_or_error(id).await?;
        let project = self.find_parent_or_error(&task).await?;
        Self::authorize_admin(actor, &task, &project)?;
        project.ensure_unlocked()?;

        let mut plan = PurgePlan::new();
        collect_task_subtree(&*self.tasks, task.id(), &mut plan).await?;
        plan.detach = Some(ParentDetach::TaskFromProject {
            project: project.id(),
            task: task.id(),
        });
        self.purge.purge(&plan).await?;
        self.recalculator.recompute(project.id()).await?;
        Ok(())
    }

    /// Computes the status-bucket counts for a project's task list view.
    ///
    /// The counts are derived on read and never persisted.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyServiceError::ProjectNotFound`] for unknown
    /// projects and access errors for non-members.
    pub async fn counts(&self, project: ProjectId, actor: UserId) -> HierarchyServiceResult<TaskCounts> {
        let parent = self
            .projects
            .find(project)
            .await?
            .ok_or(HierarchyServiceError::ProjectNotFound(project))?;
        evaluate(actor, parent.members(), &[])?;

        let tasks = self.tasks.list_for_project(project).await?;
        Ok(count_tasks(&tasks, self.clock.utc()))
    }

    /// Emails an overdue reminder for every overdue, assigned task in the
    /// project, returning how many reminders went out.
    ///
    /// Delivery failures are logged and skipped; they never fail the
    /// sweep or roll anything back.
    ///
    /// # Errors
    ///
    /// Returns repository errors from the task listing.
    pub async fn dispatch_overdue_reminders(
        &self,
        project: ProjectId,
    ) -> HierarchyServiceResult<usize> {
        let now = self.clock.utc();
        let mut sent = 0;
        for task in self.tasks.list_for_project(project).await? {
            if !task.is_overdue(now) {
                continue;
            }
            let Some(assignee) = task.assigned_to() else {
                continue;
            };
            match self.notifier.send_overdue_task_email(assignee, &task).await {
                Ok(()) => sent += 1,
                Err(err) => {
                    warn!(task = %task.id(), user = %assignee, error = %err, "overdue reminder failed");
                }
            }
        }
        Ok(sent)
    }
}
