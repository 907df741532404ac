//! Service layer for project creation, settings, locking, and deletion.

use super::cascade::collect_project_subtree;
use super::{HierarchyServiceError, HierarchyServiceResult};
use crate::access::domain::{ProjectRole, UserId, evaluate};
use crate::hierarchy::domain::{
    EntityName, ParentDetach, Priority, Project, ProjectId, ProjectSchedule, ProjectStatus,
    PurgePlan, WorkspaceId,
};
use crate::hierarchy::ports::{
    ProjectRepository, PurgeExecutor, TaskRepository, WorkspaceRepository,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;

/// Roles allowed to manage project settings and membership.
const MANAGE_ROLES: [ProjectRole; 2] = [ProjectRole::Owner, ProjectRole::Admin];

/// Roles allowed to steer project status, priority, and schedule.
const STEER_ROLES: [ProjectRole; 3] = [ProjectRole::Owner, ProjectRole::Admin, ProjectRole::Manager];

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    workspace: WorkspaceId,
    name: String,
    priority: Priority,
    start_date: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
}

impl CreateProjectRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(workspace: WorkspaceId, name: impl Into<String>) -> Self {
        Self {
            workspace,
            name: name.into(),
            priority: Priority::default(),
            start_date: None,
            due_date: None,
        }
    }

    /// Sets the project priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the scheduled start date.
    #[must_use]
    pub const fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Sets the scheduled due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Project orchestration service.
#[derive(Clone)]
pub struct ProjectService<W, P, T, X, C>
where
    W: WorkspaceRepository,
    P: ProjectRepository,
    T: TaskRepository,
    X: PurgeExecutor,
    C: Clock + Send + Sync,
{
    workspaces: Arc<W>,
    projects: Arc<P>,
    tasks: Arc<T>,
    purge: Arc<X>,
    clock: Arc<C>,
}

impl<W, P, T, X, C> ProjectService<W, P, T, X, C>
where
    W: WorkspaceRepository,
    P: ProjectRepository,
    T: TaskRepository,
    X: PurgeExecutor,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(
        workspaces: Arc<W>,
        projects: Arc<P>,
        tasks: Arc<T>,
        purge: Arc<X>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            workspaces,
            projects,
            tasks,
            purge,
            clock,
        }
    }

    async fn find_project_or_error(&self, id: ProjectId) -> HierarchyServiceResult<Project> {
        self.projects
            .find(id)
            .await?
            .ok_or(HierarchyServiceError::ProjectNotFound(id))
    }

    /// Creates a project inside a workspace.
    ///
    /// Any workspace member may create projects. The creator becomes the
    /// project's designated owner; the workspace's designated admin, when
    /// distinct from the creator, is seeded as a project admin.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyServiceError::WorkspaceNotFound`] for unknown
    /// workspaces, access errors for non-members, schedule validation
    /// errors, and
    /// [`crate::hierarchy::domain::HierarchyDomainError::DeletionPending`]
    /// while the workspace is scheduled for deletion.
    pub async fn create(
        &self,
        request: CreateProjectRequest,
        actor: UserId,
    ) -> HierarchyServiceResult<Project> {
        let mut workspace = self
            .workspaces
            .find(request.workspace)
            .await?
            .ok_or(HierarchyServiceError::WorkspaceNotFound(request.workspace))?;
        evaluate(actor, workspace.members(), &[])?;
        workspace.ensure_active()?;

        let name = EntityName::new(request.name)?;
        let schedule = ProjectSchedule::new(request.start_date, request.due_date)?;
        let mut project = Project::new(
            name,
            workspace.id(),
            actor,
            request.priority,
            schedule,
            &*self.clock,
        );
        if workspace.admin() != actor {
            project.add_member(workspace.admin(), ProjectRole::Admin, &*self.clock)?;
        }

        self.projects.insert(&project).await?;
        workspace.attach_project(project.id(), &*self.clock);
        self.workspaces.update(&workspace).await?;
        Ok(project)
    }

    /// Finds a project by id.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyServiceError::ProjectNotFound`] when absent.
    pub async fn get(&self, id: ProjectId) -> HierarchyServiceResult<Project> {
        self.find_project_or_error(id).await
    }

    /// Locks the project against mutation.
    ///
    /// # Errors
    ///
    /// Returns access errors unless the actor holds owner or admin and
    /// [`crate::hierarchy::domain::HierarchyDomainError::ProjectLocked`]
    /// when already locked.
    pub async fn lock(&self, id: ProjectId, actor: UserId) -> HierarchyServiceResult<Project> {
        let mut project = self.find_project_or_error(id).await?;
        evaluate(actor, project.members(), &MANAGE_ROLES)?;
        project.lock(actor, &*self.clock)?;
        self.projects.update(&project).await?;
        Ok(project)
    }

    /// Releases the project lock.
    ///
    /// # Errors
    ///
    /// Returns access errors unless the actor holds owner or admin and
    /// [`crate::hierarchy::domain::HierarchyDomainError::ProjectNotLocked`]
    /// when the project is not locked.
    pub async fn unlock(&self, id: ProjectId, actor: UserId) -> HierarchyServiceResult<Project> {
        let mut project = self.find_project_or_error(id).await?;
        evaluate(actor, project.members(), &MANAGE_ROLES)?;
        project.unlock(&*self.clock)?;
        self.projects.update(&project).await?;
        Ok(project)
    }

    /// Changes the project's workflow status.
    ///
    /// # Errors
    ///
    /// Returns access errors unless the actor holds owner, admin, or
    /// manager; lock errors while the project is locked.
    pub async fn set_status(
        &self,
        id: ProjectId,
        actor: UserId,
        status: ProjectStatus,
    ) -> HierarchyServiceResult<Project> {
        let mut project = self.find_project_or_error(id).await?;
        evaluate(actor, project.members(), &STEER_ROLES)?;
        project.ensure_unlocked()?;
        project.set_status(status, &*self.clock);
        self.projects.update(&project).await?;
        Ok(project)
    }

    /// Changes the project's priority.
    ///
    /// # Errors
    ///
    /// Returns access errors unless the actor holds owner, admin, or
    /// manager; lock errors while the project is locked.
    pub async fn set_priority(
        &self,
        id: ProjectId,
        actor: UserId,
        priority: Priority,
    ) -> HierarchyServiceResult<Project> {
        let mut project = self.find_project_or_error(id).await?;
        evaluate(actor, project.members(), &STEER_ROLES)?;
        project.ensure_unlocked()?;
        project.set_priority(priority, &*self.clock);
        self.projects.update(&project).await?;
        Ok(project)
    }

    /// Replaces the project schedule.
    ///
    /// # Errors
    ///
    /// Returns schedule validation errors, access errors unless the actor
    /// holds owner, admin, or manager, and lock errors while the project
    /// is locked.
    pub async fn reschedule(
        &self,
        id: ProjectId,
        actor: UserId,
        start_date: Option<DateTime<Utc>>,
        due_date: Option<DateTime<Utc>>,
    ) -> HierarchyServiceResult<Project> {
        let mut project = self.find_project_or_error(id).await?;
        evaluate(actor, project.members(), &STEER_ROLES)?;
        project.ensure_unlocked()?;
        let schedule = ProjectSchedule::new(start_date, due_date)?;
        project.reschedule(schedule, &*self.clock);
        self.projects.update(&project).await?;
        Ok(project)
    }

    /// Permanently deletes the project and its whole task subtree.
    ///
    /// The cascade is collected first and applied atomically: tasks,
    /// subtasks, and notes disappear together with the project, and the
    /// workspace's back-reference is removed in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns access errors unless the actor holds owner or admin and
    /// lock errors while the project is locked.
    pub async fn delete(&self, id: ProjectId, actor: UserId) -> HierarchyServiceResult<()> {
        let project = self.find_project_or_error(id).await?;
        evaluate(actor, project.members(), &MANAGE_ROLES)?;
        project.ensure_unlocked()?;

        let mut plan = PurgePlan::new();
        collect_project_subtree(&*self.tasks, project.id(), &mut plan).await?;
        plan.detach = Some(ParentDetach::ProjectFromWorkspace {
            workspace: project.workspace(),
            project: project.id(),
        });
        self.purge.purge(&plan).await?;
        Ok(())
    }
}
