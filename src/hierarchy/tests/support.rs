//! Shared harness for hierarchy service tests.

use crate::access::domain::UserId;
use crate::clock::FixedClock;
use crate::hierarchy::adapters::memory::{InMemoryHierarchy, RecordingOverdueNotifier};
use crate::hierarchy::domain::{Organization, Project, Task, Workspace};
use crate::hierarchy::services::{
    CreateProjectRequest, CreateTaskRequest, LifecycleService, MembershipService,
    OrganizationService, ProjectService, Reaper, ReaperConfig, TaskService, WorkspaceService,
};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

pub(crate) type Store = InMemoryHierarchy;
pub(crate) type TestOrganizationService = OrganizationService<Store, FixedClock>;
pub(crate) type TestWorkspaceService = WorkspaceService<Store, Store, FixedClock>;
pub(crate) type TestProjectService = ProjectService<Store, Store, Store, Store, FixedClock>;
pub(crate) type TestTaskService =
    TaskService<Store, Store, Store, RecordingOverdueNotifier, FixedClock>;
pub(crate) type TestMembershipService = MembershipService<Store, Store, Store, FixedClock>;
pub(crate) type TestLifecycleService =
    LifecycleService<Store, Store, Store, Store, Store, FixedClock>;
pub(crate) type TestReaper = Reaper<Store, Store, Store, Store, Store, FixedClock>;

/// A fixed, arbitrary starting instant for deterministic windows.
pub(crate) fn day_zero() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single() {
        Some(instant) => instant,
        None => panic!("valid timestamp literal"),
    }
}

/// Every service wired over one shared in-memory store and fixed clock.
pub(crate) struct Harness {
    pub store: Arc<Store>,
    pub clock: Arc<FixedClock>,
    pub notifier: Arc<RecordingOverdueNotifier>,
    pub organizations: TestOrganizationService,
    pub workspaces: TestWorkspaceService,
    pub projects: TestProjectService,
    pub tasks: TestTaskService,
    pub membership: TestMembershipService,
    pub lifecycle: TestLifecycleService,
    pub reaper: TestReaper,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let store = Arc::new(Store::new());
        let clock = Arc::new(FixedClock::new(day_zero()));
        let notifier = Arc::new(RecordingOverdueNotifier::new());

        let organizations = OrganizationService::new(store.clone(), clock.clone());
        let workspaces = WorkspaceService::new(store.clone(), store.clone(), clock.clone());
        let projects = ProjectService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            clock.clone(),
        );
        let tasks = TaskService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            notifier.clone(),
            clock.clone(),
        );
        let membership = MembershipService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            clock.clone(),
        );
        let lifecycle = LifecycleService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            clock.clone(),
        );
        let reaper = Reaper::new(
            lifecycle.clone(),
            store.clone(),
            store.clone(),
            clock.clone(),
            ReaperConfig::default(),
        );

        Self {
            store,
            clock,
            notifier,
            organizations,
            workspaces,
            projects,
            tasks,
            membership,
            lifecycle,
            reaper,
        }
    }

    /// Creates an organization, workspace, and project owned by `owner`.
    pub(crate) async fn seed_tree(&self, owner: UserId) -> (Organization, Workspace, Project) {
        let organization = self
            .organizations
            .create("Acme", owner)
            .await
            .expect("organization creation should succeed");
        let workspace = self
            .workspaces
            .create(organization.id(), "Platform", owner)
            .await
            .expect("workspace creation should succeed");
        let project = self
            .projects
            .create(
                CreateProjectRequest::new(workspace.id(), "Launch"),
                owner,
            )
            .await
            .expect("project creation should succeed");
        (organization, workspace, project)
    }

    /// Creates a task titled `title` in `project`, reported by `reporter`.
    pub(crate) async fn seed_task(
        &self,
        project: &Project,
        reporter: UserId,
        title: &str,
    ) -> Task {
        self.tasks
            .create(CreateTaskRequest::new(project.id(), title), reporter)
            .await
            .expect("task creation should succeed")
    }
}
