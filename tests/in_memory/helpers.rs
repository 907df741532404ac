//! Shared fixtures for in-memory integration tests.

use aalto::access::domain::UserId;
use aalto::clock::FixedClock;
use aalto::hierarchy::adapters::memory::{InMemoryHierarchy, RecordingOverdueNotifier};
use aalto::hierarchy::domain::{Organization, Project, Workspace};
use aalto::hierarchy::services::{
    CreateProjectRequest, LifecycleService, MembershipService, OrganizationService, ProjectService,
    Reaper, ReaperConfig, TaskService, WorkspaceService,
};
use aalto::invitation::adapters::memory::{
    InMemoryDirectory, InMemoryInvitationRepository, RecordingInvitationNotifier,
};
use aalto::invitation::services::InvitationWorkflow;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

type Store = InMemoryHierarchy;

pub type Organizations = OrganizationService<Store, FixedClock>;
pub type Workspaces = WorkspaceService<Store, Store, FixedClock>;
pub type Projects = ProjectService<Store, Store, Store, Store, FixedClock>;
pub type Tasks = TaskService<Store, Store, Store, RecordingOverdueNotifier, FixedClock>;
pub type Membership = MembershipService<Store, Store, Store, FixedClock>;
pub type Lifecycle = LifecycleService<Store, Store, Store, Store, Store, FixedClock>;
pub type Sweeper = Reaper<Store, Store, Store, Store, Store, FixedClock>;
pub type Invitations = InvitationWorkflow<
    InMemoryInvitationRepository,
    InMemoryDirectory,
    Store,
    RecordingInvitationNotifier,
    FixedClock,
>;

/// A fixed, arbitrary starting instant for deterministic windows.
pub fn day_zero() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single() {
        Some(instant) => instant,
        None => panic!("valid timestamp literal"),
    }
}

/// Every service in the crate wired over one in-memory store.
pub struct Platform {
    pub store: Arc<Store>,
    pub clock: Arc<FixedClock>,
    pub directory: Arc<InMemoryDirectory>,
    pub mailer: Arc<RecordingInvitationNotifier>,
    pub organizations: Organizations,
    pub workspaces: Workspaces,
    pub projects: Projects,
    pub tasks: Tasks,
    pub membership: Membership,
    pub lifecycle: Lifecycle,
    pub reaper: Sweeper,
    pub invitations: Invitations,
}

impl Platform {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(Store::new());
        let clock = Arc::new(FixedClock::new(day_zero()));
        let directory = Arc::new(InMemoryDirectory::new());
        let mailer = Arc::new(RecordingInvitationNotifier::new());

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
            Arc::new(RecordingOverdueNotifier::new()),
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
        let invitations = InvitationWorkflow::new(
            Arc::new(InMemoryInvitationRepository::new()),
            directory.clone(),
            store.clone(),
            mailer.clone(),
            clock.clone(),
        );

        Self {
            store,
            clock,
            directory,
            mailer,
            organizations,
            workspaces,
            projects,
            tasks,
            membership,
            lifecycle,
            reaper,
            invitations,
        }
    }

    /// Creates an organization, workspace, and project owned by `owner`.
    pub async fn seed_tree(&self, owner: UserId) -> (Organization, Workspace, Project) {
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
            .create(CreateProjectRequest::new(workspace.id(), "Launch"), owner)
            .await
            .expect("project creation should succeed");
        (organization, workspace, project)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new()
    }
}
