//! Port contracts for hierarchy persistence and notification.

mod notifier;
mod repository;

pub use notifier::{NotifierError, OverdueNotifier};
pub use repository::{
    HierarchyRepoResult, HierarchyRepositoryError, OrganizationRepository, ProjectRepository,
    PurgeExecutor, TaskRepository, WorkspaceRepository,
};
