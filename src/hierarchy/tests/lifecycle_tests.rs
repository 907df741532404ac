//! Soft-delete lifecycle and cascade tests.

use super::support::Harness;
use crate::access::domain::{AccessError, OrganizationRole, UserId};
use crate::hierarchy::domain::HierarchyDomainError;
use crate::hierarchy::ports::{TaskRepository, WorkspaceRepository};
use crate::hierarchy::services::{HierarchyServiceError, PurgeOutcome};
use crate::taxonomy::ErrorKind;
use chrono::Duration;
use mockable::Clock;

#[tokio::test(flavor = "multi_thread")]
async fn only_the_owner_may_request_organization_deletion() {
    let harness = Harness::new();
    let owner = UserId::new();
    let admin = UserId::new();
    let (organization, _, _) = harness.seed_tree(owner).await;
    harness
        .membership
        .add_organization_member(organization.id(), owner, admin, OrganizationRole::Admin)
        .await
        .expect("add should succeed");

    let denied = harness
        .lifecycle
        .request_organization_deletion(organization.id(), admin, None)
        .await;
    assert!(matches!(
        denied,
        Err(HierarchyServiceError::Access(
            AccessError::InsufficientRole { .. }
        ))
    ));

    harness
        .lifecycle
        .request_organization_deletion(organization.id(), owner, Some("sunset".to_owned()))
        .await
        .expect("owner request should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn soft_delete_round_trip_leaves_children_untouched() {
    let harness = Harness::new();
    let owner = UserId::new();
    let (organization, workspace, project) = harness.seed_tree(owner).await;
    let task = harness.seed_task(&project, owner, "survives").await;

    harness
        .lifecycle
        .request_organization_deletion(organization.id(), owner, None)
        .await
        .expect("request should succeed");

    // Day 27: recovery still possible.
    harness.clock.advance(Duration::days(27));
    let recovered = harness
        .lifecycle
        .recover_organization(organization.id(), owner)
        .await
        .expect("recovery should succeed");
    assert!(!recovered.lifecycle().is_pending_deletion());
    assert!(recovered.lifecycle().recovered_at().is_some());

    // Children are untouched by the round trip.
    assert!(
        harness
            .workspaces
            .get(workspace.id())
            .await
            .expect("workspace should exist")
            .projects()
            .contains(&project.id())
    );
    assert!(harness.tasks.get(task.id()).await.is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn recovery_on_day_29_fails_and_the_reaper_removes_everything() {
    let harness = Harness::new();
    let owner = UserId::new();
    let (organization, workspace, project) = harness.seed_tree(owner).await;
    let task = harness.seed_task(&project, owner, "doomed").await;
    harness
        .tasks
        .add_subtask(task.id(), owner, "also doomed")
        .await
        .expect("subtask creation should succeed");
    harness
        .tasks
        .add_note(task.id(), owner, "final words")
        .await
        .expect("note creation should succeed");

    harness
        .lifecycle
        .request_organization_deletion(organization.id(), owner, None)
        .await
        .expect("request should succeed");

    harness.clock.advance(Duration::days(29));
    let recovery = harness
        .lifecycle
        .recover_organization(organization.id(), owner)
        .await;
    assert!(matches!(
        recovery,
        Err(HierarchyServiceError::Domain(
            HierarchyDomainError::WindowExpired { .. }
        ))
    ));
    if let Err(err) = recovery {
        assert_eq!(err.kind(), Some(ErrorKind::Expired));
    }

    let report = harness.reaper.sweep().await;
    assert_eq!(report.purged, 1);
    assert_eq!(report.failed, 0);

    // Cascade completeness: nothing in the subtree survives.
    assert!(matches!(
        harness.organizations.get(organization.id()).await,
        Err(HierarchyServiceError::OrganizationNotFound(_))
    ));
    assert!(matches!(
        harness.workspaces.get(workspace.id()).await,
        Err(HierarchyServiceError::WorkspaceNotFound(_))
    ));
    assert!(matches!(
        harness.projects.get(project.id()).await,
        Err(HierarchyServiceError::ProjectNotFound(_))
    ));
    assert!(matches!(
        harness.tasks.get(task.id()).await,
        Err(HierarchyServiceError::TaskNotFound(_))
    ));
    assert!(
        harness
            .store
            .list_subtasks(task.id())
            .await
            .expect("listing should succeed")
            .is_empty()
    );
    assert!(
        harness
            .store
            .list_notes(task.id())
            .await
            .expect("listing should succeed")
            .is_empty()
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn workspace_purge_detaches_from_the_surviving_organization() {
    let harness = Harness::new();
    let owner = UserId::new();
    let (organization, workspace, project) = harness.seed_tree(owner).await;
    harness.seed_task(&project, owner, "goes with the workspace").await;

    harness
        .lifecycle
        .request_workspace_deletion(workspace.id(), owner, None)
        .await
        .expect("request should succeed");
    harness.clock.advance(Duration::days(12));

    let outcome = harness
        .lifecycle
        .purge_workspace(workspace.id(), harness.clock.utc())
        .await
        .expect("purge should succeed");
    assert!(outcome.is_purged());

    let parent = harness
        .organizations
        .get(organization.id())
        .await
        .expect("organization should survive");
    assert!(!parent.workspaces().contains(&workspace.id()));
    assert!(
        harness
            .store
            .list_for_organization(organization.id())
            .await
            .expect("listing should succeed")
            .is_empty()
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn purge_rechecks_the_deadline_and_skips_recovered_entities() {
    let harness = Harness::new();
    let owner = UserId::new();
    let (organization, _, _) = harness.seed_tree(owner).await;

    harness
        .lifecycle
        .request_organization_deletion(organization.id(), owner, None)
        .await
        .expect("request should succeed");
    harness.clock.advance(Duration::days(28));
    let deadline = harness.clock.utc();

    // Simulates the race: the sweep selected the organization, then the
    // user recovered it before the purge executed. Recovery rewinds the
    // clock a second to stay strictly inside the window.
    harness.clock.advance(Duration::seconds(-1));
    harness
        .lifecycle
        .recover_organization(organization.id(), owner)
        .await
        .expect("recovery should succeed");

    let outcome = harness
        .lifecycle
        .purge_organization(organization.id(), deadline)
        .await
        .expect("purge should not error");
    assert_eq!(outcome, PurgeOutcome::SkippedActive);
    assert!(harness.organizations.get(organization.id()).await.is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn mutations_are_rejected_while_deletion_is_pending() {
    let harness = Harness::new();
    let owner = UserId::new();
    let user = UserId::new();
    let (organization, _, _) = harness.seed_tree(owner).await;

    harness
        .lifecycle
        .request_organization_deletion(organization.id(), owner, None)
        .await
        .expect("request should succeed");

    let result = harness
        .membership
        .add_organization_member(organization.id(), owner, user, OrganizationRole::Member)
        .await;
    assert!(matches!(
        result,
        Err(HierarchyServiceError::Domain(
            HierarchyDomainError::DeletionPending
        ))
    ));
}
