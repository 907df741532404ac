//! End-to-end soft-delete, recovery, and reaper flows.

use super::helpers::Platform;
use aalto::access::domain::UserId;
use aalto::hierarchy::domain::HierarchyDomainError;
use aalto::hierarchy::services::HierarchyServiceError;
use aalto::taxonomy::ErrorKind;
use chrono::Duration;

#[tokio::test(flavor = "multi_thread")]
async fn acme_recovery_window_scenario() {
    let platform = Platform::new();
    let owner = UserId::new();
    let (organization, workspace, _) = platform.seed_tree(owner).await;

    // Day 0: the owner requests deletion; a 28-day window opens.
    platform
        .lifecycle
        .request_organization_deletion(organization.id(), owner, Some("moving on".to_owned()))
        .await
        .expect("request should succeed");

    // Day 27: recovery succeeds and clears every deletion field.
    platform.clock.advance(Duration::days(27));
    let recovered = platform
        .lifecycle
        .recover_organization(organization.id(), owner)
        .await
        .expect("recovery inside the window should succeed");
    assert!(!recovered.lifecycle().is_pending_deletion());
    assert!(recovered.lifecycle().schedule().is_none());

    // The owner schedules deletion again.
    platform
        .lifecycle
        .request_organization_deletion(organization.id(), owner, None)
        .await
        .expect("second request should succeed");

    // Day 29 relative to the new request: recovery fails, the reaper
    // removes Acme and its workspaces.
    platform.clock.advance(Duration::days(29));
    let late = platform
        .lifecycle
        .recover_organization(organization.id(), owner)
        .await;
    assert!(matches!(
        late,
        Err(HierarchyServiceError::Domain(
            HierarchyDomainError::WindowExpired { .. }
        ))
    ));

    let report = platform.reaper.sweep().await;
    assert_eq!(report.purged, 1);
    assert!(
        platform
            .organizations
            .get(organization.id())
            .await
            .is_err()
    );
    assert!(platform.workspaces.get(workspace.id()).await.is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_deletion_requests_conflict() {
    let platform = Platform::new();
    let owner = UserId::new();
    let (organization, _, _) = platform.seed_tree(owner).await;

    platform
        .lifecycle
        .request_organization_deletion(organization.id(), owner, None)
        .await
        .expect("first request should succeed");
    let second = platform
        .lifecycle
        .request_organization_deletion(organization.id(), owner, None)
        .await;

    assert!(matches!(
        second,
        Err(HierarchyServiceError::Domain(
            HierarchyDomainError::AlreadyScheduled { .. }
        ))
    ));
    if let Err(err) = second {
        assert_eq!(err.kind(), Some(ErrorKind::Conflict));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn workspace_window_is_shorter_than_the_organization_window() {
    let platform = Platform::new();
    let owner = UserId::new();
    let (_, workspace, _) = platform.seed_tree(owner).await;

    platform
        .lifecycle
        .request_workspace_deletion(workspace.id(), owner, None)
        .await
        .expect("request should succeed");

    // Day 11: still recoverable.
    platform.clock.advance(Duration::days(11));
    platform
        .lifecycle
        .recover_workspace(workspace.id(), owner)
        .await
        .expect("recovery inside the 12-day window should succeed");

    platform
        .lifecycle
        .request_workspace_deletion(workspace.id(), owner, None)
        .await
        .expect("second request should succeed");

    // Day 12 of the new window: expired.
    platform.clock.advance(Duration::days(12));
    let late = platform
        .lifecycle
        .recover_workspace(workspace.id(), owner)
        .await;
    assert!(matches!(
        late,
        Err(HierarchyServiceError::Domain(
            HierarchyDomainError::WindowExpired { .. }
        ))
    ));
}
