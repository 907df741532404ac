//! Role checks and evaluation ordering, end to end.

use super::helpers::Platform;
use aalto::access::domain::{AccessError, MembershipError, OrganizationRole, UserId};
use aalto::hierarchy::domain::HierarchyDomainError;
use aalto::hierarchy::services::{CreateTaskRequest, HierarchyServiceError};
use aalto::taxonomy::ErrorKind;

#[tokio::test(flavor = "multi_thread")]
async fn the_owner_invariant_holds_through_the_public_api() {
    let platform = Platform::new();
    let owner = UserId::new();
    let admin = UserId::new();
    let (organization, _, _) = platform.seed_tree(owner).await;
    platform
        .membership
        .add_organization_member(organization.id(), owner, admin, OrganizationRole::Admin)
        .await
        .expect("add should succeed");

    // Even another admin cannot touch the owner record.
    let removal = platform
        .membership
        .remove_organization_member(organization.id(), admin, owner)
        .await;
    assert!(matches!(
        removal,
        Err(HierarchyServiceError::Membership(
            MembershipError::OwnerImmutable(_)
        ))
    ));

    let stored = platform
        .organizations
        .get(organization.id())
        .await
        .expect("organization should exist");
    let owners = stored
        .members()
        .records()
        .iter()
        .filter(|record| record.role() == OrganizationRole::Owner)
        .count();
    assert_eq!(owners, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn authorization_is_evaluated_before_the_lock_guard() {
    let platform = Platform::new();
    let owner = UserId::new();
    let stranger = UserId::new();
    let (_, _, project) = platform.seed_tree(owner).await;

    platform
        .projects
        .lock(project.id(), owner)
        .await
        .expect("lock should succeed");

    // Unauthorized actor: permission error, not the lock.
    let denied = platform
        .tasks
        .create(CreateTaskRequest::new(project.id(), "nope"), stranger)
        .await;
    let Err(denied) = denied else {
        panic!("creation should be denied");
    };
    assert_eq!(denied.kind(), Some(ErrorKind::Forbidden));
    assert!(matches!(
        denied,
        HierarchyServiceError::Access(AccessError::NotAMember(_))
    ));

    // Authorized owner: the lock error.
    let locked = platform
        .tasks
        .create(CreateTaskRequest::new(project.id(), "still nope"), owner)
        .await;
    let Err(locked) = locked else {
        panic!("creation should be blocked by the lock");
    };
    assert_eq!(locked.kind(), Some(ErrorKind::LockedResource));
    assert!(matches!(
        locked,
        HierarchyServiceError::Domain(HierarchyDomainError::ProjectLocked { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn organization_names_are_unique() {
    let platform = Platform::new();
    let owner = UserId::new();
    platform.seed_tree(owner).await;

    let duplicate = platform.organizations.create("Acme", UserId::new()).await;
    let Err(duplicate) = duplicate else {
        panic!("duplicate name should be rejected");
    };
    assert_eq!(duplicate.kind(), Some(ErrorKind::Conflict));
}

#[tokio::test(flavor = "multi_thread")]
async fn workspace_creation_requires_organization_rank() {
    let platform = Platform::new();
    let owner = UserId::new();
    let member = UserId::new();
    let (organization, _, _) = platform.seed_tree(owner).await;
    platform
        .membership
        .add_organization_member(organization.id(), owner, member, OrganizationRole::Member)
        .await
        .expect("add should succeed");

    let denied = platform
        .workspaces
        .create(organization.id(), "Skunkworks", member)
        .await;
    assert!(matches!(
        denied,
        Err(HierarchyServiceError::Access(
            AccessError::InsufficientRole { .. }
        ))
    ));
}
