//! End-to-end invitation onboarding flows.

use super::helpers::Platform;
use aalto::access::domain::{EmailAddress, OrganizationRole, UserId};
use aalto::invitation::services::{InvitationWorkflowError, IssueInvitationRequest};
use chrono::Duration;

fn register(platform: &Platform, email: &str) -> UserId {
    let user = UserId::new();
    platform
        .directory
        .register(user, EmailAddress::new(email).expect("valid address"))
        .expect("registration should succeed");
    user
}

#[tokio::test(flavor = "multi_thread")]
async fn invited_user_becomes_a_member_and_can_work() {
    let platform = Platform::new();
    let owner = UserId::new();
    let (organization, _, _) = platform.seed_tree(owner).await;
    let dana = register(&platform, "dana@x.com");

    let issued = platform
        .invitations
        .issue(
            IssueInvitationRequest::new(
                organization.id(),
                "dana@x.com",
                OrganizationRole::Admin,
                owner,
            )
            .with_message("welcome aboard"),
        )
        .await
        .expect("issue should succeed");

    // The raw token reached Dana by email and nowhere else.
    let outbox = platform.mailer.sent();
    assert!(
        outbox
            .iter()
            .any(|email| email.raw_token == issued.raw_token && email.organization_name == "Acme")
    );

    let joined = platform
        .invitations
        .accept(&issued.raw_token, Some(dana))
        .await
        .expect("accept should succeed");
    assert_eq!(joined, organization.id());

    // The new admin's role is live immediately: she can open a workspace.
    platform
        .workspaces
        .create(organization.id(), "Dana's Workspace", dana)
        .await
        .expect("the new admin should be able to create workspaces");
}

#[tokio::test(flavor = "multi_thread")]
async fn expiry_scenario_for_bob() {
    let platform = Platform::new();
    let owner = UserId::new();
    let (organization, _, _) = platform.seed_tree(owner).await;
    let eve = register(&platform, "eve@x.com");
    let bob = register(&platform, "bob@x.com");

    let issued = platform
        .invitations
        .issue(IssueInvitationRequest::new(
            organization.id(),
            "bob@x.com",
            OrganizationRole::Member,
            owner,
        ))
        .await
        .expect("issue should succeed");

    // Eve cannot redeem Bob's invitation.
    let mismatch = platform
        .invitations
        .accept(&issued.raw_token, Some(eve))
        .await;
    assert!(matches!(
        mismatch,
        Err(InvitationWorkflowError::EmailMismatch)
    ));

    // Bob waits out the 7-day TTL; the token is gone for good.
    platform.clock.advance(Duration::days(7));
    let expired = platform
        .invitations
        .accept(&issued.raw_token, Some(bob))
        .await;
    assert!(matches!(
        expired,
        Err(InvitationWorkflowError::Expired { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn double_accept_never_duplicates_membership() {
    let platform = Platform::new();
    let owner = UserId::new();
    let (organization, _, _) = platform.seed_tree(owner).await;
    let bob = register(&platform, "bob@x.com");

    let issued = platform
        .invitations
        .issue(IssueInvitationRequest::new(
            organization.id(),
            "bob@x.com",
            OrganizationRole::Member,
            owner,
        ))
        .await
        .expect("issue should succeed");

    platform
        .invitations
        .accept(&issued.raw_token, Some(bob))
        .await
        .expect("first accept should succeed");
    let second = platform
        .invitations
        .accept(&issued.raw_token, Some(bob))
        .await;
    assert!(second.is_err());

    let stored = platform
        .organizations
        .get(organization.id())
        .await
        .expect("organization should exist");
    let records = stored
        .members()
        .records()
        .iter()
        .filter(|record| record.user() == bob)
        .count();
    assert_eq!(records, 1);
}
