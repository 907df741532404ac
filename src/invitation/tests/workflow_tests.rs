//! Invitation workflow tests: issue, accept, reject, revoke.

use super::support::Harness;
use crate::access::domain::{AccessError, OrganizationRole, UserId};
use crate::invitation::domain::{InvitationDomainError, InvitationStatus};
use crate::invitation::ports::OrganizationGateway;
use crate::invitation::services::{InvitationWorkflowError, IssueInvitationRequest};
use crate::taxonomy::ErrorKind;
use chrono::Duration;
use mockable::Clock;

fn request(harness: &Harness, email: &str) -> IssueInvitationRequest {
    IssueInvitationRequest::new(
        harness.organization.id(),
        email,
        OrganizationRole::Member,
        harness.owner,
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn issue_stores_the_hash_and_emails_the_raw_token() {
    let harness = Harness::new().await;

    let issued = harness
        .workflow
        .issue(request(&harness, "Bob@X.com").with_message("welcome"))
        .await
        .expect("issue should succeed");

    // Only the hash is persisted; the raw token travels in the email.
    assert_eq!(issued.invitation.email().as_str(), "bob@x.com");
    assert_ne!(issued.invitation.token_hash().as_str(), issued.raw_token);
    assert_eq!(issued.invitation.status(), InvitationStatus::Pending);

    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(
        sent.first()
            .is_some_and(|email| email.raw_token == issued.raw_token
                && email.organization_name == "Acme")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn issue_requires_an_admin_inviter() {
    let harness = Harness::new().await;
    let outsider = UserId::new();

    let result = harness
        .workflow
        .issue(IssueInvitationRequest::new(
            harness.organization.id(),
            "bob@x.com",
            OrganizationRole::Member,
            outsider,
        ))
        .await;
    assert!(matches!(
        result,
        Err(InvitationWorkflowError::Access(AccessError::NotAMember(_)))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn issue_rejects_existing_members() {
    let harness = Harness::new().await;
    let member = harness.register("carol@x.com");
    harness
        .store
        .add_member_if_absent(
            harness.organization.id(),
            member,
            OrganizationRole::Member,
            harness.clock.utc(),
        )
        .await
        .expect("member insert should succeed");

    let result = harness.workflow.issue(request(&harness, "carol@x.com")).await;
    assert!(matches!(
        result,
        Err(InvitationWorkflowError::AlreadyMember { .. })
    ));
    if let Err(err) = result {
        assert_eq!(err.kind(), Some(ErrorKind::Conflict));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn issue_rejects_duplicate_pending_invitations() {
    let harness = Harness::new().await;

    harness
        .workflow
        .issue(request(&harness, "bob@x.com"))
        .await
        .expect("first issue should succeed");
    let second = harness.workflow.issue(request(&harness, "bob@x.com")).await;
    assert!(matches!(
        second,
        Err(InvitationWorkflowError::DuplicatePending { .. })
    ));

    // Once the pending invitation expires, reissue is allowed.
    harness.clock.advance(Duration::days(8));
    harness
        .workflow
        .issue(request(&harness, "bob@x.com"))
        .await
        .expect("reissue after expiry should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn accept_adds_the_matching_actor_exactly_once() {
    let harness = Harness::new().await;
    let bob = harness.register("bob@x.com");

    let issued = harness
        .workflow
        .issue(request(&harness, "bob@x.com"))
        .await
        .expect("issue should succeed");

    let organization = harness
        .workflow
        .accept(&issued.raw_token, Some(bob))
        .await
        .expect("accept should succeed");
    assert_eq!(organization, harness.organization.id());

    let role = harness
        .store
        .role_of(harness.organization.id(), bob)
        .await
        .expect("role lookup should succeed");
    assert_eq!(role, Some(OrganizationRole::Member));

    // Double-accept: the second call reports the terminal state and the
    // membership stays single.
    let second = harness.workflow.accept(&issued.raw_token, Some(bob)).await;
    assert!(matches!(
        second,
        Err(InvitationWorkflowError::Domain(
            InvitationDomainError::InvalidState(InvitationStatus::Accepted)
        ))
    ));
    let members = harness
        .store
        .find_summary(harness.organization.id())
        .await
        .expect("summary lookup should succeed");
    assert!(members.is_some());
    let role = harness
        .store
        .role_of(harness.organization.id(), bob)
        .await
        .expect("role lookup should succeed");
    assert_eq!(role, Some(OrganizationRole::Member));
}

#[tokio::test(flavor = "multi_thread")]
async fn accept_with_the_wrong_identity_fails_email_mismatch() {
    let harness = Harness::new().await;
    let eve = harness.register("eve@x.com");

    let issued = harness
        .workflow
        .issue(request(&harness, "bob@x.com"))
        .await
        .expect("issue should succeed");

    let result = harness.workflow.accept(&issued.raw_token, Some(eve)).await;
    assert!(matches!(result, Err(InvitationWorkflowError::EmailMismatch)));
    if let Err(err) = result {
        assert_eq!(err.kind(), Some(ErrorKind::Forbidden));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn email_match_is_case_insensitive() {
    let harness = Harness::new().await;
    let bob = harness.register("BOB@X.COM");

    let issued = harness
        .workflow
        .issue(request(&harness, "bob@x.com"))
        .await
        .expect("issue should succeed");

    harness
        .workflow
        .accept(&issued.raw_token, Some(bob))
        .await
        .expect("case difference should not block acceptance");
}

#[tokio::test(flavor = "multi_thread")]
async fn accept_past_the_deadline_fails_and_expires_the_record() {
    let harness = Harness::new().await;
    let bob = harness.register("bob@x.com");

    let issued = harness
        .workflow
        .issue(request(&harness, "bob@x.com"))
        .await
        .expect("issue should succeed");

    harness.clock.advance(Duration::days(7));
    let result = harness.workflow.accept(&issued.raw_token, Some(bob)).await;
    assert!(matches!(
        result,
        Err(InvitationWorkflowError::Expired { .. })
    ));
    if let Err(err) = result {
        assert_eq!(err.kind(), Some(ErrorKind::Expired));
    }

    // The record is now terminal, so a later attempt reports the state.
    let second = harness.workflow.accept(&issued.raw_token, Some(bob)).await;
    assert!(matches!(
        second,
        Err(InvitationWorkflowError::Domain(
            InvitationDomainError::InvalidState(InvitationStatus::Expired)
        ))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn accept_with_an_unknown_token_fails_not_found() {
    let harness = Harness::new().await;
    let result = harness.workflow.accept("not-a-real-token", None).await;
    assert!(matches!(result, Err(InvitationWorkflowError::UnknownToken)));
    if let Err(err) = result {
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn accept_without_an_actor_consumes_without_membership() {
    let harness = Harness::new().await;
    let issued = harness
        .workflow
        .issue(request(&harness, "bob@x.com"))
        .await
        .expect("issue should succeed");

    harness
        .workflow
        .accept(&issued.raw_token, None)
        .await
        .expect("anonymous accept should succeed");

    let listed = harness
        .workflow
        .list_for_organization(harness.organization.id(), harness.owner)
        .await
        .expect("listing should succeed");
    assert!(
        listed
            .iter()
            .any(|invitation| invitation.status() == InvitationStatus::Accepted
                && invitation.accepted_by().is_none())
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn reject_requires_the_matching_actor_and_touches_no_membership() {
    let harness = Harness::new().await;
    let bob = harness.register("bob@x.com");

    let issued = harness
        .workflow
        .issue(request(&harness, "bob@x.com"))
        .await
        .expect("issue should succeed");

    harness
        .workflow
        .reject(&issued.raw_token, bob)
        .await
        .expect("reject should succeed");

    let role = harness
        .store
        .role_of(harness.organization.id(), bob)
        .await
        .expect("role lookup should succeed");
    assert_eq!(role, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn revoke_is_limited_to_the_inviter_or_an_admin() {
    let harness = Harness::new().await;
    let outsider = UserId::new();

    let issued = harness
        .workflow
        .issue(request(&harness, "bob@x.com"))
        .await
        .expect("issue should succeed");

    let denied = harness
        .workflow
        .revoke(issued.invitation.id(), outsider)
        .await;
    assert!(matches!(
        denied,
        Err(InvitationWorkflowError::Access(AccessError::NotAMember(_)))
    ));

    harness
        .workflow
        .revoke(issued.invitation.id(), harness.owner)
        .await
        .expect("inviter revoke should succeed");

    let listed = harness
        .workflow
        .list_for_organization(harness.organization.id(), harness.owner)
        .await
        .expect("listing should succeed");
    assert!(
        listed
            .iter()
            .any(|invitation| invitation.status() == InvitationStatus::Revoked)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn issue_survives_a_failing_mailer() {
    let harness = Harness::new().await;
    harness.notifier.set_failing(true);

    let issued = harness
        .workflow
        .issue(request(&harness, "bob@x.com"))
        .await
        .expect("issue should succeed despite delivery failure");

    // The invitation stands; only the email was lost.
    let listed = harness
        .workflow
        .list_for_organization(harness.organization.id(), harness.owner)
        .await
        .expect("listing should succeed");
    assert!(
        listed
            .iter()
            .any(|invitation| invitation.id() == issued.invitation.id())
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn owner_role_cannot_be_granted_by_invitation() {
    let harness = Harness::new().await;
    let result = harness
        .workflow
        .issue(IssueInvitationRequest::new(
            harness.organization.id(),
            "bob@x.com",
            OrganizationRole::Owner,
            harness.owner,
        ))
        .await;
    assert!(matches!(
        result,
        Err(InvitationWorkflowError::OwnerRoleReserved)
    ));
}
