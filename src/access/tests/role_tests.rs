//! Role enum round-trip and ranking tests.

use crate::access::domain::{OrganizationRole, ProjectRole, WorkspaceRole};
use rstest::rstest;

#[rstest]
#[case(OrganizationRole::Owner, "owner")]
#[case(OrganizationRole::Admin, "admin")]
#[case(OrganizationRole::Member, "member")]
fn organization_role_round_trips(#[case] role: OrganizationRole, #[case] text: &str) {
    assert_eq!(role.as_str(), text);
    assert_eq!(OrganizationRole::try_from(text).expect("parse"), role);
}

#[rstest]
#[case(WorkspaceRole::Owner, "owner")]
#[case(WorkspaceRole::Admin, "admin")]
#[case(WorkspaceRole::Member, "member")]
fn workspace_role_round_trips(#[case] role: WorkspaceRole, #[case] text: &str) {
    assert_eq!(role.as_str(), text);
    assert_eq!(WorkspaceRole::try_from(text).expect("parse"), role);
}

#[rstest]
#[case(ProjectRole::Owner, "owner")]
#[case(ProjectRole::Admin, "admin")]
#[case(ProjectRole::Manager, "manager")]
#[case(ProjectRole::Member, "member")]
#[case(ProjectRole::Viewer, "viewer")]
fn project_role_round_trips(#[case] role: ProjectRole, #[case] text: &str) {
    assert_eq!(role.as_str(), text);
    assert_eq!(ProjectRole::try_from(text).expect("parse"), role);
}

#[test]
fn parse_is_case_and_whitespace_tolerant() {
    assert_eq!(
        OrganizationRole::try_from("  OWNER ").expect("parse"),
        OrganizationRole::Owner
    );
}

#[test]
fn parse_rejects_unknown_role() {
    assert!(OrganizationRole::try_from("superuser").is_err());
    assert!(ProjectRole::try_from("").is_err());
}

#[test]
fn organization_authority_orders_owner_first() {
    assert!(OrganizationRole::Owner.authority() > OrganizationRole::Admin.authority());
    assert!(OrganizationRole::Admin.authority() > OrganizationRole::Member.authority());
}

#[test]
fn viewer_cannot_edit_tasks() {
    assert!(!ProjectRole::Viewer.can_edit_tasks());
    assert!(ProjectRole::Member.can_edit_tasks());
}
