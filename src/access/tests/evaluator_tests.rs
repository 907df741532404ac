//! Access control evaluator tests.

use crate::access::domain::{
    AccessError, MemberList, OrganizationRole, UserId, evaluate, evaluate_entity,
};
use chrono::{DateTime, Utc};
use rstest::{fixture, rstest};

fn joined() -> DateTime<Utc> {
    DateTime::<Utc>::MIN_UTC
}

#[fixture]
fn members() -> (UserId, UserId, MemberList<OrganizationRole>) {
    let owner = UserId::new();
    let member = UserId::new();
    let mut list = MemberList::new(owner, OrganizationRole::Owner, joined());
    list.add(member, OrganizationRole::Member, joined())
        .expect("add succeeds");
    (owner, member, list)
}

#[rstest]
fn allows_actor_holding_a_required_role(members: (UserId, UserId, MemberList<OrganizationRole>)) {
    let (owner, _, list) = members;
    let result = evaluate(
        owner,
        &list,
        &[OrganizationRole::Owner, OrganizationRole::Admin],
    );
    assert!(result.is_ok());
}

#[rstest]
fn denies_non_member(members: (UserId, UserId, MemberList<OrganizationRole>)) {
    let (_, _, list) = members;
    let stranger = UserId::new();
    assert_eq!(
        evaluate(stranger, &list, &[OrganizationRole::Member]),
        Err(AccessError::NotAMember(stranger))
    );
}

#[rstest]
fn denies_insufficient_role(members: (UserId, UserId, MemberList<OrganizationRole>)) {
    let (_, member, list) = members;
    let result = evaluate(member, &list, &[OrganizationRole::Owner]);
    assert!(matches!(
        result,
        Err(AccessError::InsufficientRole { user, held: "member", .. }) if user == member
    ));
}

#[rstest]
fn empty_requirement_accepts_any_member(members: (UserId, UserId, MemberList<OrganizationRole>)) {
    let (_, member, list) = members;
    assert!(evaluate(member, &list, &[]).is_ok());
}

#[test]
fn missing_entity_denies_with_entity_not_found() {
    let result = evaluate_entity::<OrganizationRole>(UserId::new(), None, &[]);
    assert_eq!(result, Err(AccessError::EntityNotFound));
}

#[rstest]
fn present_entity_delegates_to_role_check(members: (UserId, UserId, MemberList<OrganizationRole>)) {
    let (owner, _, list) = members;
    assert!(evaluate_entity(owner, Some(&list), &[OrganizationRole::Owner]).is_ok());
}
