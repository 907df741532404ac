//! Access control evaluation.
//!
//! The evaluator is a pure function from (actor, membership list, required
//! roles) to an allow/deny decision; it performs no I/O and mutates
//! nothing. Services call it after resolving the target entity and before
//! any business-state guard, so an unauthorized actor always sees a
//! permission error rather than a lock or lifecycle error.

use super::{MemberList, Role, UserId};
use thiserror::Error;

/// Reasons an access check denies an operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    /// The target entity does not exist.
    #[error("entity not found")]
    EntityNotFound,

    /// The actor holds no membership on the target entity.
    #[error("user {0} is not a member of the target entity")]
    NotAMember(UserId),

    /// The actor is a member but holds none of the required roles.
    #[error("user {user} holds role '{held}', operation requires one of [{required}]")]
    InsufficientRole {
        /// The denied actor.
        user: UserId,
        /// The role the actor holds on the entity.
        held: &'static str,
        /// Comma-separated list of accepted roles.
        required: String,
    },
}

/// Evaluates whether the actor may perform an operation on the entity that
/// carries `members`.
///
/// An empty `required` slice accepts any member, which is how read-level
/// operations express "membership is enough".
///
/// # Errors
///
/// Returns [`AccessError::NotAMember`] when the actor holds no record and
/// [`AccessError::InsufficientRole`] when the held role is not in
/// `required`.
pub fn evaluate<R: Role>(
    actor: UserId,
    members: &MemberList<R>,
    required: &[R],
) -> Result<(), AccessError> {
    let held = members
        .role_of(actor)
        .ok_or(AccessError::NotAMember(actor))?;

    if required.is_empty() || required.contains(&held) {
        return Ok(());
    }

    Err(AccessError::InsufficientRole {
        user: actor,
        held: held.as_str(),
        required: required
            .iter()
            .map(|role| role.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Evaluates access against an entity that may not exist.
///
/// # Errors
///
/// Returns [`AccessError::EntityNotFound`] when `members` is `None`, and
/// otherwise behaves as [`evaluate`].
pub fn evaluate_entity<R: Role>(
    actor: UserId,
    members: Option<&MemberList<R>>,
    required: &[R],
) -> Result<(), AccessError> {
    let members = members.ok_or(AccessError::EntityNotFound)?;
    evaluate(actor, members, required)
}
