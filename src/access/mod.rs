//! Identity and access control for the containment hierarchy.
//!
//! This module is pure domain logic: the closed role sets each entity kind
//! recognises, per-entity membership lists with their uniqueness and
//! owner-immutability invariants, and the evaluator that turns an actor, a
//! membership list, and a role requirement into an allow/deny decision.
//! Roles are never inherited across hierarchy levels; every entity carries
//! its own membership list.

pub mod domain;

#[cfg(test)]
mod tests;
