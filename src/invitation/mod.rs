//! Invitation-token membership onboarding.
//!
//! Organizations invite people by email. Each invitation binds an email
//! address to a prospective role, carries a single-use token (persisted
//! only as a SHA-256 hash), and expires seven days after issue. Every
//! transition out of the pending state is terminal. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
