//! Aalto: hierarchy lifecycle and access control core for a multi-tenant
//! project-management platform.
//!
//! The platform organises work as a strict containment hierarchy:
//! Organization → Workspace → Project → Task → Subtask/Note. This crate
//! implements the rules that cut across every mutation of that hierarchy:
//! role-based access control, soft deletion with time-boxed recovery windows
//! and cascading permanent deletion, invitation-token membership onboarding,
//! and derived-aggregate recomputation (project progress, task counts).
//!
//! # Architecture
//!
//! Aalto follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory; durable
//!   datastores implement the same ports out of tree)
//!
//! # Modules
//!
//! - [`access`]: Identity, per-entity role sets, membership records, and the
//!   access control evaluator
//! - [`hierarchy`]: The containment hierarchy, lifecycle manager, aggregate
//!   recalculator, and scheduled reaper
//! - [`invitation`]: Single-use, expiring invitation tokens and the
//!   membership onboarding workflow
//! - [`taxonomy`]: The error-kind taxonomy exposed to transport layers
//! - [`clock`]: Injectable clock support for deterministic scheduling tests

pub mod access;
pub mod clock;
pub mod hierarchy;
pub mod invitation;
pub mod taxonomy;
