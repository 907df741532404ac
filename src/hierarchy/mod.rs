//! The containment hierarchy and its lifecycle engine.
//!
//! Organizations contain workspaces, workspaces contain projects, projects
//! contain tasks, and tasks contain subtasks and notes. This module owns
//! the aggregates themselves plus the cross-cutting machinery around them:
//! the membership store services, soft-delete lifecycle management with
//! cascading permanent deletion, the progress recalculator, and the
//! scheduled reaper. The module follows hexagonal architecture:
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
