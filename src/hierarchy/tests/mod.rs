//! Unit tests for the hierarchy module.
//!
//! Tests are organised by concern: pure domain behaviour, derived
//! aggregates, membership operations, the soft-delete lifecycle with its
//! cascades, task orchestration, and the reaper.

mod lifecycle_tests;
mod progress_tests;
mod support;
