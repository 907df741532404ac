//! In-memory integration tests over the public API.
//!
//! Tests are organized into modules by flow:
//! - `lifecycle_flow_tests`: Soft delete, recovery windows, reaper sweeps
//! - `invitation_flow_tests`: Issue-to-membership onboarding
//! - `progress_flow_tests`: Derived progress across task operations
//! - `access_flow_tests`: Role checks and evaluation ordering

mod in_memory {
    pub mod helpers;

    mod access_flow_tests;
    mod invitation_flow_tests;
    mod lifecycle_flow_tests;
    mod progress_flow_tests;
}
