//! Unit tests for the invitation module.

mod support;
mod workflow_tests;
