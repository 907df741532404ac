//! Unit tests for the access module.
//!
//! Tests are organised by domain concept, covering happy paths, error cases,
//! and edge cases for all public APIs.

mod evaluator_tests;
mod role_tests;
