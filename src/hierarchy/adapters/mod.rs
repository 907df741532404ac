//! Adapter implementations for hierarchy persistence ports.

pub mod memory;
