//! In-memory adapters for hierarchy persistence.
//!
//! One shared store backs every repository port plus the purge executor,
//! so a purge plan is applied under a single write lock and readers never
//! observe a partial cascade. The store doubles as the test double for
//! every service in the crate.

mod gateway;
mod notifier;
mod organization;
mod project;
mod store;
mod task;
mod workspace;

pub use notifier::{RecordingOverdueNotifier, SentOverdueReminder};
pub use store::InMemoryHierarchy;
