//! In-memory adapters for invitation ports.
//!
//! The repository backs tests; the directory and notifier double as the
//! identity and email boundaries, recording what crossed them.

mod directory;
mod notifier;
mod repository;

pub use directory::InMemoryDirectory;
pub use notifier::{RecordingInvitationNotifier, SentInvitationEmail};
pub use repository::InMemoryInvitationRepository;
