//! Injectable clock support.
//!
//! Every "now" comparison in the crate goes through [`mockable::Clock`] so
//! that expiry and scheduling logic is deterministic under test. Production
//! wiring uses [`mockable::DefaultClock`]; tests that span recovery windows
//! or token lifetimes use [`FixedClock`] and advance it explicitly instead
//! of waiting on the wall clock.

use chrono::{DateTime, Duration, Local, Utc};
use std::sync::{Arc, PoisonError, RwLock};

pub use mockable::{Clock, DefaultClock};

/// Clock that reports a programmable instant.
///
/// Clones share the instant, so a test can hold one handle while services
/// hold another and still move time forward between assertions.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedClock {
    /// Creates a clock frozen at the given instant.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    /// Replaces the reported instant.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write().unwrap_or_else(PoisonError::into_inner) = now;
    }

    /// Moves the reported instant forward (or backward, with a negative
    /// duration).
    pub fn advance(&self, delta: Duration) {
        let mut guard = self.now.write().unwrap_or_else(PoisonError::into_inner);
        *guard += delta;
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(PoisonError::into_inner)
    }
}
