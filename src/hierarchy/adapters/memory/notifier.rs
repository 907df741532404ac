//! Recording in-memory overdue notifier.

use crate::access::domain::UserId;
use crate::hierarchy::domain::{Task, TaskId};
use crate::hierarchy::ports::{NotifierError, OverdueNotifier};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// One recorded overdue reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentOverdueReminder {
    /// Who was reminded.
    pub user: UserId,
    /// The overdue task.
    pub task: TaskId,
}

/// Notifier double that records every reminder and can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingOverdueNotifier {
    sent: Arc<Mutex<Vec<SentOverdueReminder>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingOverdueNotifier {
    /// Creates a notifier that accepts every send.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent sends fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns the recorded reminders.
    #[must_use]
    pub fn sent(&self) -> Vec<SentOverdueReminder> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl OverdueNotifier for RecordingOverdueNotifier {
    async fn send_overdue_task_email(
        &self,
        user: UserId,
        task: &Task,
    ) -> Result<(), NotifierError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifierError("smtp unavailable".to_owned()));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentOverdueReminder {
                user,
                task: task.id(),
            });
        Ok(())
    }
}
