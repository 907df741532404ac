//! Notification port for overdue-task reminders.

use crate::access::domain::UserId;
use crate::hierarchy::domain::Task;
use async_trait::async_trait;
use thiserror::Error;

/// Error returned when a notification cannot be delivered.
///
/// Delivery failures are logged by callers and never roll back the state
/// transition that triggered the notification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("notification delivery failed: {0}")]
pub struct NotifierError(pub String);

/// Outbound email contract for overdue-task reminders.
#[async_trait]
pub trait OverdueNotifier: Send + Sync {
    /// Sends an overdue reminder for `task` to its assignee.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError`] when delivery fails; callers log and
    /// continue.
    async fn send_overdue_task_email(&self, user: UserId, task: &Task) -> Result<(), NotifierError>;
}
