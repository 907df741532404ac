//! Derived aggregates computed from a project's task set.

use super::{Task, TaskStatus};
use chrono::{DateTime, Utc};

/// Computes the progress percentage for a project.
///
/// `round(100 × completed / total)`, or 0 for an empty task set. Integer
/// arithmetic throughout; `completed > total` is clamped rather than
/// trusted.
#[must_use]
pub fn progress(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    let rounded = (100 * completed + total / 2) / total;
    u8::try_from(rounded).unwrap_or(100)
}

/// Status-bucket counts over a project's tasks.
///
/// Computed on read for task-listing views and never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    /// Tasks not yet started.
    pub pending: usize,
    /// Tasks being worked on.
    pub in_progress: usize,
    /// Finished tasks.
    pub completed: usize,
    /// Tasks due on the current UTC calendar day.
    pub due_today: usize,
    /// Tasks past their due date and not completed.
    pub overdue: usize,
    /// Tasks with at least one subtask.
    pub with_subtasks: usize,
    /// Tasks without subtasks.
    pub without_subtasks: usize,
}

impl TaskCounts {
    /// Returns the total number of counted tasks.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.pending + self.in_progress + self.completed
    }
}

/// Tallies status buckets and schedule buckets over `tasks` as of `now`.
#[must_use]
pub fn count_tasks(tasks: &[Task], now: DateTime<Utc>) -> TaskCounts {
    let mut counts = TaskCounts::default();
    for task in tasks {
        match task.status() {
            TaskStatus::Pending => counts.pending += 1,
            TaskStatus::InProgress => counts.in_progress += 1,
            TaskStatus::Completed => counts.completed += 1,
        }
        if task.is_due_today(now) {
            counts.due_today += 1;
        }
        if task.is_overdue(now) {
            counts.overdue += 1;
        }
        if task.has_subtasks() {
            counts.with_subtasks += 1;
        } else {
            counts.without_subtasks += 1;
        }
    }
    counts
}
