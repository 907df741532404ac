//! Task aggregate root and its child records.

use super::{EntityName, HierarchyDomainError, NoteId, ParseStatusError, Priority, ProjectId, SubtaskId, TaskId};
use crate::access::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started.
    Pending,
    /// Being worked on.
    InProgress,
    /// Finished.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseStatusError(value.to_owned())),
        }
    }
}

/// Child record splitting a task into checkable steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    id: SubtaskId,
    task: TaskId,
    title: EntityName,
    done: bool,
    created_at: DateTime<Utc>,
}

impl Subtask {
    /// Creates a new open subtask under `task`.
    #[must_use]
    pub fn new(task: TaskId, title: EntityName, clock: &impl Clock) -> Self {
        Self {
            id: SubtaskId::new(),
            task,
            title,
            done: false,
            created_at: clock.utc(),
        }
    }

    /// Returns the subtask identifier.
    #[must_use]
    pub const fn id(&self) -> SubtaskId {
        self.id
    }

    /// Returns the parent task identifier.
    #[must_use]
    pub const fn task(&self) -> TaskId {
        self.task
    }

    /// Returns the subtask title.
    #[must_use]
    pub const fn title(&self) -> &EntityName {
        &self.title
    }

    /// Returns whether the subtask is checked off.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Checks the subtask off.
    pub const fn complete(&mut self) {
        self.done = true;
    }
}

/// Free-form comment attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    id: NoteId,
    task: TaskId,
    author: UserId,
    body: String,
    created_at: DateTime<Utc>,
}

impl Note {
    /// Creates a new note under `task`.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyDomainError::EmptyNoteBody`] when the body is
    /// empty after trimming.
    pub fn new(
        task: TaskId,
        author: UserId,
        body: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, HierarchyDomainError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(HierarchyDomainError::EmptyNoteBody);
        }
        Ok(Self {
            id: NoteId::new(),
            task,
            author,
            body,
            created_at: clock.utc(),
        })
    }

    /// Returns the note identifier.
    #[must_use]
    pub const fn id(&self) -> NoteId {
        self.id
    }

    /// Returns the parent task identifier.
    #[must_use]
    pub const fn task(&self) -> TaskId {
        self.task
    }

    /// Returns the authoring user.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the note body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// File reference carried by a task.
///
/// Upload and storage of the file itself happen at an external boundary;
/// the task only records what was attached, by whom, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    file_name: String,
    uploaded_by: UserId,
    uploaded_at: DateTime<Utc>,
}

impl Attachment {
    /// Creates an attachment record.
    #[must_use]
    pub fn new(file_name: impl Into<String>, uploaded_by: UserId, clock: &impl Clock) -> Self {
        Self {
            file_name: file_name.into(),
            uploaded_by,
            uploaded_at: clock.utc(),
        }
    }

    /// Returns the attached file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the uploading user.
    #[must_use]
    pub const fn uploaded_by(&self) -> UserId {
        self.uploaded_by
    }

    /// Returns the upload timestamp.
    #[must_use]
    pub const fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }
}

/// Fourth-level aggregate: a unit of work inside a project.
///
/// The reporter is required and permanent; assignment is optional and
/// mutable. `completed_at` is set exactly once, on the first transition
/// into [`TaskStatus::Completed`], and survives later reopenings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project: ProjectId,
    title: EntityName,
    assigned_to: Option<UserId>,
    reporter: UserId,
    status: TaskStatus,
    priority: Priority,
    due_date: Option<DateTime<Utc>>,
    subtasks: Vec<SubtaskId>,
    notes: Vec<NoteId>,
    attachments: Vec<Attachment>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl Task {
    /// Creates a new pending task reported by `reporter`.
    #[must_use]
    pub fn new(
        project: ProjectId,
        title: EntityName,
        reporter: UserId,
        assigned_to: Option<UserId>,
        priority: Priority,
        due_date: Option<DateTime<Utc>>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            project,
            title,
            assigned_to,
            reporter,
            status: TaskStatus::Pending,
            priority,
            due_date,
            subtasks: Vec::new(),
            notes: Vec::new(),
            attachments: Vec::new(),
            completed_at: None,
            created_at: timestamp,
            updated_at: timestamp,
            version: 1,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the parent project identifier.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &EntityName {
        &self.title
    }

    /// Returns the assigned user, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the reporting user.
    #[must_use]
    pub const fn reporter(&self) -> UserId {
        self.reporter
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the attached subtask identifiers.
    #[must_use]
    pub fn subtasks(&self) -> &[SubtaskId] {
        &self.subtasks
    }

    /// Returns the attached note identifiers.
    #[must_use]
    pub fn notes(&self) -> &[NoteId] {
        &self.notes
    }

    /// Returns the attachment records.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Returns when the task first completed, if ever.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the optimistic concurrency version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Advances the version counter; called by repositories on successful
    /// update.
    pub const fn bump_version(&mut self) {
        self.version += 1;
    }

    /// Moves the task to a new status.
    ///
    /// The first transition into [`TaskStatus::Completed`] stamps
    /// `completed_at`; the stamp is kept unchanged by any later
    /// transition, including re-completion after reopening.
    pub fn change_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        if status == TaskStatus::Completed && self.completed_at.is_none() {
            self.completed_at = Some(clock.utc());
        }
        self.touch(clock);
    }

    /// Changes the priority.
    pub fn set_priority(&mut self, priority: Priority, clock: &impl Clock) {
        self.priority = priority;
        self.touch(clock);
    }

    /// Changes the assignee; `None` unassigns.
    pub fn assign(&mut self, assignee: Option<UserId>, clock: &impl Clock) {
        self.assigned_to = assignee;
        self.touch(clock);
    }

    /// Changes the due date; `None` clears it.
    pub fn set_due_date(&mut self, due_date: Option<DateTime<Utc>>, clock: &impl Clock) {
        self.due_date = due_date;
        self.touch(clock);
    }

    /// Records a newly created subtask.
    pub fn attach_subtask(&mut self, subtask: SubtaskId, clock: &impl Clock) {
        if !self.subtasks.contains(&subtask) {
            self.subtasks.push(subtask);
            self.touch(clock);
        }
    }

    /// Records a newly created note.
    pub fn attach_note(&mut self, note: NoteId, clock: &impl Clock) {
        if !self.notes.contains(&note) {
            self.notes.push(note);
            self.touch(clock);
        }
    }

    /// Records an attachment.
    pub fn add_attachment(&mut self, attachment: Attachment, clock: &impl Clock) {
        self.attachments.push(attachment);
        self.touch(clock);
    }

    /// Returns whether the task has at least one subtask.
    #[must_use]
    pub fn has_subtasks(&self) -> bool {
        !self.subtasks.is_empty()
    }

    /// Returns whether the task is past its due date and not completed.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date
            .is_some_and(|due| due < now && self.status != TaskStatus::Completed)
    }

    /// Returns whether the task is due on the same UTC calendar day as
    /// `now`.
    #[must_use]
    pub fn is_due_today(&self, now: DateTime<Utc>) -> bool {
        self.due_date
            .is_some_and(|due| due.date_naive() == now.date_naive())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
