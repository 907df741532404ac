//! Derived aggregate tests: progress and on-read counts.

use super::support::Harness;
use crate::access::domain::UserId;
use crate::hierarchy::domain::{TaskStatus, progress};
use crate::hierarchy::services::CreateTaskRequest;
use chrono::Duration;
use rstest::rstest;

#[rstest]
#[case(0, 0, 0)]
#[case(0, 4, 0)]
#[case(2, 4, 50)]
#[case(2, 3, 67)]
#[case(1, 3, 33)]
#[case(3, 3, 100)]
#[case(1, 8, 13)]
fn progress_rounds_to_the_nearest_percent(
    #[case] completed: usize,
    #[case] total: usize,
    #[case] expected: u8,
) {
    assert_eq!(progress(completed, total), expected);
}

#[tokio::test(flavor = "multi_thread")]
async fn progress_tracks_creation_completion_and_deletion() {
    let harness = Harness::new();
    let owner = UserId::new();
    let (_, _, project) = harness.seed_tree(owner).await;

    // Four tasks: two completed, one in progress, one pending.
    let first = harness.seed_task(&project, owner, "first").await;
    let second = harness.seed_task(&project, owner, "second").await;
    let third = harness.seed_task(&project, owner, "third").await;
    let fourth = harness.seed_task(&project, owner, "fourth").await;

    harness
        .tasks
        .change_status(first.id(), owner, TaskStatus::Completed)
        .await
        .expect("status change should succeed");
    harness
        .tasks
        .change_status(second.id(), owner, TaskStatus::Completed)
        .await
        .expect("status change should succeed");
    harness
        .tasks
        .change_status(third.id(), owner, TaskStatus::InProgress)
        .await
        .expect("status change should succeed");

    let stored = harness
        .projects
        .get(project.id())
        .await
        .expect("project should exist");
    assert_eq!(stored.progress(), 50);

    // Deleting the pending task leaves 2 of 3 completed.
    harness
        .tasks
        .delete(fourth.id(), owner)
        .await
        .expect("deletion should succeed");
    let stored = harness
        .projects
        .get(project.id())
        .await
        .expect("project should exist");
    assert_eq!(stored.progress(), 67);
}

#[tokio::test(flavor = "multi_thread")]
async fn progress_holds_after_arbitrary_sequences() {
    let harness = Harness::new();
    let owner = UserId::new();
    let (_, _, project) = harness.seed_tree(owner).await;

    let mut ids = Vec::new();
    for index in 0..5 {
        let task = harness
            .seed_task(&project, owner, &format!("task {index}"))
            .await;
        ids.push(task.id());
    }
    for id in ids.iter().take(3) {
        harness
            .tasks
            .change_status(*id, owner, TaskStatus::Completed)
            .await
            .expect("status change should succeed");
    }
    if let Some(first) = ids.first() {
        harness
            .tasks
            .change_status(*first, owner, TaskStatus::Pending)
            .await
            .expect("reopening should succeed");
        harness
            .tasks
            .delete(*first, owner)
            .await
            .expect("deletion should succeed");
    }

    // 2 completed of 4 remaining.
    let stored = harness
        .projects
        .get(project.id())
        .await
        .expect("project should exist");
    assert_eq!(stored.progress(), 50);
}

#[tokio::test(flavor = "multi_thread")]
async fn counts_bucket_statuses_and_schedules() {
    let harness = Harness::new();
    let owner = UserId::new();
    let (_, _, project) = harness.seed_tree(owner).await;
    let now = super::support::day_zero();

    let overdue = harness
        .tasks
        .create(
            CreateTaskRequest::new(project.id(), "overdue")
                .with_due_date(now - Duration::days(2)),
            owner,
        )
        .await
        .expect("task creation should succeed");
    harness
        .tasks
        .create(
            CreateTaskRequest::new(project.id(), "due later")
                .with_due_date(now + Duration::days(2)),
            owner,
        )
        .await
        .expect("task creation should succeed");
    let completed = harness.seed_task(&project, owner, "done").await;
    harness
        .tasks
        .change_status(completed.id(), owner, TaskStatus::Completed)
        .await
        .expect("status change should succeed");
    harness
        .tasks
        .add_subtask(overdue.id(), owner, "split out")
        .await
        .expect("subtask creation should succeed");

    let counts = harness
        .tasks
        .counts(project.id(), owner)
        .await
        .expect("counts should succeed");

    assert_eq!(counts.total(), 3);
    assert_eq!(counts.pending, 2);
    assert_eq!(counts.completed, 1);
    assert_eq!(counts.overdue, 1);
    assert_eq!(counts.with_subtasks, 1);
    assert_eq!(counts.without_subtasks, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn overdue_reminders_go_to_assignees_and_tolerate_failures() {
    let harness = Harness::new();
    let owner = UserId::new();
    let assignee = UserId::new();
    let (_, _, project) = harness.seed_tree(owner).await;
    let now = super::support::day_zero();

    harness
        .tasks
        .create(
            CreateTaskRequest::new(project.id(), "assigned and overdue")
                .with_assignee(assignee)
                .with_due_date(now - Duration::days(1)),
            owner,
        )
        .await
        .expect("task creation should succeed");
    harness
        .tasks
        .create(
            CreateTaskRequest::new(project.id(), "unassigned and overdue")
                .with_due_date(now - Duration::days(1)),
            owner,
        )
        .await
        .expect("task creation should succeed");

    let sent = harness
        .tasks
        .dispatch_overdue_reminders(project.id())
        .await
        .expect("dispatch should succeed");
    assert_eq!(sent, 1);
    assert_eq!(harness.notifier.sent().len(), 1);

    // Delivery failure is logged and skipped, never an error.
    harness.notifier.set_failing(true);
    let sent = harness
        .tasks
        .dispatch_overdue_reminders(project.id())
        .await
        .expect("dispatch should succeed despite delivery failure");
    assert_eq!(sent, 0);
}
