//! Derived progress across task operations, end to end.

use super::helpers::Platform;
use aalto::access::domain::UserId;
use aalto::hierarchy::domain::TaskStatus;
use aalto::hierarchy::services::CreateTaskRequest;

#[tokio::test(flavor = "multi_thread")]
async fn four_task_scenario_tracks_the_specified_percentages() {
    let platform = Platform::new();
    let owner = UserId::new();
    let (_, _, project) = platform.seed_tree(owner).await;

    let mut ids = Vec::new();
    for title in ["a", "b", "c", "d"] {
        let task = platform
            .tasks
            .create(CreateTaskRequest::new(project.id(), title), owner)
            .await
            .expect("task creation should succeed");
        ids.push(task.id());
    }

    // 2 completed, 1 in progress, 1 pending → 50%.
    for id in ids.iter().take(2) {
        platform
            .tasks
            .change_status(*id, owner, TaskStatus::Completed)
            .await
            .expect("status change should succeed");
    }
    if let Some(third) = ids.get(2) {
        platform
            .tasks
            .change_status(*third, owner, TaskStatus::InProgress)
            .await
            .expect("status change should succeed");
    }
    let stored = platform
        .projects
        .get(project.id())
        .await
        .expect("project should exist");
    assert_eq!(stored.progress(), 50);

    // Deleting the pending task → round(100 × 2 / 3) = 67.
    if let Some(fourth) = ids.get(3) {
        platform
            .tasks
            .delete(*fourth, owner)
            .await
            .expect("deletion should succeed");
    }
    let stored = platform
        .projects
        .get(project.id())
        .await
        .expect("project should exist");
    assert_eq!(stored.progress(), 67);
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_projects_report_zero_progress() {
    let platform = Platform::new();
    let owner = UserId::new();
    let (_, _, project) = platform.seed_tree(owner).await;

    let task = platform
        .tasks
        .create(CreateTaskRequest::new(project.id(), "only"), owner)
        .await
        .expect("task creation should succeed");
    platform
        .tasks
        .change_status(task.id(), owner, TaskStatus::Completed)
        .await
        .expect("status change should succeed");
    assert_eq!(
        platform
            .projects
            .get(project.id())
            .await
            .expect("project should exist")
            .progress(),
        100
    );

    platform
        .tasks
        .delete(task.id(), owner)
        .await
        .expect("deletion should succeed");
    assert_eq!(
        platform
            .projects
            .get(project.id())
            .await
            .expect("project should exist")
            .progress(),
        0
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn reopening_a_task_lowers_progress_again() {
    let platform = Platform::new();
    let owner = UserId::new();
    let (_, _, project) = platform.seed_tree(owner).await;

    let task = platform
        .tasks
        .create(CreateTaskRequest::new(project.id(), "flaky"), owner)
        .await
        .expect("task creation should succeed");
    platform
        .tasks
        .create(CreateTaskRequest::new(project.id(), "steady"), owner)
        .await
        .expect("task creation should succeed");

    platform
        .tasks
        .change_status(task.id(), owner, TaskStatus::Completed)
        .await
        .expect("status change should succeed");
    assert_eq!(
        platform
            .projects
            .get(project.id())
            .await
            .expect("project should exist")
            .progress(),
        50
    );

    platform
        .tasks
        .change_status(task.id(), owner, TaskStatus::Pending)
        .await
        .expect("reopening should succeed");
    let reopened = platform
        .tasks
        .get(task.id())
        .await
        .expect("task should exist");
    assert!(reopened.completed_at().is_some());
    assert_eq!(
        platform
            .projects
            .get(project.id())
            .await
            .expect("project should exist")
            .progress(),
        0
    );
}
