//! In-memory task, subtask, and note repository.

use super::store::InMemoryHierarchy;
use crate::hierarchy::domain::{Note, ProjectId, Subtask, Task, TaskId};
use crate::hierarchy::ports::{HierarchyRepoResult, HierarchyRepositoryError, TaskRepository};
use async_trait::async_trait;

#[async_trait]
impl TaskRepository for InMemoryHierarchy {
    async fn insert(&self, task: &Task) -> HierarchyRepoResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(HierarchyRepositoryError::DuplicateId(task.id().to_string()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> HierarchyRepoResult<()> {
        let mut state = self.write()?;
        let stored = state
            .tasks
            .get(&task.id())
            .ok_or(HierarchyRepositoryError::TaskNotFound(task.id()))?;
        if stored.version() != task.version() {
            return Err(HierarchyRepositoryError::VersionConflict {
                entity: "task",
                expected: task.version(),
                stored: stored.version(),
            });
        }
        let mut updated = task.clone();
        updated.bump_version();
        state.tasks.insert(task.id(), updated);
        Ok(())
    }

    async fn find(&self, id: TaskId) -> HierarchyRepoResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_for_project(&self, project: ProjectId) -> HierarchyRepoResult<Vec<Task>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.project() == project)
            .cloned()
            .collect())
    }

    async fn insert_subtask(&self, subtask: &Subtask) -> HierarchyRepoResult<()> {
        let mut state = self.write()?;
        if state.subtasks.contains_key(&subtask.id()) {
            return Err(HierarchyRepositoryError::DuplicateId(
                subtask.id().to_string(),
            ));
        }
        state.subtasks.insert(subtask.id(), subtask.clone());
        Ok(())
    }

    async fn update_subtask(&self, subtask: &Subtask) -> HierarchyRepoResult<()> {
        let mut state = self.write()?;
        if !state.subtasks.contains_key(&subtask.id()) {
            return Err(HierarchyRepositoryError::SubtaskNotFound(subtask.id()));
        }
        state.subtasks.insert(subtask.id(), subtask.clone());
        Ok(())
    }

    async fn list_subtasks(&self, task: TaskId) -> HierarchyRepoResult<Vec<Subtask>> {
        let state = self.read()?;
        Ok(state
            .subtasks
            .values()
            .filter(|subtask| subtask.task() == task)
            .cloned()
            .collect())
    }

    async fn insert_note(&self, note: &Note) -> HierarchyRepoResult<()> {
        let mut state = self.write()?;
        if state.notes.contains_key(&note.id()) {
            return Err(HierarchyRepositoryError::DuplicateId(note.id().to_string()));
        }
        state.notes.insert(note.id(), note.clone());
        Ok(())
    }

    async fn list_notes(&self, task: TaskId) -> HierarchyRepoResult<Vec<Note>> {
        let state = self.read()?;
        Ok(state
            .notes
            .values()
            .filter(|note| note.task() == task)
            .cloned()
            .collect())
    }
}
