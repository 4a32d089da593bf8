//! In-memory repository for task orchestration tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::referral::domain::ReferralId;
use crate::task::{
    domain::{Task, TaskId, find_task_conflict},
    ports::{TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// The revision check, the conflict check and the write share one
/// write-lock acquisition.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    insertion_order: Vec<TaskId>,
    referral_index: HashMap<ReferralId, TaskId>,
}

impl InMemoryTaskState {
    fn ensure_no_conflict(&self, task: &Task) -> TaskRepositoryResult<()> {
        match find_task_conflict(task, self.tasks.values()) {
            Some(conflict) => Err(TaskRepositoryError::SchedulingConflict(conflict)),
            None => Ok(()),
        }
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.ensure_no_conflict(task)?;

        if let Some(referral_id) = task.referral_id() {
            state.referral_index.insert(referral_id, task.id());
        }
        state.insertion_order.push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .tasks
            .get(&task.id())
            .map(Task::revision)
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if stored != task.revision() {
            return Err(TaskRepositoryError::StaleWrite {
                task_id: task.id(),
                expected: task.revision(),
                stored,
            });
        }
        state.ensure_no_conflict(task)?;

        let mut committed = task.clone();
        committed.advance_revision();
        state.tasks.insert(task.id(), committed);
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_by_referral(
        &self,
        referral_id: ReferralId,
    ) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .referral_index
            .get(&referral_id)
            .and_then(|task_id| state.tasks.get(task_id))
            .cloned())
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .insertion_order
            .iter()
            .filter_map(|id| state.tasks.get(id))
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }
}
