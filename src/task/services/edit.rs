//! Read-modify-write loop for task edits.

use super::{TaskServiceError, TaskServiceResult};
use crate::resilience::{RetryError, RetryPolicy, with_retry};
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};

/// Upper bound on reloads when concurrent writers keep committing first.
pub(super) const STALE_WRITE_ATTEMPTS: u32 = 8;

/// Loads a task, applies `change`, and writes it back.
///
/// A write refused as stale reloads the task and applies `change` again to
/// the fresh copy, so an edit is never committed over one it did not see.
pub(super) async fn edit_task<T, F, R>(
    tasks: &T,
    retry_policy: RetryPolicy,
    task_id: TaskId,
    mut change: F,
) -> TaskServiceResult<(Task, R)>
where
    T: TaskRepository + ?Sized,
    F: FnMut(&mut Task) -> TaskServiceResult<R> + Send,
    R: Send,
{
    let mut attempt = 1;
    loop {
        let mut task = with_retry(retry_policy, "find task", || tasks.find_by_id(task_id))
            .await?
            .ok_or(TaskServiceError::NotFound(task_id))?;
        let outcome = change(&mut task)?;

        match with_retry(retry_policy, "update task", || tasks.update(&task)).await {
            Ok(()) => {
                task.advance_revision();
                return Ok((task, outcome));
            }
            Err(RetryError::Rejected(TaskRepositoryError::StaleWrite { .. }))
                if attempt < STALE_WRITE_ATTEMPTS =>
            {
                tracing::debug!(task_id = %task_id, attempt, "stale task copy, reloading");
                attempt += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
}
