//! Repository port for task persistence and atomic scheduling.

use crate::directory::{DepartmentId, PatientId, StaffId};
use crate::referral::domain::ReferralId;
use crate::resilience::Transient;
use crate::task::domain::{SchedulingConflict, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Listing criteria for tasks. Empty criteria match every active task.
///
/// Derived status is not a storage criterion; services filter on it after
/// loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks for this patient.
    pub patient_id: Option<PatientId>,
    /// Only tasks owned by this department.
    pub department_id: Option<DepartmentId>,
    /// Only tasks with an intervention assigned to this staff member.
    pub staff_id: Option<StaffId>,
    /// Include hidden tasks.
    pub include_hidden: bool,
}

impl TaskFilter {
    /// Returns whether `task` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        (self.include_hidden || !task.record_state().is_hidden())
            && self
                .patient_id
                .is_none_or(|patient_id| task.patient_id() == patient_id)
            && self
                .department_id
                .is_none_or(|department| task.department_id() == Some(department))
            && self.staff_id.is_none_or(|staff_id| {
                task.interventions()
                    .iter()
                    .any(|intervention| intervention.staff_id() == staff_id)
            })
    }
}

/// Task persistence contract.
///
/// Writes of an active task check every intervention against the bookings
/// of all other active tasks and commit only when no staff member is
/// double-booked. The check and the write are one atomic step.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists and [`TaskRepositoryError::SchedulingConflict`] when an
    /// intervention double-books a staff member.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Replaces an existing task and its interventions.
    ///
    /// The write is accepted only when `task.revision()` equals the stored
    /// revision; the stored revision then advances by one.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist,
    /// [`TaskRepositoryError::StaleWrite`] when another update committed
    /// since `task` was loaded, and [`TaskRepositoryError::SchedulingConflict`]
    /// when the active task would double-book a staff member.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier, hidden or not.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Finds the task created from `referral_id`.
    async fn find_by_referral(&self, referral_id: ReferralId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks matching `filter`, oldest first.
    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// An intervention overlaps another booking of the same staff member.
    #[error("scheduling conflict: {0}")]
    SchedulingConflict(SchedulingConflict),

    /// The task changed after this copy was loaded.
    #[error(
        "task {task_id} was modified concurrently (expected revision {expected}, stored {stored})"
    )]
    StaleWrite {
        /// Task being written.
        task_id: TaskId,
        /// Revision the writer loaded.
        expected: u64,
        /// Revision currently stored.
        stored: u64,
    },

    /// A stored row holds a value the domain cannot represent.
    #[error("corrupt stored task: {0}")]
    Corrupt(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps a decoding failure for a stored value.
    pub fn corrupt(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Corrupt(Arc::new(err))
    }
}

impl From<diesel::result::Error> for TaskRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

impl Transient for TaskRepositoryError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
