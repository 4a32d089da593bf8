//! Error types for task domain validation.

use super::{DateRange, InterventionId, TaskId};
use crate::error::ErrorKind;
use crate::normalization::TaskStatus;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned by task aggregate operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// A date range ends before it starts.
    #[error("end date {end} is before start date {start}")]
    InvalidDateRange {
        /// Requested first day.
        start: NaiveDate,
        /// Requested last day.
        end: NaiveDate,
    },

    /// An intervention does not fit inside its task's date range.
    #[error("intervention {intervention_id} ({period}) falls outside task range {task_period}")]
    InterventionOutsideTask {
        /// Offending intervention.
        intervention_id: InterventionId,
        /// Intervention days.
        period: DateRange,
        /// Task days.
        task_period: DateRange,
    },

    /// Completion was requested without outcome notes.
    #[error("outcome notes must not be empty")]
    EmptyOutcomeNotes,

    /// Sequence numbers start at one.
    #[error("invalid sequence number {0}, expected a positive integer")]
    InvalidSequence(u32),

    /// The task holds no intervention with this identifier.
    #[error("intervention {intervention_id} not found in task {task_id}")]
    InterventionNotFound {
        /// Task searched.
        task_id: TaskId,
        /// Missing intervention.
        intervention_id: InterventionId,
    },

    /// The operation is not allowed in the task's current status.
    #[error("cannot {action} task {task_id} in status {status}")]
    InvalidStateTransition {
        /// Task identifier.
        task_id: TaskId,
        /// Derived status at the time of the attempt.
        status: TaskStatus,
        /// Attempted action.
        action: &'static str,
    },
}

impl TaskDomainError {
    /// Returns the caller-facing error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDateRange { .. }
            | Self::InterventionOutsideTask { .. }
            | Self::EmptyOutcomeNotes
            | Self::InvalidSequence(_) => ErrorKind::Validation,
            Self::InterventionNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidStateTransition { .. } => ErrorKind::InvalidStateTransition,
        }
    }
}
