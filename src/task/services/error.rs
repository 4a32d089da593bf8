//! Service-level errors for task orchestration and scheduling.

use crate::directory::ports::DirectoryError;
use crate::error::ErrorKind;
use crate::normalization::CodeError;
use crate::referral::{
    domain::{ReferralDomainError, ReferralId},
    ports::ReferralRepositoryError,
};
use crate::resilience::RetryError;
use crate::task::{
    domain::{TaskDomainError, TaskId},
    ports::TaskRepositoryError,
};
use thiserror::Error;

/// Errors returned by [`super::TaskOrchestrator`] and
/// [`super::InterventionScheduler`].
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Task validation or state transition failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The linked referral cannot be converted.
    #[error(transparent)]
    Referral(#[from] ReferralDomainError),
    /// A priority or status label did not decode.
    #[error(transparent)]
    Code(#[from] CodeError),
    /// A referenced entity is missing or inactive.
    #[error(transparent)]
    Directory(DirectoryError),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// No referral exists with the given identifier.
    #[error("referral {0} not found")]
    ReferralNotFound(ReferralId),
    /// Task repository rejected the operation.
    #[error(transparent)]
    Repository(TaskRepositoryError),
    /// Referral repository rejected the operation.
    #[error(transparent)]
    ReferralRepository(ReferralRepositoryError),
    /// The store stayed unreachable after retrying.
    #[error("{operation} unavailable after {attempts} attempts: {message}")]
    ServiceUnavailable {
        /// Logical operation name.
        operation: &'static str,
        /// Attempts made.
        attempts: u32,
        /// Last infrastructure error.
        message: String,
    },
}

impl TaskServiceError {
    /// Returns the caller-facing error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Referral(err) => err.kind(),
            Self::Code(err) => err.kind(),
            Self::Directory(err) => err.kind(),
            Self::NotFound(_)
            | Self::ReferralNotFound(_)
            | Self::Repository(TaskRepositoryError::NotFound(_))
            | Self::ReferralRepository(ReferralRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Repository(TaskRepositoryError::SchedulingConflict(_)) => {
                ErrorKind::SchedulingConflict
            }
            Self::ReferralRepository(ReferralRepositoryError::AlreadyClaimed { .. }) => {
                ErrorKind::AlreadyConverted
            }
            Self::Repository(TaskRepositoryError::StaleWrite { .. })
            | Self::ServiceUnavailable { .. } => ErrorKind::ServiceUnavailable,
            Self::Repository(_) | Self::ReferralRepository(_) => ErrorKind::Validation,
        }
    }

    fn unavailable(
        operation: &'static str,
        attempts: u32,
        source: &impl std::fmt::Display,
    ) -> Self {
        Self::ServiceUnavailable {
            operation,
            attempts,
            message: source.to_string(),
        }
    }
}

impl From<RetryError<TaskRepositoryError>> for TaskServiceError {
    fn from(err: RetryError<TaskRepositoryError>) -> Self {
        match err {
            RetryError::Rejected(TaskRepositoryError::NotFound(id)) => Self::NotFound(id),
            RetryError::Rejected(source) => Self::Repository(source),
            RetryError::Exhausted {
                operation,
                attempts,
                source,
            } => Self::unavailable(operation, attempts, &source),
        }
    }
}

impl From<RetryError<ReferralRepositoryError>> for TaskServiceError {
    fn from(err: RetryError<ReferralRepositoryError>) -> Self {
        match err {
            RetryError::Rejected(ReferralRepositoryError::NotFound(id)) => {
                Self::ReferralNotFound(id)
            }
            RetryError::Rejected(source) => Self::ReferralRepository(source),
            RetryError::Exhausted {
                operation,
                attempts,
                source,
            } => Self::unavailable(operation, attempts, &source),
        }
    }
}

impl From<RetryError<DirectoryError>> for TaskServiceError {
    fn from(err: RetryError<DirectoryError>) -> Self {
        match err {
            RetryError::Rejected(source) => Self::Directory(source),
            RetryError::Exhausted {
                operation,
                attempts,
                source,
            } => Self::unavailable(operation, attempts, &source),
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;
