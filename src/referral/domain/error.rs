//! Error types for referral domain validation.

use super::ReferralId;
use crate::directory::{DepartmentId, PatientId};
use crate::error::ErrorKind;
use crate::normalization::TriageStatus;
use crate::task::domain::TaskId;
use thiserror::Error;

/// Errors returned by referral aggregate operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReferralDomainError {
    /// A rejection was submitted without notes.
    #[error("rejection notes must not be empty")]
    EmptyRejectionNotes,

    /// A redirect was submitted without a target department.
    #[error("redirect requires a target department")]
    MissingRedirectTarget,

    /// A redirect targeted the department that already holds the referral.
    #[error("redirect target {0} is already the destination department")]
    RedirectToCurrentDestination(DepartmentId),

    /// The triage action label is not recognised.
    #[error("unknown triage action: '{0}'")]
    UnknownTriageAction(String),

    /// The action is not allowed from the referral's current status.
    #[error("cannot {action} referral {referral_id} in status {from}")]
    InvalidStateTransition {
        /// Referral identifier.
        referral_id: ReferralId,
        /// Current triage status.
        from: TriageStatus,
        /// Attempted action.
        action: &'static str,
    },

    /// The referral has already produced a task.
    #[error("referral {referral_id} already converted into task {task_id}")]
    AlreadyConverted {
        /// Referral identifier.
        referral_id: ReferralId,
        /// Task created by the earlier conversion.
        task_id: TaskId,
    },

    /// A task was requested for a different patient than the referral's.
    #[error("referral {referral_id} belongs to patient {expected}, not {actual}")]
    PatientMismatch {
        /// Referral identifier.
        referral_id: ReferralId,
        /// Patient named on the referral.
        expected: PatientId,
        /// Patient named on the task request.
        actual: PatientId,
    },
}

impl ReferralDomainError {
    /// Returns the caller-facing error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyRejectionNotes
            | Self::MissingRedirectTarget
            | Self::RedirectToCurrentDestination(_)
            | Self::UnknownTriageAction(_)
            | Self::PatientMismatch { .. } => ErrorKind::Validation,
            Self::InvalidStateTransition { .. } => ErrorKind::InvalidStateTransition,
            Self::AlreadyConverted { .. } => ErrorKind::AlreadyConverted,
        }
    }
}
