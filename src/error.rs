//! Error taxonomy shared by every layer.
//!
//! Each context keeps its own `thiserror` enums; [`ErrorKind`] is the common
//! classification the presentation layer switches on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-facing classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or missing field, invalid date range, or unknown code.
    Validation,
    /// A referenced entity does not exist or is inactive.
    NotFound,
    /// The requested transition is illegal from the current state.
    InvalidStateTransition,
    /// A staff member would be double-booked.
    SchedulingConflict,
    /// The referral has already been converted into a task.
    AlreadyConverted,
    /// The backing store could not be reached after retrying.
    ServiceUnavailable,
}

impl ErrorKind {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::InvalidStateTransition => "invalid_state_transition",
            Self::SchedulingConflict => "scheduling_conflict",
            Self::AlreadyConverted => "already_converted",
            Self::ServiceUnavailable => "service_unavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
