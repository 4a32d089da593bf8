//! Triage and task status enumerations.

use super::{CodeError, CodedEnum};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Triage state of a referral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum TriageStatus {
    /// Awaiting a decision from the destination department.
    Pending,
    /// Accepted by the destination department.
    Accepted,
    /// Rejected by the destination department.
    Rejected,
    /// Legacy marker for a referral mid-redirect; behaves like `Pending`.
    Redirected,
}

impl TriageStatus {
    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Redirected => "redirected",
        }
    }

    /// Returns whether no further triage decision is allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

impl CodedEnum for TriageStatus {
    const KIND: &'static str = "triage status";
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::Accepted,
        Self::Rejected,
        Self::Redirected,
    ];

    fn code(self) -> i16 {
        match self {
            Self::Pending => 0,
            Self::Accepted => 1,
            Self::Rejected => 2,
            Self::Redirected => 3,
        }
    }

    fn label(self) -> &'static str {
        self.as_str()
    }

    fn from_code(code: i16) -> Result<Self, CodeError> {
        match code {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Accepted),
            2 => Ok(Self::Rejected),
            3 => Ok(Self::Redirected),
            _ => Err(CodeError::UnknownCode {
                kind: Self::KIND,
                code,
            }),
        }
    }
}

impl fmt::Display for TriageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for TriageStatus {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_label(&value)
    }
}

impl TryFrom<&str> for TriageStatus {
    type Error = CodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_label(value)
    }
}

/// Derived progress of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum TaskStatus {
    /// No interventions are scheduled.
    NotAssigned,
    /// Interventions are scheduled but none has started.
    Assigned,
    /// At least one intervention has started.
    InProgress,
    /// The task has a completion record.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotAssigned => "not_assigned",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Returns whether the task counts as active work.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Assigned | Self::InProgress)
    }
}

impl CodedEnum for TaskStatus {
    const KIND: &'static str = "task status";
    const ALL: &'static [Self] = &[
        Self::NotAssigned,
        Self::Assigned,
        Self::InProgress,
        Self::Completed,
    ];

    fn code(self) -> i16 {
        match self {
            Self::NotAssigned => 0,
            Self::Assigned => 1,
            Self::InProgress => 2,
            Self::Completed => 3,
        }
    }

    fn label(self) -> &'static str {
        self.as_str()
    }

    fn from_code(code: i16) -> Result<Self, CodeError> {
        match code {
            0 => Ok(Self::NotAssigned),
            1 => Ok(Self::Assigned),
            2 => Ok(Self::InProgress),
            3 => Ok(Self::Completed),
            _ => Err(CodeError::UnknownCode {
                kind: Self::KIND,
                code,
            }),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_label(&value)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = CodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_label(value)
    }
}
