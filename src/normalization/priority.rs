//! Clinical priority shared by referrals and tasks.

use super::{CodeError, CodedEnum};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Clinical priority. Ordering follows urgency: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Priority {
    /// Routine work.
    Low,
    /// Standard work.
    Medium,
    /// Urgent work. Incoming `urgent` collapses here.
    High,
}

impl CodedEnum for Priority {
    const KIND: &'static str = "priority";
    const ALL: &'static [Self] = &[Self::High, Self::Medium, Self::Low];

    fn code(self) -> i16 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    fn label(self) -> &'static str {
        self.as_str()
    }

    fn from_code(code: i16) -> Result<Self, CodeError> {
        match code {
            1 => Ok(Self::High),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Low),
            _ => Err(CodeError::UnknownCode {
                kind: Self::KIND,
                code,
            }),
        }
    }

    fn alias(normalized: &str) -> Option<Self> {
        match normalized {
            "urgent" | "p1" => Some(Self::High),
            "p2" => Some(Self::Medium),
            "p3" => Some(Self::Low),
            _ => None,
        }
    }
}

impl Priority {
    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Priority {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_label(&value)
    }
}

impl TryFrom<&str> for Priority {
    type Error = CodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_label(value)
    }
}

impl TryFrom<i16> for Priority {
    type Error = CodeError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::from_code(value)
    }
}
