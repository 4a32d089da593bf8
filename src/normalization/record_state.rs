//! Uniform soft-delete lifecycle for referrals and tasks.

use super::{CodeError, CodedEnum};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Visibility of a persisted record. Hidden records are never deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum RecordState {
    /// Visible in listings, summaries and conflict checks.
    #[default]
    Active,
    /// Retained for audit only.
    Hidden,
}

impl RecordState {
    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Hidden => "hidden",
        }
    }

    /// Returns the opposite state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Hidden,
            Self::Hidden => Self::Active,
        }
    }

    /// Returns whether the record is hidden.
    #[must_use]
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

impl CodedEnum for RecordState {
    const KIND: &'static str = "record state";
    const ALL: &'static [Self] = &[Self::Active, Self::Hidden];

    fn code(self) -> i16 {
        match self {
            Self::Active => 0,
            Self::Hidden => 1,
        }
    }

    fn label(self) -> &'static str {
        self.as_str()
    }

    fn from_code(code: i16) -> Result<Self, CodeError> {
        match code {
            0 => Ok(Self::Active),
            1 => Ok(Self::Hidden),
            _ => Err(CodeError::UnknownCode {
                kind: Self::KIND,
                code,
            }),
        }
    }
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for RecordState {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_label(&value)
    }
}
