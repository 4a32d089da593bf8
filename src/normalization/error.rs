//! Error type for code and label decoding.

use crate::error::ErrorKind;
use thiserror::Error;

/// Errors returned while decoding a stored code or an incoming label.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodeError {
    /// The numeric storage code has no mapping.
    #[error("unrecognized {kind} code: {code}")]
    UnknownCode {
        /// Enumeration being decoded.
        kind: &'static str,
        /// Offending code.
        code: i16,
    },

    /// The semantic label has no mapping.
    #[error("unrecognized {kind} value: '{value}'")]
    UnknownLabel {
        /// Enumeration being decoded.
        kind: &'static str,
        /// Offending label as received.
        value: String,
    },
}

impl CodeError {
    /// Returns the caller-facing error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
