//! Triage decisions submitted by the destination department.

use super::ReferralDomainError;
use crate::directory::DepartmentId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of triage decision, as received from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageAction {
    /// Take the referral.
    Accept,
    /// Decline the referral.
    Reject,
    /// Pass the referral on to another department.
    Redirect,
}

impl TriageAction {
    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Redirect => "redirect",
        }
    }
}

impl fmt::Display for TriageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TriageAction {
    type Error = ReferralDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            "redirect" => Ok(Self::Redirect),
            _ => Err(ReferralDomainError::UnknownTriageAction(value.to_owned())),
        }
    }
}

/// A validated triage decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageDecision {
    /// Accept, optionally with notes.
    Accept {
        /// Optional acceptance notes.
        notes: Option<String>,
    },
    /// Reject with a mandatory reason.
    Reject {
        /// Non-empty rejection reason.
        notes: String,
    },
    /// Redirect to another department.
    Redirect {
        /// Department that should triage next.
        to: DepartmentId,
        /// Optional redirect notes.
        notes: Option<String>,
    },
}

impl TriageDecision {
    /// Builds a decision from loosely-typed request fields.
    ///
    /// Notes are trimmed; blank notes count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ReferralDomainError::EmptyRejectionNotes`] for a rejection
    /// without notes and [`ReferralDomainError::MissingRedirectTarget`] for a
    /// redirect without a target.
    pub fn from_parts(
        action: TriageAction,
        notes: &str,
        redirect_to: Option<DepartmentId>,
    ) -> Result<Self, ReferralDomainError> {
        let trimmed = notes.trim();
        let cleaned = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        match action {
            TriageAction::Accept => Ok(Self::Accept { notes: cleaned }),
            TriageAction::Reject => cleaned
                .map(|reason| Self::Reject { notes: reason })
                .ok_or(ReferralDomainError::EmptyRejectionNotes),
            TriageAction::Redirect => redirect_to
                .map(|to| Self::Redirect { to, notes: cleaned })
                .ok_or(ReferralDomainError::MissingRedirectTarget),
        }
    }

    /// Returns the action this decision performs.
    #[must_use]
    pub const fn action(&self) -> TriageAction {
        match self {
            Self::Accept { .. } => TriageAction::Accept,
            Self::Reject { .. } => TriageAction::Reject,
            Self::Redirect { .. } => TriageAction::Redirect,
        }
    }
}
