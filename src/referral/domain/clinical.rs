//! Free-text clinical content carried by a referral.

use serde::{Deserialize, Serialize};

/// Clinical text written by the referring clinician.
///
/// Values are trimmed on construction; blank fields are stored as empty
/// strings so the task orchestrator can detect and back-fill them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralClinicalText {
    diagnosis: String,
    goals: String,
    instructions: String,
}

impl ReferralClinicalText {
    /// Creates clinical text from its three sections.
    #[must_use]
    pub fn new(
        diagnosis: impl Into<String>,
        goals: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            diagnosis: diagnosis.into().trim().to_owned(),
            goals: goals.into().trim().to_owned(),
            instructions: instructions.into().trim().to_owned(),
        }
    }

    /// Returns the working diagnosis.
    #[must_use]
    pub fn diagnosis(&self) -> &str {
        &self.diagnosis
    }

    /// Returns the treatment goals.
    #[must_use]
    pub fn goals(&self) -> &str {
        &self.goals
    }

    /// Returns instructions for the destination department.
    #[must_use]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }
}
