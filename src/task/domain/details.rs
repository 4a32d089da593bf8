//! Clinical text and completion record of a task.

use crate::referral::domain::ReferralClinicalText;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Diagnosis, goals and description of a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskClinicalDetails {
    diagnosis: String,
    goals: String,
    description: String,
}

impl TaskClinicalDetails {
    /// Creates trimmed clinical details.
    #[must_use]
    pub fn new(
        diagnosis: impl Into<String>,
        goals: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            diagnosis: diagnosis.into().trim().to_owned(),
            goals: goals.into().trim().to_owned(),
            description: description.into().trim().to_owned(),
        }
    }

    /// Working diagnosis.
    #[must_use]
    pub fn diagnosis(&self) -> &str {
        &self.diagnosis
    }

    /// Treatment goals.
    #[must_use]
    pub fn goals(&self) -> &str {
        &self.goals
    }

    /// Free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Fills blank fields from a referral: diagnosis from diagnosis, goals
    /// from goals and description from instructions.
    #[must_use]
    pub fn backfilled_from(mut self, referral: &ReferralClinicalText) -> Self {
        fill_blank(&mut self.diagnosis, referral.diagnosis());
        fill_blank(&mut self.goals, referral.goals());
        fill_blank(&mut self.description, referral.instructions());
        self
    }
}

fn fill_blank(field: &mut String, fallback: &str) {
    if field.is_empty() {
        fallback.clone_into(field);
    }
}

/// Completion record; its presence alone makes a task completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCompletion {
    completed_on: NaiveDate,
    outcome_notes: String,
}

impl TaskCompletion {
    /// Creates a completion record. Callers validate the notes.
    #[must_use]
    pub const fn new(completed_on: NaiveDate, outcome_notes: String) -> Self {
        Self {
            completed_on,
            outcome_notes,
        }
    }

    /// Day the task was completed.
    #[must_use]
    pub const fn completed_on(&self) -> NaiveDate {
        self.completed_on
    }

    /// Outcome notes.
    #[must_use]
    pub fn outcome_notes(&self) -> &str {
        &self.outcome_notes
    }
}
