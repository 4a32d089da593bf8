//! Referral aggregate root.

use super::{
    RedirectHop, RedirectPolicy, ReferralClinicalText, ReferralDomainError, ReferralId,
    TriageDecision,
};
use crate::directory::{DepartmentId, InterventionTypeId, PatientId, StaffId};
use crate::normalization::{Priority, RecordState, TriageStatus};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Parameter object for creating a referral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralDraft {
    /// Patient being referred.
    pub patient_id: PatientId,
    /// Referring department.
    pub origin_department: DepartmentId,
    /// Department asked to take the referral.
    pub destination_department: DepartmentId,
    /// Clinical priority.
    pub priority: Priority,
    /// Staff member making the referral.
    pub referring_staff_id: StaffId,
    /// Clinical text.
    pub clinical: ReferralClinicalText,
    /// Requested intervention types.
    pub intervention_type_ids: Vec<InterventionTypeId>,
}

/// Editable fields of a referral that has not been triaged to a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralEdit {
    /// New priority.
    pub priority: Priority,
    /// New clinical text.
    pub clinical: ReferralClinicalText,
    /// New requested intervention types.
    pub intervention_type_ids: Vec<InterventionTypeId>,
}

/// Referral aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referral {
    id: ReferralId,
    patient_id: PatientId,
    origin_department: DepartmentId,
    destination_department: DepartmentId,
    redirect_to_department: Option<DepartmentId>,
    priority: Priority,
    triage_status: TriageStatus,
    triage_notes: Option<String>,
    referring_staff_id: StaffId,
    clinical: ReferralClinicalText,
    intervention_type_ids: Vec<InterventionTypeId>,
    redirect_history: Vec<RedirectHop>,
    needs_review: bool,
    converted_to_task_id: Option<TaskId>,
    record_state: RecordState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted referral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReferralData {
    /// Persisted referral identifier.
    pub id: ReferralId,
    /// Persisted patient identifier.
    pub patient_id: PatientId,
    /// Persisted origin department.
    pub origin_department: DepartmentId,
    /// Persisted destination department.
    pub destination_department: DepartmentId,
    /// Persisted pending redirect target.
    pub redirect_to_department: Option<DepartmentId>,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted triage status.
    pub triage_status: TriageStatus,
    /// Persisted triage notes.
    pub triage_notes: Option<String>,
    /// Persisted referring staff member.
    pub referring_staff_id: StaffId,
    /// Persisted clinical text.
    pub clinical: ReferralClinicalText,
    /// Persisted requested intervention types.
    pub intervention_type_ids: Vec<InterventionTypeId>,
    /// Persisted redirect chain.
    pub redirect_history: Vec<RedirectHop>,
    /// Persisted review flag.
    pub needs_review: bool,
    /// Persisted conversion link.
    pub converted_to_task_id: Option<TaskId>,
    /// Persisted visibility.
    pub record_state: RecordState,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest change timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Referral {
    /// Creates a pending referral.
    #[must_use]
    pub fn new(draft: ReferralDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ReferralId::new(),
            patient_id: draft.patient_id,
            origin_department: draft.origin_department,
            destination_department: draft.destination_department,
            redirect_to_department: None,
            priority: draft.priority,
            triage_status: TriageStatus::Pending,
            triage_notes: None,
            referring_staff_id: draft.referring_staff_id,
            clinical: draft.clinical,
            intervention_type_ids: draft.intervention_type_ids,
            redirect_history: Vec::new(),
            needs_review: false,
            converted_to_task_id: None,
            record_state: RecordState::Active,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a referral from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReferralData) -> Self {
        Self {
            id: data.id,
            patient_id: data.patient_id,
            origin_department: data.origin_department,
            destination_department: data.destination_department,
            redirect_to_department: data.redirect_to_department,
            priority: data.priority,
            triage_status: data.triage_status,
            triage_notes: data.triage_notes,
            referring_staff_id: data.referring_staff_id,
            clinical: data.clinical,
            intervention_type_ids: data.intervention_type_ids,
            redirect_history: data.redirect_history,
            needs_review: data.needs_review,
            converted_to_task_id: data.converted_to_task_id,
            record_state: data.record_state,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the referral identifier.
    #[must_use]
    pub const fn id(&self) -> ReferralId {
        self.id
    }

    /// Returns the referred patient.
    #[must_use]
    pub const fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    /// Returns the referring department.
    #[must_use]
    pub const fn origin_department(&self) -> DepartmentId {
        self.origin_department
    }

    /// Returns the department currently responsible for triage.
    #[must_use]
    pub const fn destination_department(&self) -> DepartmentId {
        self.destination_department
    }

    /// Returns the target of the latest redirect while it awaits triage.
    #[must_use]
    pub const fn redirect_to_department(&self) -> Option<DepartmentId> {
        self.redirect_to_department
    }

    /// Returns the clinical priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the triage status.
    #[must_use]
    pub const fn triage_status(&self) -> TriageStatus {
        self.triage_status
    }

    /// Returns notes from the latest triage decision.
    #[must_use]
    pub fn triage_notes(&self) -> Option<&str> {
        self.triage_notes.as_deref()
    }

    /// Returns the referring staff member.
    #[must_use]
    pub const fn referring_staff_id(&self) -> StaffId {
        self.referring_staff_id
    }

    /// Returns the clinical text.
    #[must_use]
    pub const fn clinical(&self) -> &ReferralClinicalText {
        &self.clinical
    }

    /// Returns the requested intervention types.
    #[must_use]
    pub fn intervention_type_ids(&self) -> &[InterventionTypeId] {
        &self.intervention_type_ids
    }

    /// Returns the redirect chain in the order it happened.
    #[must_use]
    pub fn redirect_history(&self) -> &[RedirectHop] {
        &self.redirect_history
    }

    /// Returns whether the redirect chain was escalated for review.
    #[must_use]
    pub const fn needs_review(&self) -> bool {
        self.needs_review
    }

    /// Returns the task created from this referral, if any.
    #[must_use]
    pub const fn converted_to_task_id(&self) -> Option<TaskId> {
        self.converted_to_task_id
    }

    /// Returns the visibility state.
    #[must_use]
    pub const fn record_state(&self) -> RecordState {
        self.record_state
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest change timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a triage decision.
    ///
    /// A redirect appends to the history, moves the destination and returns
    /// the referral to `pending`. When the new target was already visited and
    /// the chain exceeds the policy threshold the referral is flagged for
    /// review; the redirect still succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`ReferralDomainError::InvalidStateTransition`] when the
    /// referral is already accepted or rejected, and
    /// [`ReferralDomainError::RedirectToCurrentDestination`] when a redirect
    /// targets the current destination.
    pub fn triage(
        &mut self,
        decision: TriageDecision,
        triaged_by: StaffId,
        policy: RedirectPolicy,
        clock: &impl Clock,
    ) -> Result<(), ReferralDomainError> {
        self.ensure_open_for(decision.action().as_str())?;

        match decision {
            TriageDecision::Accept { notes } => {
                self.triage_status = TriageStatus::Accepted;
                self.triage_notes = notes;
                self.redirect_to_department = None;
            }
            TriageDecision::Reject { notes } => {
                self.triage_status = TriageStatus::Rejected;
                self.triage_notes = Some(notes);
                self.redirect_to_department = None;
            }
            TriageDecision::Redirect { to, notes } => {
                if to == self.destination_department {
                    return Err(ReferralDomainError::RedirectToCurrentDestination(to));
                }
                let revisits = self.has_visited(to);
                self.redirect_history.push(RedirectHop::new(
                    self.destination_department,
                    to,
                    clock.utc(),
                    triaged_by,
                ));
                if policy.requires_review(self.redirect_history.len(), revisits) {
                    self.needs_review = true;
                }
                self.destination_department = to;
                self.redirect_to_department = Some(to);
                self.triage_status = TriageStatus::Pending;
                self.triage_notes = notes;
            }
        }

        self.touch(clock);
        Ok(())
    }

    /// Links this referral to the task created from it.
    ///
    /// # Errors
    ///
    /// Returns [`ReferralDomainError::InvalidStateTransition`] unless the
    /// referral is accepted, and [`ReferralDomainError::AlreadyConverted`]
    /// when a task is already linked.
    pub fn mark_converted(
        &mut self,
        task_id: TaskId,
        clock: &impl Clock,
    ) -> Result<(), ReferralDomainError> {
        self.ensure_convertible()?;
        self.converted_to_task_id = Some(task_id);
        self.touch(clock);
        Ok(())
    }

    /// Checks that a task may be created from this referral.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::mark_converted`].
    pub fn ensure_convertible(&self) -> Result<(), ReferralDomainError> {
        if let Some(task_id) = self.converted_to_task_id {
            return Err(ReferralDomainError::AlreadyConverted {
                referral_id: self.id,
                task_id,
            });
        }
        if self.triage_status != TriageStatus::Accepted {
            return Err(ReferralDomainError::InvalidStateTransition {
                referral_id: self.id,
                from: self.triage_status,
                action: "convert",
            });
        }
        Ok(())
    }

    /// Removes the conversion link if it points at `task_id`.
    ///
    /// Used to undo a claim when creating the task failed.
    pub fn release_conversion(&mut self, task_id: TaskId, clock: &impl Clock) {
        if self.converted_to_task_id == Some(task_id) {
            self.converted_to_task_id = None;
            self.touch(clock);
        }
    }

    /// Replaces the editable fields.
    ///
    /// # Errors
    ///
    /// Returns [`ReferralDomainError::InvalidStateTransition`] when the
    /// referral is already accepted or rejected.
    pub fn edit(
        &mut self,
        edit: ReferralEdit,
        clock: &impl Clock,
    ) -> Result<(), ReferralDomainError> {
        self.ensure_open_for("edit")?;
        self.priority = edit.priority;
        self.clinical = edit.clinical;
        self.intervention_type_ids = edit.intervention_type_ids;
        self.touch(clock);
        Ok(())
    }

    /// Flips between active and hidden, returning the new state.
    pub fn toggle_hidden(&mut self, clock: &impl Clock) -> RecordState {
        self.record_state = self.record_state.toggled();
        self.touch(clock);
        self.record_state
    }

    /// Overwrites the conversion link with the value held by storage.
    pub(crate) fn set_conversion_link(
        &mut self,
        task_id: Option<TaskId>,
        at: DateTime<Utc>,
    ) {
        self.converted_to_task_id = task_id;
        self.updated_at = at;
    }

    /// Checks that `action` may still be applied, i.e. the referral is not
    /// accepted or rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ReferralDomainError::InvalidStateTransition`] for terminal
    /// referrals.
    pub fn ensure_open_for(&self, action: &'static str) -> Result<(), ReferralDomainError> {
        if self.triage_status.is_terminal() {
            return Err(ReferralDomainError::InvalidStateTransition {
                referral_id: self.id,
                from: self.triage_status,
                action,
            });
        }
        Ok(())
    }

    /// Returns whether `department` already appears in the referral's chain.
    fn has_visited(&self, department: DepartmentId) -> bool {
        self.origin_department == department
            || self
                .redirect_history
                .iter()
                .any(|hop| hop.from() == department || hop.to() == department)
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
