//! Task aggregate root.

use super::{
    DateRange, Intervention, InterventionId, InterventionPlan, SequenceNumber, TaskClinicalDetails,
    TaskCompletion, TaskDomainError, TaskId, status,
};
use crate::directory::{DepartmentId, PatientId};
use crate::normalization::{Priority, RecordState, TaskStatus};
use crate::referral::domain::ReferralId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Parameter object for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Patient receiving care.
    pub patient_id: PatientId,
    /// Responsible department.
    pub department_id: DepartmentId,
    /// Clinical priority.
    pub priority: Priority,
    /// Planned days.
    pub period: DateRange,
    /// Clinical text.
    pub details: TaskClinicalDetails,
    /// Referral the task was created from.
    pub referral_id: Option<ReferralId>,
    /// Initial interventions in display order.
    pub interventions: Vec<InterventionPlan>,
}

/// Editable fields of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRevision {
    /// Responsible department.
    pub department_id: DepartmentId,
    /// Clinical priority.
    pub priority: Priority,
    /// Planned days.
    pub period: DateRange,
    /// Clinical text.
    pub details: TaskClinicalDetails,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    patient_id: PatientId,
    department_id: Option<DepartmentId>,
    priority: Priority,
    period: DateRange,
    details: TaskClinicalDetails,
    completion: Option<TaskCompletion>,
    declared_status: Option<TaskStatus>,
    record_state: RecordState,
    referral_id: Option<ReferralId>,
    interventions: Vec<Intervention>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    revision: u64,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted patient.
    pub patient_id: PatientId,
    /// Persisted department; absent only on legacy rows.
    pub department_id: Option<DepartmentId>,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted date range.
    pub period: DateRange,
    /// Persisted clinical text.
    pub details: TaskClinicalDetails,
    /// Persisted completion record.
    pub completion: Option<TaskCompletion>,
    /// Status column carried over from legacy rows.
    pub declared_status: Option<TaskStatus>,
    /// Persisted visibility.
    pub record_state: RecordState,
    /// Persisted referral link.
    pub referral_id: Option<ReferralId>,
    /// Persisted interventions; reordered by sequence on load.
    pub interventions: Vec<Intervention>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest change timestamp.
    pub updated_at: DateTime<Utc>,
    /// Number of updates committed since the task was stored.
    pub revision: u64,
}

impl Task {
    /// Creates an active task with its initial interventions numbered in
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InterventionOutsideTask`] when an initial
    /// intervention does not fit the task range.
    pub fn new(draft: TaskDraft, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let timestamp = clock.utc();
        let interventions = draft
            .interventions
            .into_iter()
            .enumerate()
            .map(|(index, plan)| Intervention::new(plan, SequenceNumber::from_index(index)))
            .collect::<Vec<_>>();
        for intervention in &interventions {
            ensure_within(draft.period, intervention.id(), intervention.period())?;
        }

        Ok(Self {
            id: TaskId::new(),
            patient_id: draft.patient_id,
            department_id: Some(draft.department_id),
            priority: draft.priority,
            period: draft.period,
            details: draft.details,
            completion: None,
            declared_status: None,
            record_state: RecordState::Active,
            referral_id: draft.referral_id,
            interventions,
            created_at: timestamp,
            updated_at: timestamp,
            revision: 0,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        let mut interventions = data.interventions;
        interventions.sort_by_key(Intervention::sequence);
        Self {
            id: data.id,
            patient_id: data.patient_id,
            department_id: data.department_id,
            priority: data.priority,
            period: data.period,
            details: data.details,
            completion: data.completion,
            declared_status: data.declared_status,
            record_state: data.record_state,
            referral_id: data.referral_id,
            interventions,
            created_at: data.created_at,
            updated_at: data.updated_at,
            revision: data.revision,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the patient.
    #[must_use]
    pub const fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    /// Returns the responsible department.
    #[must_use]
    pub const fn department_id(&self) -> Option<DepartmentId> {
        self.department_id
    }

    /// Returns the clinical priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the planned days.
    #[must_use]
    pub const fn period(&self) -> DateRange {
        self.period
    }

    /// Returns the clinical text.
    #[must_use]
    pub const fn details(&self) -> &TaskClinicalDetails {
        &self.details
    }

    /// Returns the completion record.
    #[must_use]
    pub const fn completion(&self) -> Option<&TaskCompletion> {
        self.completion.as_ref()
    }

    /// Returns the status persisted by legacy rows, if any.
    #[must_use]
    pub const fn declared_status(&self) -> Option<TaskStatus> {
        self.declared_status
    }

    /// Returns the visibility state.
    #[must_use]
    pub const fn record_state(&self) -> RecordState {
        self.record_state
    }

    /// Returns the originating referral.
    #[must_use]
    pub const fn referral_id(&self) -> Option<ReferralId> {
        self.referral_id
    }

    /// Returns interventions in sequence order.
    #[must_use]
    pub fn interventions(&self) -> &[Intervention] {
        &self.interventions
    }

    /// Returns the intervention with `id`.
    #[must_use]
    pub fn intervention(&self, id: InterventionId) -> Option<&Intervention> {
        self.interventions.iter().find(|intervention| intervention.id() == id)
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

    /// Returns the stored revision this copy was loaded at.
    ///
    /// Repositories accept an update only when it matches the stored
    /// revision, then advance it by one.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Marks this copy as matching the revision committed by a successful
    /// update.
    pub(crate) const fn advance_revision(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }

    /// Returns whether a completion record exists.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completion.is_some()
    }

    /// Derives the status for `today`.
    #[must_use]
    pub fn status(&self, today: NaiveDate) -> TaskStatus {
        status::compute_status(self, today)
    }

    /// Derives the overdue flag for `today`.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        status::is_overdue(self, today)
    }

    /// Replaces the editable fields and clears any declared status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InterventionOutsideTask`] naming the first
    /// intervention that no longer fits the new range.
    pub fn revise(
        &mut self,
        revision: TaskRevision,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        for intervention in &self.interventions {
            ensure_within(revision.period, intervention.id(), intervention.period())?;
        }
        self.department_id = Some(revision.department_id);
        self.priority = revision.priority;
        self.period = revision.period;
        self.details = revision.details;
        self.declared_status = None;
        self.touch(clock);
        Ok(())
    }

    /// Records completion for today.
    ///
    /// Returns `false` without changes when the task is already completed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyOutcomeNotes`] for blank notes.
    pub fn complete(
        &mut self,
        outcome_notes: &str,
        clock: &impl Clock,
    ) -> Result<bool, TaskDomainError> {
        let notes = outcome_notes.trim();
        if notes.is_empty() {
            return Err(TaskDomainError::EmptyOutcomeNotes);
        }
        if self.is_completed() {
            return Ok(false);
        }
        self.completion = Some(TaskCompletion::new(clock.utc().date_naive(), notes.to_owned()));
        self.touch(clock);
        Ok(true)
    }

    /// Appends an intervention at the next sequence position.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] for completed
    /// tasks and [`TaskDomainError::InterventionOutsideTask`] when the plan
    /// does not fit the task range.
    pub fn add_intervention(
        &mut self,
        plan: InterventionPlan,
        clock: &impl Clock,
    ) -> Result<Intervention, TaskDomainError> {
        self.ensure_schedulable("add intervention to")?;
        let intervention =
            Intervention::new(plan, SequenceNumber::from_index(self.interventions.len()));
        ensure_within(self.period, intervention.id(), intervention.period())?;
        self.interventions.push(intervention.clone());
        self.touch(clock);
        Ok(intervention)
    }

    /// Replaces an intervention's plan and optionally moves it to another
    /// position, renumbering the others.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] for completed
    /// tasks, [`TaskDomainError::InterventionNotFound`] for unknown
    /// interventions and [`TaskDomainError::InterventionOutsideTask`] when
    /// the new plan does not fit.
    pub fn update_intervention(
        &mut self,
        intervention_id: InterventionId,
        plan: InterventionPlan,
        position: Option<SequenceNumber>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_schedulable("update intervention of")?;
        let index = self.intervention_index(intervention_id)?;
        ensure_within(self.period, intervention_id, plan.period)?;

        let mut updated = self.interventions.remove(index);
        updated.replan(plan);
        let target = position.map_or(index, |sequence| {
            sequence.index().min(self.interventions.len())
        });
        self.interventions.insert(target, updated);
        self.renumber();
        self.touch(clock);
        Ok(())
    }

    /// Removes an intervention and closes the gap in sequence numbers.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] for completed
    /// tasks and [`TaskDomainError::InterventionNotFound`] for unknown
    /// interventions.
    pub fn remove_intervention(
        &mut self,
        intervention_id: InterventionId,
        clock: &impl Clock,
    ) -> Result<Intervention, TaskDomainError> {
        self.ensure_schedulable("remove intervention from")?;
        let index = self.intervention_index(intervention_id)?;
        let removed = self.interventions.remove(index);
        self.renumber();
        self.touch(clock);
        Ok(removed)
    }

    /// Flips between active and hidden, returning the new state.
    pub fn toggle_hidden(&mut self, clock: &impl Clock) -> RecordState {
        self.record_state = self.record_state.toggled();
        self.touch(clock);
        self.record_state
    }

    fn ensure_schedulable(&self, action: &'static str) -> Result<(), TaskDomainError> {
        if self.is_completed() {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                status: TaskStatus::Completed,
                action,
            });
        }
        Ok(())
    }

    fn intervention_index(
        &self,
        intervention_id: InterventionId,
    ) -> Result<usize, TaskDomainError> {
        self.interventions
            .iter()
            .position(|intervention| intervention.id() == intervention_id)
            .ok_or(TaskDomainError::InterventionNotFound {
                task_id: self.id,
                intervention_id,
            })
    }

    fn renumber(&mut self) {
        for (index, intervention) in self.interventions.iter_mut().enumerate() {
            intervention.set_sequence(SequenceNumber::from_index(index));
        }
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn ensure_within(
    task_period: DateRange,
    intervention_id: InterventionId,
    period: DateRange,
) -> Result<(), TaskDomainError> {
    if task_period.contains(period) {
        Ok(())
    } else {
        Err(TaskDomainError::InterventionOutsideTask {
            intervention_id,
            period,
            task_period,
        })
    }
}
