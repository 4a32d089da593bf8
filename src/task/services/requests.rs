//! Request payloads accepted by the task services.

use crate::directory::{DepartmentId, InterventionTypeId, PatientId, StaffId, WardId};
use crate::referral::domain::ReferralId;
use crate::task::domain::{InterventionId, TaskClinicalDetails, TaskId};
use chrono::NaiveDate;

/// Intervention fields as received from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterventionRequest {
    pub(super) intervention_type_id: InterventionTypeId,
    pub(super) staff_id: StaffId,
    pub(super) ward_id: WardId,
    pub(super) start: NaiveDate,
    pub(super) end: NaiveDate,
}

impl InterventionRequest {
    /// Creates an intervention request.
    #[must_use]
    pub const fn new(
        intervention_type_id: InterventionTypeId,
        staff_id: StaffId,
        ward_id: WardId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            intervention_type_id,
            staff_id,
            ward_id,
            start,
            end,
        }
    }
}

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub(super) patient_id: PatientId,
    pub(super) department_id: DepartmentId,
    pub(super) priority: String,
    pub(super) start: NaiveDate,
    pub(super) end: NaiveDate,
    pub(super) details: TaskClinicalDetails,
    pub(super) interventions: Vec<InterventionRequest>,
    pub(super) referral_id: Option<ReferralId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        patient_id: PatientId,
        department_id: DepartmentId,
        priority: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            patient_id,
            department_id,
            priority: priority.into(),
            start,
            end,
            details: TaskClinicalDetails::default(),
            interventions: Vec::new(),
            referral_id: None,
        }
    }

    /// Sets diagnosis, goals and description.
    #[must_use]
    pub fn with_details(
        mut self,
        diagnosis: impl Into<String>,
        goals: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.details = TaskClinicalDetails::new(diagnosis, goals, description);
        self
    }

    /// Appends an initial intervention.
    #[must_use]
    pub fn with_intervention(mut self, intervention: InterventionRequest) -> Self {
        self.interventions.push(intervention);
        self
    }

    /// Converts the given accepted referral into this task.
    #[must_use]
    pub const fn from_referral(mut self, referral_id: ReferralId) -> Self {
        self.referral_id = Some(referral_id);
        self
    }
}

/// Request payload for editing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    pub(super) task_id: TaskId,
    pub(super) department_id: DepartmentId,
    pub(super) priority: String,
    pub(super) start: NaiveDate,
    pub(super) end: NaiveDate,
    pub(super) details: TaskClinicalDetails,
}

impl UpdateTaskRequest {
    /// Creates a request replacing the task's editable fields.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        department_id: DepartmentId,
        priority: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            task_id,
            department_id,
            priority: priority.into(),
            start,
            end,
            details: TaskClinicalDetails::default(),
        }
    }

    /// Sets diagnosis, goals and description.
    #[must_use]
    pub fn with_details(
        mut self,
        diagnosis: impl Into<String>,
        goals: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.details = TaskClinicalDetails::new(diagnosis, goals, description);
        self
    }
}

/// Request payload for rescheduling an intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateInterventionRequest {
    pub(super) task_id: TaskId,
    pub(super) intervention_id: InterventionId,
    pub(super) intervention: InterventionRequest,
    pub(super) position: Option<u32>,
}

impl UpdateInterventionRequest {
    /// Creates a request replacing the intervention's fields.
    #[must_use]
    pub const fn new(
        task_id: TaskId,
        intervention_id: InterventionId,
        intervention: InterventionRequest,
    ) -> Self {
        Self {
            task_id,
            intervention_id,
            intervention,
            position: None,
        }
    }

    /// Moves the intervention to a one-based display position.
    #[must_use]
    pub const fn with_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }
}
