//! Scheduled interventions inside a task.

use super::{DateRange, InterventionId, SequenceNumber};
use crate::directory::{InterventionTypeId, StaffId, WardId};
use serde::{Deserialize, Serialize};

/// Caller-supplied fields of an intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionPlan {
    /// Kind of intervention.
    pub intervention_type_id: InterventionTypeId,
    /// Staff member carrying it out.
    pub staff_id: StaffId,
    /// Ward where it takes place.
    pub ward_id: WardId,
    /// Days it occupies.
    pub period: DateRange,
}

/// A scheduled unit of clinical work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intervention {
    id: InterventionId,
    intervention_type_id: InterventionTypeId,
    staff_id: StaffId,
    ward_id: WardId,
    period: DateRange,
    sequence: SequenceNumber,
}

impl Intervention {
    /// Creates an intervention with a fresh identifier.
    #[must_use]
    pub fn new(plan: InterventionPlan, sequence: SequenceNumber) -> Self {
        Self::from_persisted(InterventionId::new(), plan, sequence)
    }

    /// Reconstructs a stored intervention.
    #[must_use]
    pub const fn from_persisted(
        id: InterventionId,
        plan: InterventionPlan,
        sequence: SequenceNumber,
    ) -> Self {
        Self {
            id,
            intervention_type_id: plan.intervention_type_id,
            staff_id: plan.staff_id,
            ward_id: plan.ward_id,
            period: plan.period,
            sequence,
        }
    }

    /// Intervention identifier.
    #[must_use]
    pub const fn id(&self) -> InterventionId {
        self.id
    }

    /// Intervention type.
    #[must_use]
    pub const fn intervention_type_id(&self) -> InterventionTypeId {
        self.intervention_type_id
    }

    /// Assigned staff member.
    #[must_use]
    pub const fn staff_id(&self) -> StaffId {
        self.staff_id
    }

    /// Ward.
    #[must_use]
    pub const fn ward_id(&self) -> WardId {
        self.ward_id
    }

    /// Scheduled days.
    #[must_use]
    pub const fn period(&self) -> DateRange {
        self.period
    }

    /// Display position within the task.
    #[must_use]
    pub const fn sequence(&self) -> SequenceNumber {
        self.sequence
    }

    /// Caller-supplied fields.
    #[must_use]
    pub const fn plan(&self) -> InterventionPlan {
        InterventionPlan {
            intervention_type_id: self.intervention_type_id,
            staff_id: self.staff_id,
            ward_id: self.ward_id,
            period: self.period,
        }
    }

    pub(super) const fn replan(&mut self, plan: InterventionPlan) {
        self.intervention_type_id = plan.intervention_type_id;
        self.staff_id = plan.staff_id;
        self.ward_id = plan.ward_id;
        self.period = plan.period;
    }

    pub(super) const fn set_sequence(&mut self, sequence: SequenceNumber) {
        self.sequence = sequence;
    }
}
