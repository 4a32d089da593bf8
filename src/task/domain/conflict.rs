//! Staff double-booking detection.

use super::{DateRange, Intervention, InterventionId, Task, TaskId};
use crate::directory::StaffId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An existing booking that clashes with a proposed intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingConflict {
    /// Double-booked staff member.
    pub staff_id: StaffId,
    /// Proposed intervention.
    pub intervention_id: InterventionId,
    /// Intervention already holding the staff member.
    pub conflicting_intervention_id: InterventionId,
    /// Task owning the conflicting intervention.
    pub conflicting_task_id: TaskId,
    /// Days of the conflicting intervention.
    pub conflicting_period: DateRange,
}

impl fmt::Display for SchedulingConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "staff {} already booked {} by intervention {} of task {}",
            self.staff_id,
            self.conflicting_period,
            self.conflicting_intervention_id,
            self.conflicting_task_id
        )
    }
}

/// Finds the first booking in `booked` that overlaps `candidate` for the
/// same staff member.
///
/// Hidden tasks are skipped, and so is the candidate itself when it is
/// already part of a booked task.
#[must_use]
pub fn find_staff_conflict<'a>(
    candidate: &Intervention,
    booked: impl IntoIterator<Item = &'a Task>,
) -> Option<SchedulingConflict> {
    booked
        .into_iter()
        .filter(|task| !task.record_state().is_hidden())
        .flat_map(|task| {
            task.interventions()
                .iter()
                .map(move |intervention| (task.id(), intervention))
        })
        .find(|(_, existing)| {
            existing.id() != candidate.id()
                && existing.staff_id() == candidate.staff_id()
                && existing.period().overlaps(candidate.period())
        })
        .map(|(task_id, existing)| SchedulingConflict {
            staff_id: candidate.staff_id(),
            intervention_id: candidate.id(),
            conflicting_intervention_id: existing.id(),
            conflicting_task_id: task_id,
            conflicting_period: existing.period(),
        })
}

/// Checks every intervention of `task` against its siblings and against
/// `others`. Entries of `others` with the same identifier as `task` are
/// ignored, so the stored copy of a task being updated can stay in the set.
///
/// Hidden tasks never conflict.
#[must_use]
pub fn find_task_conflict<'a, I>(task: &'a Task, others: I) -> Option<SchedulingConflict>
where
    I: IntoIterator<Item = &'a Task>,
    I::IntoIter: Clone,
{
    if task.record_state().is_hidden() {
        return None;
    }
    let rest = others.into_iter().filter(|other| other.id() != task.id());
    task.interventions().iter().find_map(|candidate| {
        find_staff_conflict(candidate, std::iter::once(task).chain(rest.clone()))
    })
}
