//! Derived task status and overdue flag.
//!
//! Neither value is stored as the source of truth; both are recomputed from
//! the completion record, the interventions and the calendar day.

use super::Task;
use crate::normalization::TaskStatus;
use chrono::NaiveDate;

/// Derives a task's status for `today`.
///
/// Precedence: a completion record wins; then any intervention that has
/// started; then a status declared by a legacy row; then whether any
/// intervention is scheduled. A declared `completed` without a completion
/// record is ignored.
#[must_use]
pub fn compute_status(task: &Task, today: NaiveDate) -> TaskStatus {
    if task.is_completed() {
        return TaskStatus::Completed;
    }
    if task
        .interventions()
        .iter()
        .any(|intervention| intervention.period().start() <= today)
    {
        return TaskStatus::InProgress;
    }
    if let Some(declared) = task
        .declared_status()
        .filter(|status| *status != TaskStatus::Completed)
    {
        return declared;
    }
    if task.interventions().is_empty() {
        TaskStatus::NotAssigned
    } else {
        TaskStatus::Assigned
    }
}

/// Last day of work: the latest intervention end, or the task end when no
/// intervention is scheduled.
#[must_use]
pub fn effective_end(task: &Task) -> NaiveDate {
    task.interventions()
        .iter()
        .map(|intervention| intervention.period().end())
        .max()
        .unwrap_or_else(|| task.period().end())
}

/// Returns whether an unfinished task has run past its effective end.
#[must_use]
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    compute_status(task, today) != TaskStatus::Completed && effective_end(task) < today
}
