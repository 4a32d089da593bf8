//! Task counts for reporting.

use super::{Breakdown, DepartmentBreakdown, DepartmentBucket};
use crate::normalization::{Priority, TaskStatus};
use crate::task::domain::Task;
use chrono::NaiveDate;
use serde::Serialize;

/// Derived counts over visible tasks on one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    /// Visible tasks.
    pub total: usize,
    /// Tasks past their effective end without a completion record.
    pub overdue: usize,
    /// Tasks that are assigned or in progress.
    pub active: usize,
    /// Tasks without any intervention.
    pub not_assigned: usize,
    /// Completed tasks.
    pub completed: usize,
    /// Tasks per priority.
    pub by_priority: Breakdown<Priority>,
    /// Tasks per owning department. `Unassigned` is always present.
    pub by_department: DepartmentBreakdown,
    /// Tasks per derived status.
    pub by_status: Breakdown<TaskStatus>,
}

/// Counts visible tasks by derived status, priority and department.
#[must_use]
pub fn compute_task_summary(tasks: &[Task], today: NaiveDate) -> TaskSummary {
    let mut summary = TaskSummary::default();
    summary.by_department.insert(DepartmentBucket::Unassigned, 0);
    for task in tasks.iter().filter(|task| !task.record_state().is_hidden()) {
        let status = task.status(today);
        summary.total += 1;
        if task.is_overdue(today) {
            summary.overdue += 1;
        }
        match status {
            TaskStatus::NotAssigned => summary.not_assigned += 1,
            TaskStatus::Completed => summary.completed += 1,
            TaskStatus::Assigned | TaskStatus::InProgress => summary.active += 1,
        }
        summary.by_status.record(status);
        summary.by_priority.record(task.priority());
        *summary
            .by_department
            .entry(DepartmentBucket::from(task.department_id()))
            .or_default() += 1;
    }
    summary
}
