//! Read models pairing stored tasks with their derived values.

use crate::directory::PatientId;
use crate::normalization::TaskStatus;
use crate::task::domain::{Intervention, Task, TaskId};
use chrono::NaiveDate;
use serde::Serialize;

/// A task together with its status and overdue flag for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    /// The stored task.
    pub task: Task,
    /// Derived status.
    pub status: TaskStatus,
    /// Derived overdue flag.
    pub overdue: bool,
}

impl TaskView {
    /// Derives the view of `task` for `today`.
    #[must_use]
    pub fn at(task: Task, today: NaiveDate) -> Self {
        let status = task.status(today);
        let overdue = task.is_overdue(today);
        Self {
            task,
            status,
            overdue,
        }
    }
}

/// One intervention on a staff member's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffBooking {
    /// Task holding the booking.
    pub task_id: TaskId,
    /// Patient being treated.
    pub patient_id: PatientId,
    /// The booked intervention.
    pub intervention: Intervention,
}
