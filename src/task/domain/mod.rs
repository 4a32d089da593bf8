//! Domain model for task orchestration.
//!
//! A task is the unit of care work for one patient in one department. Its
//! status and overdue flag are derived, never stored. Interventions are
//! scheduled inside the task's date range and may not double-book staff.

mod conflict;
mod date_range;
mod details;
mod error;
mod ids;
mod intervention;
mod status;
mod task;

pub use conflict::{SchedulingConflict, find_staff_conflict, find_task_conflict};
pub use date_range::DateRange;
pub use details::{TaskClinicalDetails, TaskCompletion};
pub use error::TaskDomainError;
pub use ids::{InterventionId, SequenceNumber, TaskId};
pub use intervention::{Intervention, InterventionPlan};
pub use status::{compute_status, effective_end, is_overdue};
pub use task::{PersistedTaskData, Task, TaskDraft, TaskRevision};
