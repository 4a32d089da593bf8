//! Read-only counts over task and referral sets.
//!
//! Summaries are recomputed from current state on every call and never
//! persisted. Hidden records are excluded from every count.

mod breakdown;
mod referral;
mod task;

pub use breakdown::{Breakdown, DepartmentBucket, DepartmentBreakdown};
pub use referral::{ReferralSummary, compute_referral_summary};
pub use task::{TaskSummary, compute_task_summary};
