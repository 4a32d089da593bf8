//! In-memory integration tests.
//!
//! Tests are organized into modules by functionality:
//! - `referral_workflow_tests`: Creation, triage and redirect chains
//! - `scheduling_tests`: Intervention placement and staff double-booking
//! - `task_lifecycle_tests`: Referral conversion through completion
//! - `summary_tests`: Reporting counts over both entity families

mod in_memory {
    pub mod helpers;

    mod referral_workflow_tests;
    mod scheduling_tests;
    mod summary_tests;
    mod task_lifecycle_tests;
}
