//! Carepath: hospital care coordination.
//!
//! This crate moves patients between departments and schedules the clinical
//! work that follows. Referrals are triaged by their destination department,
//! accepted referrals become tasks, and tasks are staffed with interventions
//! that never double-book a staff member.
//!
//! # Architecture
//!
//! Carepath follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`referral`]: Referral creation, triage and redirect chains
//! - [`task`]: Task orchestration and intervention scheduling
//! - [`normalization`]: Numeric code and label mapping for priorities and
//!   statuses
//! - [`summary`]: Derived counts for reporting
//! - [`directory`]: Existence checks against external reference directories

pub mod config;
pub mod directory;
pub mod error;
pub mod normalization;
pub mod referral;
pub mod resilience;
pub mod summary;
pub mod task;
pub mod telemetry;

#[cfg(test)]
mod test_support;
