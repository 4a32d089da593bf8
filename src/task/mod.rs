//! Task orchestration and intervention scheduling.
//!
//! A task is a schedulable unit of clinical work for one patient, created
//! directly or by converting an accepted referral. Interventions place a
//! staff member on a ward for a date range inside the task. Status and the
//! overdue flag are derived on every read rather than stored. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
