//! Referral lifecycle management.
//!
//! A referral asks a destination department to take over part of a
//! patient's care. The destination triages it: accept, reject, or redirect
//! to another department. Accepted referrals may later be converted into
//! exactly one task by [`crate::task::services::TaskOrchestrator`]. The
//! module follows hexagonal architecture:
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
