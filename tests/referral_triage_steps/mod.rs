//! Step definitions for referral triage scenarios.

mod given;
mod then;
mod when;
pub mod world;
