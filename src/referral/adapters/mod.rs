//! Adapter implementations for referral ports.

pub mod memory;
pub mod postgres;
