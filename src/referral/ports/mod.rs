//! Port contracts for referral management.
//!
//! Ports define infrastructure-agnostic interfaces used by referral services.

pub mod repository;

pub use repository::{
    ReferralFilter, ReferralRepository, ReferralRepositoryError, ReferralRepositoryResult,
};
