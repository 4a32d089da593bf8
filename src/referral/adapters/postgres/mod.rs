//! `PostgreSQL` adapters for referral persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresReferralRepository, ReferralPgPool};
