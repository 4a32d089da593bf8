//! In-memory adapters for referral ports.

mod referral;

pub use referral::InMemoryReferralRepository;
