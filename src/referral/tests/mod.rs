//! Unit tests for the referral module.
