//! Domain model for referral triage.
//!
//! The referral aggregate owns the triage state machine, the redirect chain
//! and the single-conversion guard. Infrastructure concerns stay outside.

mod clinical;
mod error;
mod ids;
mod redirect;
mod referral;
mod triage;

pub use clinical::ReferralClinicalText;
pub use error::ReferralDomainError;
pub use ids::ReferralId;
pub use redirect::{RedirectHop, RedirectPolicy};
pub use referral::{PersistedReferralData, Referral, ReferralDraft, ReferralEdit};
pub use triage::{TriageAction, TriageDecision};
