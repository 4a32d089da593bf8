//! Application services for referral triage orchestration.

mod lifecycle;

pub use lifecycle::{
    CreateReferralRequest, ReferralLifecycleService, ReferralServiceError, ReferralServiceResult,
    TriageRequest, UpdateReferralRequest,
};
