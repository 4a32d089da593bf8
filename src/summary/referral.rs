//! Referral counts for reporting.

use super::{Breakdown, DepartmentBreakdown, DepartmentBucket};
use crate::normalization::{Priority, TriageStatus};
use crate::referral::domain::Referral;
use serde::Serialize;

/// Derived counts over visible referrals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferralSummary {
    /// Visible referrals.
    pub total: usize,
    /// Referrals per triage status.
    pub by_triage_status: Breakdown<TriageStatus>,
    /// Referrals per priority.
    pub by_priority: Breakdown<Priority>,
    /// Referrals per current destination department.
    pub by_destination: DepartmentBreakdown,
    /// Referrals flagged for human review of their redirect chain.
    pub needs_review: usize,
    /// Referrals already converted into a task.
    pub converted: usize,
}

/// Counts visible referrals by triage status, priority and destination.
#[must_use]
pub fn compute_referral_summary(referrals: &[Referral]) -> ReferralSummary {
    let mut summary = ReferralSummary::default();
    for referral in referrals
        .iter()
        .filter(|referral| !referral.record_state().is_hidden())
    {
        summary.total += 1;
        summary.by_triage_status.record(referral.triage_status());
        summary.by_priority.record(referral.priority());
        *summary
            .by_destination
            .entry(DepartmentBucket::Department(referral.destination_department()))
            .or_default() += 1;
        if referral.needs_review() {
            summary.needs_review += 1;
        }
        if referral.converted_to_task_id().is_some() {
            summary.converted += 1;
        }
    }
    summary
}
