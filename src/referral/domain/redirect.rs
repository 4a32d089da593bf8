//! Redirect history entries and the review escalation policy.

use crate::directory::{DepartmentId, StaffId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One hop of a referral's redirect chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectHop {
    from: DepartmentId,
    to: DepartmentId,
    at: DateTime<Utc>,
    by: StaffId,
}

impl RedirectHop {
    /// Records a redirect from `from` to `to`.
    #[must_use]
    pub const fn new(from: DepartmentId, to: DepartmentId, at: DateTime<Utc>, by: StaffId) -> Self {
        Self { from, to, at, by }
    }

    /// Department that passed the referral on.
    #[must_use]
    pub const fn from(&self) -> DepartmentId {
        self.from
    }

    /// Department that received the referral.
    #[must_use]
    pub const fn to(&self) -> DepartmentId {
        self.to
    }

    /// When the redirect happened.
    #[must_use]
    pub const fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// Staff member who redirected.
    #[must_use]
    pub const fn by(&self) -> StaffId {
        self.by
    }
}

/// When a redirect chain is escalated for human review.
///
/// A referral is flagged once a redirect returns to a department already in
/// its chain and the chain is longer than `review_after_hops`. Flagging never
/// blocks the redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectPolicy {
    /// Hop count that must be exceeded before a revisit is flagged.
    pub review_after_hops: usize,
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        Self {
            review_after_hops: 3,
        }
    }
}

impl RedirectPolicy {
    /// Creates a policy with a custom hop threshold.
    #[must_use]
    pub const fn new(review_after_hops: usize) -> Self {
        Self { review_after_hops }
    }

    /// Returns whether a chain of `hop_count` hops that `revisits` a
    /// department needs review.
    #[must_use]
    pub const fn requires_review(self, hop_count: usize, revisits: bool) -> bool {
        revisits && hop_count > self.review_after_hops
    }
}
