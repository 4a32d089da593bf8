//! Repository port for referral persistence and conversion claims.

use crate::directory::{DepartmentId, PatientId};
use crate::normalization::TriageStatus;
use crate::referral::domain::{Referral, ReferralId};
use crate::resilience::Transient;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for referral repository operations.
pub type ReferralRepositoryResult<T> = Result<T, ReferralRepositoryError>;

/// Listing criteria for referrals. Empty criteria match every active referral.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferralFilter {
    /// Only referrals for this patient.
    pub patient_id: Option<PatientId>,
    /// Only referrals currently held by this department.
    pub destination_department: Option<DepartmentId>,
    /// Only referrals in this triage status.
    pub triage_status: Option<TriageStatus>,
    /// Include hidden referrals.
    pub include_hidden: bool,
}

impl ReferralFilter {
    /// Returns whether `referral` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, referral: &Referral) -> bool {
        (self.include_hidden || !referral.record_state().is_hidden())
            && self
                .patient_id
                .is_none_or(|patient_id| referral.patient_id() == patient_id)
            && self
                .destination_department
                .is_none_or(|department| referral.destination_department() == department)
            && self
                .triage_status
                .is_none_or(|status| referral.triage_status() == status)
    }
}

/// Referral persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferralRepository: Send + Sync {
    /// Stores a new referral.
    ///
    /// # Errors
    ///
    /// Returns [`ReferralRepositoryError::DuplicateReferral`] when the ID
    /// already exists.
    async fn store(&self, referral: &Referral) -> ReferralRepositoryResult<()>;

    /// Persists changes to an existing referral. Last writer wins, except
    /// that the conversion link is never overwritten by this call.
    ///
    /// # Errors
    ///
    /// Returns [`ReferralRepositoryError::NotFound`] when the referral does
    /// not exist.
    async fn update(&self, referral: &Referral) -> ReferralRepositoryResult<()>;

    /// Finds a referral by identifier.
    async fn find_by_id(&self, id: ReferralId) -> ReferralRepositoryResult<Option<Referral>>;

    /// Lists referrals matching `filter`, oldest first.
    async fn list(&self, filter: &ReferralFilter) -> ReferralRepositoryResult<Vec<Referral>>;

    /// Atomically links the referral to `task_id` if it is not linked yet.
    ///
    /// # Errors
    ///
    /// Returns [`ReferralRepositoryError::AlreadyClaimed`] when another task
    /// already holds the referral and [`ReferralRepositoryError::NotFound`]
    /// when it does not exist.
    async fn claim_conversion(
        &self,
        referral: &Referral,
        task_id: TaskId,
    ) -> ReferralRepositoryResult<()>;

    /// Clears a conversion link previously claimed by `task_id`.
    async fn release_conversion(
        &self,
        id: ReferralId,
        task_id: TaskId,
    ) -> ReferralRepositoryResult<()>;
}

/// Errors returned by referral repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ReferralRepositoryError {
    /// A referral with the same identifier already exists.
    #[error("duplicate referral identifier: {0}")]
    DuplicateReferral(ReferralId),

    /// The referral was not found.
    #[error("referral not found: {0}")]
    NotFound(ReferralId),

    /// The referral was converted by a concurrent request.
    #[error("referral {referral_id} already converted into task {task_id}")]
    AlreadyClaimed {
        /// Referral identifier.
        referral_id: ReferralId,
        /// Task holding the claim.
        task_id: TaskId,
    },

    /// A stored row holds a value the domain cannot represent.
    #[error("corrupt stored referral: {0}")]
    Corrupt(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReferralRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps a decoding failure for a stored value.
    pub fn corrupt(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Corrupt(Arc::new(err))
    }
}

impl Transient for ReferralRepositoryError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
