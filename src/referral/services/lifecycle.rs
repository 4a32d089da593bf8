//! Service layer for referral creation and triage.

use crate::config::CarePathConfig;
use crate::directory::{
    DepartmentId, EntityRef, InterventionTypeId, PatientId, StaffId,
    ports::{DirectoryError, ReferenceDirectory, require_active},
};
use crate::error::ErrorKind;
use crate::normalization::{CodeError, CodedEnum, Priority};
use crate::referral::{
    domain::{
        RedirectPolicy, Referral, ReferralClinicalText, ReferralDomainError, ReferralDraft,
        ReferralEdit, ReferralId, TriageAction, TriageDecision,
    },
    ports::{ReferralFilter, ReferralRepository, ReferralRepositoryError},
};
use crate::resilience::{RetryError, RetryPolicy, with_retry};
use crate::summary::{ReferralSummary, compute_referral_summary};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a referral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReferralRequest {
    patient_id: PatientId,
    origin_department: DepartmentId,
    destination_department: DepartmentId,
    priority: String,
    referring_staff_id: StaffId,
    clinical: ReferralClinicalText,
    intervention_type_ids: Vec<InterventionTypeId>,
}

impl CreateReferralRequest {
    /// Creates a request with the required routing fields.
    #[must_use]
    pub fn new(
        patient_id: PatientId,
        origin_department: DepartmentId,
        destination_department: DepartmentId,
        priority: impl Into<String>,
        referring_staff_id: StaffId,
    ) -> Self {
        Self {
            patient_id,
            origin_department,
            destination_department,
            priority: priority.into(),
            referring_staff_id,
            clinical: ReferralClinicalText::default(),
            intervention_type_ids: Vec::new(),
        }
    }

    /// Sets the clinical text.
    #[must_use]
    pub fn with_clinical(
        mut self,
        diagnosis: impl Into<String>,
        goals: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        self.clinical = ReferralClinicalText::new(diagnosis, goals, instructions);
        self
    }

    /// Sets the requested intervention types.
    #[must_use]
    pub fn with_intervention_types(
        mut self,
        intervention_type_ids: impl IntoIterator<Item = InterventionTypeId>,
    ) -> Self {
        self.intervention_type_ids = intervention_type_ids.into_iter().collect();
        self
    }
}

/// Request payload for a triage decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageRequest {
    referral_id: ReferralId,
    action: String,
    notes: String,
    redirect_to: Option<DepartmentId>,
    triaged_by: StaffId,
}

impl TriageRequest {
    /// Creates a request for `action` (`accept`, `reject` or `redirect`).
    #[must_use]
    pub fn new(referral_id: ReferralId, action: impl Into<String>, triaged_by: StaffId) -> Self {
        Self {
            referral_id,
            action: action.into(),
            notes: String::new(),
            redirect_to: None,
            triaged_by,
        }
    }

    /// Sets the decision notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Sets the redirect target.
    #[must_use]
    pub const fn with_redirect_to(mut self, department: DepartmentId) -> Self {
        self.redirect_to = Some(department);
        self
    }
}

/// Request payload for editing a referral that is still open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReferralRequest {
    referral_id: ReferralId,
    priority: String,
    clinical: ReferralClinicalText,
    intervention_type_ids: Vec<InterventionTypeId>,
}

impl UpdateReferralRequest {
    /// Creates a request replacing the priority and clearing other fields.
    #[must_use]
    pub fn new(referral_id: ReferralId, priority: impl Into<String>) -> Self {
        Self {
            referral_id,
            priority: priority.into(),
            clinical: ReferralClinicalText::default(),
            intervention_type_ids: Vec::new(),
        }
    }

    /// Sets the clinical text.
    #[must_use]
    pub fn with_clinical(
        mut self,
        diagnosis: impl Into<String>,
        goals: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        self.clinical = ReferralClinicalText::new(diagnosis, goals, instructions);
        self
    }

    /// Sets the requested intervention types.
    #[must_use]
    pub fn with_intervention_types(
        mut self,
        intervention_type_ids: impl IntoIterator<Item = InterventionTypeId>,
    ) -> Self {
        self.intervention_type_ids = intervention_type_ids.into_iter().collect();
        self
    }
}

/// Service-level errors for referral operations.
#[derive(Debug, Error)]
pub enum ReferralServiceError {
    /// Domain validation or state transition failed.
    #[error(transparent)]
    Domain(#[from] ReferralDomainError),
    /// A priority or status label did not decode.
    #[error(transparent)]
    Code(#[from] CodeError),
    /// A referenced entity is missing or inactive.
    #[error(transparent)]
    Directory(DirectoryError),
    /// No referral exists with the given identifier.
    #[error("referral {0} not found")]
    NotFound(ReferralId),
    /// Repository rejected the operation.
    #[error(transparent)]
    Repository(ReferralRepositoryError),
    /// The store stayed unreachable after retrying.
    #[error("{operation} unavailable after {attempts} attempts: {message}")]
    ServiceUnavailable {
        /// Logical operation name.
        operation: &'static str,
        /// Attempts made.
        attempts: u32,
        /// Last infrastructure error.
        message: String,
    },
}

impl ReferralServiceError {
    /// Returns the caller-facing error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Code(err) => err.kind(),
            Self::Directory(err) => err.kind(),
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Repository(ReferralRepositoryError::AlreadyClaimed { .. }) => {
                ErrorKind::AlreadyConverted
            }
            Self::Repository(ReferralRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Repository(_) => ErrorKind::Validation,
            Self::ServiceUnavailable { .. } => ErrorKind::ServiceUnavailable,
        }
    }
}

impl From<RetryError<ReferralRepositoryError>> for ReferralServiceError {
    fn from(err: RetryError<ReferralRepositoryError>) -> Self {
        match err {
            RetryError::Rejected(ReferralRepositoryError::NotFound(id)) => Self::NotFound(id),
            RetryError::Rejected(source) => Self::Repository(source),
            RetryError::Exhausted {
                operation,
                attempts,
                source,
            } => Self::ServiceUnavailable {
                operation,
                attempts,
                message: source.to_string(),
            },
        }
    }
}

impl From<RetryError<DirectoryError>> for ReferralServiceError {
    fn from(err: RetryError<DirectoryError>) -> Self {
        match err {
            RetryError::Rejected(source) => Self::Directory(source),
            RetryError::Exhausted {
                operation,
                attempts,
                source,
            } => Self::ServiceUnavailable {
                operation,
                attempts,
                message: source.to_string(),
            },
        }
    }
}

/// Result type for referral service operations.
pub type ReferralServiceResult<T> = Result<T, ReferralServiceError>;

/// Referral lifecycle orchestration service.
#[derive(Clone)]
pub struct ReferralLifecycleService<R, D, C>
where
    R: ReferralRepository,
    D: ReferenceDirectory,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    directory: Arc<D>,
    clock: Arc<C>,
    redirect_policy: RedirectPolicy,
    retry_policy: RetryPolicy,
}

impl<R, D, C> ReferralLifecycleService<R, D, C>
where
    R: ReferralRepository,
    D: ReferenceDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a service with default policies.
    #[must_use]
    pub fn new(repository: Arc<R>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            repository,
            directory,
            clock,
            redirect_policy: RedirectPolicy::default(),
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Applies redirect and retry policies from configuration.
    #[must_use]
    pub const fn with_config(mut self, config: &CarePathConfig) -> Self {
        self.redirect_policy = config.redirect;
        self.retry_policy = config.retry;
        self
    }

    async fn require(&self, entity: impl Into<EntityRef>) -> ReferralServiceResult<()> {
        let reference = entity.into();
        with_retry(self.retry_policy, "directory lookup", || {
            require_active(&*self.directory, reference)
        })
        .await?;
        Ok(())
    }

    async fn load(&self, id: ReferralId) -> ReferralServiceResult<Referral> {
        with_retry(self.retry_policy, "find referral", || {
            self.repository.find_by_id(id)
        })
        .await?
        .ok_or(ReferralServiceError::NotFound(id))
    }

    async fn save(&self, referral: &Referral) -> ReferralServiceResult<()> {
        with_retry(self.retry_policy, "update referral", || {
            self.repository.update(referral)
        })
        .await?;
        Ok(())
    }

    /// Creates a pending referral.
    ///
    /// # Errors
    ///
    /// Returns [`ReferralServiceError::Code`] for an unknown priority,
    /// [`ReferralServiceError::Directory`] when the patient, a department,
    /// the referring staff member or an intervention type does not resolve,
    /// and repository errors from persistence.
    pub async fn create_referral(
        &self,
        request: CreateReferralRequest,
    ) -> ReferralServiceResult<Referral> {
        let CreateReferralRequest {
            patient_id,
            origin_department,
            destination_department,
            priority,
            referring_staff_id,
            clinical,
            intervention_type_ids,
        } = request;

        let priority_code = Priority::from_label(&priority)?;
        self.require(patient_id).await?;
        self.require(origin_department).await?;
        self.require(destination_department).await?;
        self.require(referring_staff_id).await?;
        for intervention_type_id in &intervention_type_ids {
            self.require(*intervention_type_id).await?;
        }

        let referral = Referral::new(
            ReferralDraft {
                patient_id,
                origin_department,
                destination_department,
                priority: priority_code,
                referring_staff_id,
                clinical,
                intervention_type_ids,
            },
            &*self.clock,
        );
        with_retry(self.retry_policy, "store referral", || {
            self.repository.store(&referral)
        })
        .await?;

        tracing::info!(
            referral_id = %referral.id(),
            destination = %referral.destination_department(),
            priority = %referral.priority(),
            "referral created"
        );
        Ok(referral)
    }

    /// Applies a triage decision.
    ///
    /// The terminal-state check runs before any field validation, so a
    /// decision on an accepted or rejected referral always reports
    /// `InvalidStateTransition`.
    ///
    /// # Errors
    ///
    /// Returns [`ReferralServiceError::NotFound`] for unknown referrals,
    /// domain errors for illegal transitions, empty rejection notes or
    /// redirects to the current destination, and directory errors for an
    /// inactive redirect target or triaging staff member.
    pub async fn triage(&self, request: TriageRequest) -> ReferralServiceResult<Referral> {
        let TriageRequest {
            referral_id,
            action,
            notes,
            redirect_to,
            triaged_by,
        } = request;

        let triage_action = TriageAction::try_from(action.as_str())?;
        let mut referral = self.load(referral_id).await?;
        referral.ensure_open_for(triage_action.as_str())?;

        let decision = TriageDecision::from_parts(triage_action, &notes, redirect_to)?;
        self.require(triaged_by).await?;
        if let TriageDecision::Redirect { to, .. } = &decision {
            self.require(*to).await?;
        }

        let was_flagged = referral.needs_review();
        referral.triage(decision, triaged_by, self.redirect_policy, &*self.clock)?;
        self.save(&referral).await?;

        if referral.needs_review() && !was_flagged {
            tracing::warn!(
                referral_id = %referral.id(),
                hops = referral.redirect_history().len(),
                "redirect chain revisits a department; referral flagged for review"
            );
        }
        tracing::info!(
            referral_id = %referral.id(),
            action = %triage_action,
            status = %referral.triage_status(),
            "referral triaged"
        );
        Ok(referral)
    }

    /// Edits priority, clinical text and requested intervention types of an
    /// open referral.
    ///
    /// # Errors
    ///
    /// Returns [`ReferralServiceError::NotFound`] for unknown referrals,
    /// `InvalidStateTransition` for accepted or rejected referrals, code
    /// errors for unknown priorities and directory errors for unknown
    /// intervention types.
    pub async fn update_referral(
        &self,
        request: UpdateReferralRequest,
    ) -> ReferralServiceResult<Referral> {
        let UpdateReferralRequest {
            referral_id,
            priority,
            clinical,
            intervention_type_ids,
        } = request;

        let new_priority = Priority::from_label(&priority)?;
        let mut referral = self.load(referral_id).await?;
        referral.ensure_open_for("edit")?;
        for intervention_type_id in &intervention_type_ids {
            self.require(*intervention_type_id).await?;
        }

        referral.edit(
            ReferralEdit {
                priority: new_priority,
                clinical,
                intervention_type_ids,
            },
            &*self.clock,
        )?;
        self.save(&referral).await?;
        tracing::info!(referral_id = %referral.id(), "referral updated");
        Ok(referral)
    }

    /// Retrieves a referral by identifier, hidden or not.
    ///
    /// # Errors
    ///
    /// Returns repository errors from persistence lookup.
    pub async fn find_by_id(&self, id: ReferralId) -> ReferralServiceResult<Option<Referral>> {
        tracing::debug!(referral_id = %id, "looking up referral");
        Ok(
            with_retry(self.retry_policy, "find referral", || {
                self.repository.find_by_id(id)
            })
            .await?,
        )
    }

    /// Lists referrals matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns repository errors from persistence lookup.
    pub async fn list(&self, filter: &ReferralFilter) -> ReferralServiceResult<Vec<Referral>> {
        Ok(
            with_retry(self.retry_policy, "list referrals", || {
                self.repository.list(filter)
            })
            .await?,
        )
    }

    /// Hides an active referral or restores a hidden one.
    ///
    /// # Errors
    ///
    /// Returns [`ReferralServiceError::NotFound`] for unknown referrals and
    /// repository errors from persistence.
    pub async fn toggle_hide(&self, id: ReferralId) -> ReferralServiceResult<Referral> {
        let mut referral = self.load(id).await?;
        let state = referral.toggle_hidden(&*self.clock);
        self.save(&referral).await?;
        tracing::info!(referral_id = %id, state = %state, "referral visibility toggled");
        Ok(referral)
    }

    /// Computes counts over all active referrals.
    ///
    /// # Errors
    ///
    /// Returns repository errors from persistence lookup.
    pub async fn summary(&self) -> ReferralServiceResult<ReferralSummary> {
        let referrals = self.list(&ReferralFilter::default()).await?;
        Ok(compute_referral_summary(&referrals))
    }
}
