//! In-memory repository for referral tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::referral::{
    domain::{Referral, ReferralId},
    ports::{ReferralFilter, ReferralRepository, ReferralRepositoryError, ReferralRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory referral repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferralRepository {
    state: Arc<RwLock<InMemoryReferralState>>,
}

#[derive(Debug, Default)]
struct InMemoryReferralState {
    referrals: HashMap<ReferralId, Referral>,
    insertion_order: Vec<ReferralId>,
}

impl InMemoryReferralRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> ReferralRepositoryError {
    ReferralRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ReferralRepository for InMemoryReferralRepository {
    async fn store(&self, referral: &Referral) -> ReferralRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.referrals.contains_key(&referral.id()) {
            return Err(ReferralRepositoryError::DuplicateReferral(referral.id()));
        }
        state.insertion_order.push(referral.id());
        state.referrals.insert(referral.id(), referral.clone());
        Ok(())
    }

    async fn update(&self, referral: &Referral) -> ReferralRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored_link = state
            .referrals
            .get(&referral.id())
            .ok_or(ReferralRepositoryError::NotFound(referral.id()))?
            .converted_to_task_id();

        let mut updated = referral.clone();
        updated.set_conversion_link(stored_link, referral.updated_at());
        state.referrals.insert(referral.id(), updated);
        Ok(())
    }

    async fn find_by_id(&self, id: ReferralId) -> ReferralRepositoryResult<Option<Referral>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.referrals.get(&id).cloned())
    }

    async fn list(&self, filter: &ReferralFilter) -> ReferralRepositoryResult<Vec<Referral>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .insertion_order
            .iter()
            .filter_map(|id| state.referrals.get(id))
            .filter(|referral| filter.matches(referral))
            .cloned()
            .collect())
    }

    async fn claim_conversion(
        &self,
        referral: &Referral,
        task_id: TaskId,
    ) -> ReferralRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .referrals
            .get_mut(&referral.id())
            .ok_or(ReferralRepositoryError::NotFound(referral.id()))?;

        if let Some(existing) = stored.converted_to_task_id() {
            return Err(ReferralRepositoryError::AlreadyClaimed {
                referral_id: referral.id(),
                task_id: existing,
            });
        }

        stored.set_conversion_link(Some(task_id), referral.updated_at());
        Ok(())
    }

    async fn release_conversion(
        &self,
        id: ReferralId,
        task_id: TaskId,
    ) -> ReferralRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .referrals
            .get_mut(&id)
            .ok_or(ReferralRepositoryError::NotFound(id))?;
        if stored.converted_to_task_id() == Some(task_id) {
            let at = stored.updated_at();
            stored.set_conversion_link(None, at);
        }
        Ok(())
    }
}
