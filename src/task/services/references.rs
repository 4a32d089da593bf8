//! Directory checks shared by the task services.

use super::{InterventionRequest, TaskServiceResult};
use crate::directory::{
    EntityRef,
    ports::{ReferenceDirectory, require_active},
};
use crate::resilience::{RetryPolicy, with_retry};
use crate::task::domain::{DateRange, InterventionPlan};

/// Fails unless `entity` resolves to an active directory entry.
pub(super) async fn require<D>(
    directory: &D,
    retry_policy: RetryPolicy,
    entity: impl Into<EntityRef>,
) -> TaskServiceResult<()>
where
    D: ReferenceDirectory + ?Sized,
{
    let reference = entity.into();
    with_retry(retry_policy, "directory lookup", || {
        require_active(directory, reference)
    })
    .await?;
    Ok(())
}

/// Validates an intervention request's dates and references.
pub(super) async fn resolve_plan<D>(
    directory: &D,
    retry_policy: RetryPolicy,
    request: InterventionRequest,
) -> TaskServiceResult<InterventionPlan>
where
    D: ReferenceDirectory + ?Sized,
{
    let period = DateRange::new(request.start, request.end)?;
    require(directory, retry_policy, request.intervention_type_id).await?;
    require(directory, retry_policy, request.staff_id).await?;
    require(directory, retry_policy, request.ward_id).await?;
    Ok(InterventionPlan {
        intervention_type_id: request.intervention_type_id,
        staff_id: request.staff_id,
        ward_id: request.ward_id,
        period,
    })
}
