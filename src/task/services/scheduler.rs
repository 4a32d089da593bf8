//! Intervention scheduling against staff availability.

use super::{
    InterventionRequest, StaffBooking, TaskServiceResult, UpdateInterventionRequest,
    edit::edit_task, references::resolve_plan,
};
use crate::config::CarePathConfig;
use crate::directory::{StaffId, ports::ReferenceDirectory};
use crate::resilience::{RetryPolicy, with_retry};
use crate::task::{
    domain::{Intervention, InterventionId, SequenceNumber, TaskDomainError, TaskId},
    ports::{TaskFilter, TaskRepository},
};
use mockable::Clock;
use std::sync::Arc;

/// Adds, reschedules and removes interventions on existing tasks.
///
/// Every change is written through [`TaskRepository::update`], which rejects
/// the whole write when any intervention of the task would double-book its
/// staff member. Concurrent changes to one task are reapplied to the fresh
/// copy rather than overwritten.
#[derive(Clone)]
pub struct InterventionScheduler<T, D, C>
where
    T: TaskRepository,
    D: ReferenceDirectory,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    directory: Arc<D>,
    clock: Arc<C>,
    retry_policy: RetryPolicy,
}

impl<T, D, C> InterventionScheduler<T, D, C>
where
    T: TaskRepository,
    D: ReferenceDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a scheduler with the default retry policy.
    #[must_use]
    pub fn new(tasks: Arc<T>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            directory,
            clock,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Applies the retry policy from configuration.
    #[must_use]
    pub const fn with_config(mut self, config: &CarePathConfig) -> Self {
        self.retry_policy = config.retry;
        self
    }

    /// Schedules a new intervention at the end of the task's sequence.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown tasks, validation
    /// errors for bad dates or ranges outside the task, directory errors for
    /// unresolved references, `InvalidStateTransition` for completed tasks
    /// and `SchedulingConflict` when the staff member is already booked.
    pub async fn add_intervention(
        &self,
        task_id: TaskId,
        request: InterventionRequest,
    ) -> TaskServiceResult<Intervention> {
        let plan = resolve_plan(&*self.directory, self.retry_policy, request).await?;
        let clock = &*self.clock;
        let (_, intervention) = edit_task(&*self.tasks, self.retry_policy, task_id, |task| {
            Ok(task.add_intervention(plan.clone(), clock)?)
        })
        .await?;

        tracing::info!(
            task_id = %task_id,
            intervention_id = %intervention.id(),
            staff_id = %intervention.staff_id(),
            period = %intervention.period(),
            "intervention scheduled"
        );
        Ok(intervention)
    }

    /// Replaces an intervention's type, staff, ward and dates, optionally
    /// moving it to another display position.
    ///
    /// # Errors
    ///
    /// As for [`Self::add_intervention`], plus `NotFound` for unknown
    /// interventions and a validation error for position zero.
    pub async fn update_intervention(
        &self,
        request: UpdateInterventionRequest,
    ) -> TaskServiceResult<Intervention> {
        let UpdateInterventionRequest {
            task_id,
            intervention_id,
            intervention,
            position,
        } = request;

        let sequence = position.map(SequenceNumber::new).transpose()?;
        let plan = resolve_plan(&*self.directory, self.retry_policy, intervention).await?;
        let clock = &*self.clock;
        let (task, ()) = edit_task(&*self.tasks, self.retry_policy, task_id, |task| {
            Ok(task.update_intervention(intervention_id, plan.clone(), sequence, clock)?)
        })
        .await?;

        let updated = task
            .intervention(intervention_id)
            .cloned()
            .ok_or(TaskDomainError::InterventionNotFound {
                task_id,
                intervention_id,
            })?;
        tracing::info!(
            task_id = %task_id,
            intervention_id = %intervention_id,
            sequence = updated.sequence().value(),
            period = %updated.period(),
            "intervention rescheduled"
        );
        Ok(updated)
    }

    /// Removes an intervention and closes the gap in the sequence.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown tasks or interventions and
    /// `InvalidStateTransition` for completed tasks.
    pub async fn remove_intervention(
        &self,
        task_id: TaskId,
        intervention_id: InterventionId,
    ) -> TaskServiceResult<Intervention> {
        let clock = &*self.clock;
        let (_, removed) = edit_task(&*self.tasks, self.retry_policy, task_id, |task| {
            Ok(task.remove_intervention(intervention_id, clock)?)
        })
        .await?;
        tracing::info!(
            task_id = %task_id,
            intervention_id = %intervention_id,
            "intervention removed"
        );
        Ok(removed)
    }

    /// Lists a staff member's bookings on active tasks, earliest first.
    ///
    /// # Errors
    ///
    /// Returns repository errors from persistence lookup.
    pub async fn staff_schedule(&self, staff_id: StaffId) -> TaskServiceResult<Vec<StaffBooking>> {
        let filter = TaskFilter {
            staff_id: Some(staff_id),
            ..TaskFilter::default()
        };
        let tasks = with_retry(self.retry_policy, "list tasks", || self.tasks.list(&filter)).await?;

        let mut bookings: Vec<StaffBooking> = tasks
            .iter()
            .flat_map(|task| {
                task.interventions()
                    .iter()
                    .filter(|intervention| intervention.staff_id() == staff_id)
                    .map(|intervention| StaffBooking {
                        task_id: task.id(),
                        patient_id: task.patient_id(),
                        intervention: intervention.clone(),
                    })
            })
            .collect();
        bookings.sort_by_key(|booking| {
            (
                booking.intervention.period().start(),
                booking.intervention.period().end(),
            )
        });
        Ok(bookings)
    }
}
