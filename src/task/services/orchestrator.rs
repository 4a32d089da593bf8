//! Task creation, revision, completion and visibility.

use super::{
    CreateTaskRequest, TaskServiceError, TaskServiceResult, TaskView, UpdateTaskRequest,
    edit::edit_task,
    references::{require, resolve_plan},
};
use crate::config::CarePathConfig;
use crate::directory::{PatientId, ports::ReferenceDirectory};
use crate::normalization::{CodedEnum, Priority, TaskStatus};
use crate::referral::{
    domain::{Referral, ReferralDomainError, ReferralId},
    ports::ReferralRepository,
};
use crate::resilience::{RetryPolicy, with_retry};
use crate::summary::{TaskSummary, compute_task_summary};
use crate::task::{
    domain::{DateRange, Task, TaskDraft, TaskId, TaskRevision},
    ports::{TaskFilter, TaskRepository},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;

/// Task orchestration service.
#[derive(Clone)]
pub struct TaskOrchestrator<T, R, D, C>
where
    T: TaskRepository,
    R: ReferralRepository,
    D: ReferenceDirectory,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    referrals: Arc<R>,
    directory: Arc<D>,
    clock: Arc<C>,
    retry_policy: RetryPolicy,
}

impl<T, R, D, C> TaskOrchestrator<T, R, D, C>
where
    T: TaskRepository,
    R: ReferralRepository,
    D: ReferenceDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new orchestrator with the default retry policy.
    #[must_use]
    pub fn new(tasks: Arc<T>, referrals: Arc<R>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            referrals,
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

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }

    async fn load(&self, id: TaskId) -> TaskServiceResult<Task> {
        with_retry(self.retry_policy, "find task", || self.tasks.find_by_id(id))
            .await?
            .ok_or(TaskServiceError::NotFound(id))
    }

    async fn load_convertible_referral(
        &self,
        referral_id: ReferralId,
        patient_id: PatientId,
    ) -> TaskServiceResult<Referral> {
        let referral = with_retry(self.retry_policy, "find referral", || {
            self.referrals.find_by_id(referral_id)
        })
        .await?
        .ok_or(TaskServiceError::ReferralNotFound(referral_id))?;

        referral.ensure_convertible()?;
        if referral.patient_id() != patient_id {
            return Err(ReferralDomainError::PatientMismatch {
                referral_id,
                expected: referral.patient_id(),
                actual: patient_id,
            }
            .into());
        }
        Ok(referral)
    }

    /// Creates a task, optionally converting an accepted referral.
    ///
    /// When a referral is given, blank clinical fields are filled from it
    /// and the referral is claimed for the new task before the task is
    /// stored. A failed store releases the claim.
    ///
    /// # Errors
    ///
    /// Returns validation errors for bad dates, priorities or intervention
    /// ranges, `NotFound` for unresolved references, `InvalidStateTransition`
    /// for referrals that are not accepted, `AlreadyConverted` for referrals
    /// that already produced a task, and `SchedulingConflict` when an initial
    /// intervention double-books a staff member.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskServiceResult<TaskView> {
        let CreateTaskRequest {
            patient_id,
            department_id,
            priority,
            start,
            end,
            details,
            interventions,
            referral_id,
        } = request;

        let priority_code = Priority::from_label(&priority)?;
        let period = DateRange::new(start, end)?;
        require(&*self.directory, self.retry_policy, patient_id).await?;
        require(&*self.directory, self.retry_policy, department_id).await?;
        let mut plans = Vec::with_capacity(interventions.len());
        for intervention in interventions {
            plans.push(resolve_plan(&*self.directory, self.retry_policy, intervention).await?);
        }

        let referral = match referral_id {
            Some(id) => Some(self.load_convertible_referral(id, patient_id).await?),
            None => None,
        };
        let mut filled_details = details;
        if let Some(source) = &referral {
            filled_details = filled_details.backfilled_from(source.clinical());
        }

        let task = Task::new(
            TaskDraft {
                patient_id,
                department_id,
                priority: priority_code,
                period,
                details: filled_details,
                referral_id,
                interventions: plans,
            },
            &*self.clock,
        )?;

        match referral {
            Some(source) => self.store_converted(&task, source).await?,
            None => {
                with_retry(self.retry_policy, "store task", || self.tasks.store(&task)).await?;
            }
        }

        tracing::info!(
            task_id = %task.id(),
            referral_id = ?referral_id,
            interventions = task.interventions().len(),
            "task created"
        );
        Ok(TaskView::at(task, self.today()))
    }

    async fn store_converted(&self, task: &Task, mut referral: Referral) -> TaskServiceResult<()> {
        referral.mark_converted(task.id(), &*self.clock)?;
        let claimed = &referral;
        with_retry(self.retry_policy, "claim referral", || {
            self.referrals.claim_conversion(claimed, task.id())
        })
        .await?;

        let stored = with_retry(self.retry_policy, "store task", || self.tasks.store(task)).await;
        if let Err(err) = stored {
            tracing::warn!(
                task_id = %task.id(),
                referral_id = %referral.id(),
                "task store failed; releasing referral claim"
            );
            let released = with_retry(self.retry_policy, "release referral", || {
                self.referrals.release_conversion(referral.id(), task.id())
            })
            .await;
            if let Err(release_err) = released {
                tracing::error!(
                    task_id = %task.id(),
                    referral_id = %referral.id(),
                    error = %TaskServiceError::from(release_err),
                    "referral claim could not be released"
                );
            }
            return Err(err.into());
        }
        Ok(())
    }

    /// Replaces a task's department, priority, dates and clinical text.
    ///
    /// Any status carried over from a legacy row is cleared; status is
    /// derived from then on.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for unknown tasks and a
    /// validation error naming the first intervention that no longer fits
    /// the new range.
    pub async fn update_task(&self, request: UpdateTaskRequest) -> TaskServiceResult<TaskView> {
        let UpdateTaskRequest {
            task_id,
            department_id,
            priority,
            start,
            end,
            details,
        } = request;

        let priority_code = Priority::from_label(&priority)?;
        let period = DateRange::new(start, end)?;
        require(&*self.directory, self.retry_policy, department_id).await?;

        let revision = TaskRevision {
            department_id,
            priority: priority_code,
            period,
            details,
        };
        let clock = &*self.clock;
        let (task, ()) = edit_task(&*self.tasks, self.retry_policy, task_id, |task| {
            Ok(task.revise(revision.clone(), clock)?)
        })
        .await?;
        tracing::info!(task_id = %task_id, "task updated");
        Ok(TaskView::at(task, self.today()))
    }

    /// Completes a task today with outcome notes.
    ///
    /// Completing an already completed task changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for unknown tasks and a
    /// validation error for blank notes.
    pub async fn complete_task(
        &self,
        task_id: TaskId,
        outcome_notes: &str,
    ) -> TaskServiceResult<TaskView> {
        let mut current = self.load(task_id).await?;
        if !current.complete(outcome_notes, &*self.clock)? {
            tracing::debug!(task_id = %task_id, "task already completed");
            return Ok(TaskView::at(current, self.today()));
        }

        let clock = &*self.clock;
        let (task, _) = edit_task(&*self.tasks, self.retry_policy, task_id, |task| {
            Ok(task.complete(outcome_notes, clock)?)
        })
        .await?;
        tracing::info!(task_id = %task_id, "task completed");
        Ok(TaskView::at(task, self.today()))
    }

    /// Hides an active task or restores a hidden one.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for unknown tasks and
    /// `SchedulingConflict` when a restored task's interventions clash with
    /// bookings made while it was hidden.
    pub async fn toggle_hide(&self, task_id: TaskId) -> TaskServiceResult<TaskView> {
        let clock = &*self.clock;
        let (task, state) = edit_task(&*self.tasks, self.retry_policy, task_id, |task| {
            Ok(task.toggle_hidden(clock))
        })
        .await?;
        tracing::info!(task_id = %task_id, state = %state, "task visibility toggled");
        Ok(TaskView::at(task, self.today()))
    }

    /// Retrieves a task, hidden or not.
    ///
    /// # Errors
    ///
    /// Returns repository errors from persistence lookup.
    pub async fn find_by_id(&self, task_id: TaskId) -> TaskServiceResult<Option<TaskView>> {
        tracing::debug!(task_id = %task_id, "looking up task");
        let task = with_retry(self.retry_policy, "find task", || {
            self.tasks.find_by_id(task_id)
        })
        .await?;
        Ok(task.map(|found| TaskView::at(found, self.today())))
    }

    /// Retrieves the task converted from `referral_id`, hidden or not.
    ///
    /// # Errors
    ///
    /// Returns repository errors from persistence lookup.
    pub async fn find_by_referral(
        &self,
        referral_id: ReferralId,
    ) -> TaskServiceResult<Option<TaskView>> {
        let task = with_retry(self.retry_policy, "find task by referral", || {
            self.tasks.find_by_referral(referral_id)
        })
        .await?;
        Ok(task.map(|found| TaskView::at(found, self.today())))
    }

    /// Lists tasks matching `filter`, optionally restricted to one derived
    /// status.
    ///
    /// # Errors
    ///
    /// Returns repository errors from persistence lookup.
    pub async fn list(
        &self,
        filter: &TaskFilter,
        status: Option<TaskStatus>,
    ) -> TaskServiceResult<Vec<TaskView>> {
        let today = self.today();
        let tasks = with_retry(self.retry_policy, "list tasks", || self.tasks.list(filter)).await?;
        Ok(tasks
            .into_iter()
            .map(|task| TaskView::at(task, today))
            .filter(|view| status.is_none_or(|wanted| view.status == wanted))
            .collect())
    }

    /// Lists active tasks that are overdue today.
    ///
    /// # Errors
    ///
    /// Returns repository errors from persistence lookup.
    pub async fn overdue_tasks(&self) -> TaskServiceResult<Vec<TaskView>> {
        let views = self.list(&TaskFilter::default(), None).await?;
        Ok(views.into_iter().filter(|view| view.overdue).collect())
    }

    /// Computes counts over all active tasks for today.
    ///
    /// # Errors
    ///
    /// Returns repository errors from persistence lookup.
    pub async fn summary(&self) -> TaskServiceResult<TaskSummary> {
        let filter = TaskFilter::default();
        let tasks = with_retry(self.retry_policy, "list tasks", || self.tasks.list(&filter)).await?;
        Ok(compute_task_summary(&tasks, self.today()))
    }
}
