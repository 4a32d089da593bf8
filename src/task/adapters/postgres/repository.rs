//! `PostgreSQL` repository implementation for task storage.
//!
//! Writes run in a `SERIALIZABLE` transaction so the staff conflict check
//! and the insert cannot interleave with a concurrent booking. A
//! serialization failure surfaces as a persistence error, which the service
//! layer retries. Updates are guarded by the `revision` column so a copy
//! loaded before another commit is refused rather than overwriting it.

use super::{
    models::{InterventionRow, TaskRow},
    schema::{interventions, tasks},
};
use crate::directory::{DepartmentId, InterventionTypeId, PatientId, StaffId, WardId};
use crate::normalization::{CodedEnum, Priority, RecordState, TaskStatus};
use crate::referral::domain::ReferralId;
use crate::task::{
    domain::{
        DateRange, Intervention, InterventionId, InterventionPlan, PersistedTaskData,
        SchedulingConflict, SequenceNumber, Task, TaskClinicalDetails, TaskCompletion, TaskId,
        find_task_conflict,
    },
    ports::{TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let owned = task.clone();
        let task_row = to_task_row(task)?;
        let intervention_rows = to_intervention_rows(task)?;

        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .serializable()
                .run::<_, TaskRepositoryError, _>(|tx| {
                    let exists: i64 = tasks::table
                        .filter(tasks::id.eq(task_row.id))
                        .count()
                        .get_result(tx)?;
                    if exists > 0 {
                        return Err(TaskRepositoryError::DuplicateTask(owned.id()));
                    }
                    ensure_no_conflict(tx, &owned)?;

                    diesel::insert_into(tasks::table)
                        .values(&task_row)
                        .execute(tx)
                        .map_err(|err| match err {
                            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                                TaskRepositoryError::DuplicateTask(owned.id())
                            }
                            _ => TaskRepositoryError::persistence(err),
                        })?;
                    insert_interventions(tx, &intervention_rows)
                })
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let owned = task.clone();
        let expected = task_row_revision(task.revision())?;
        let mut task_row = to_task_row(task)?;
        task_row.revision = expected.saturating_add(1);
        let intervention_rows = to_intervention_rows(task)?;

        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .serializable()
                .run::<_, TaskRepositoryError, _>(|tx| {
                    let affected = diesel::update(
                        tasks::table
                            .filter(tasks::id.eq(task_row.id))
                            .filter(tasks::revision.eq(expected)),
                    )
                    .set(&task_row)
                    .execute(tx)?;
                    if affected == 0 {
                        return Err(stale_or_missing(tx, &owned)?);
                    }
                    ensure_no_conflict(tx, &owned)?;

                    diesel::delete(
                        interventions::table.filter(interventions::task_id.eq(task_row.id)),
                    )
                    .execute(tx)?;
                    insert_interventions(tx, &intervention_rows)
                })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            Ok(load_tasks(connection, rows)?.into_iter().next())
        })
        .await
    }

    async fn find_by_referral(
        &self,
        referral_id: ReferralId,
    ) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::referral_id.eq(referral_id.into_inner()))
                .select(TaskRow::as_select())
                .limit(1)
                .load::<TaskRow>(connection)?;
            Ok(load_tasks(connection, rows)?.into_iter().next())
        })
        .await
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let criteria = filter.clone();
        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .select(TaskRow::as_select())
                .order(tasks::created_at.asc())
                .into_boxed();
            if !criteria.include_hidden {
                query = query.filter(tasks::record_state.eq(RecordState::Active.code()));
            }
            if let Some(patient_id) = criteria.patient_id {
                query = query.filter(tasks::patient_id.eq(patient_id.into_inner()));
            }
            if let Some(department) = criteria.department_id {
                query = query.filter(tasks::department_id.eq(department.into_inner()));
            }
            if let Some(staff_id) = criteria.staff_id {
                query = query.filter(
                    tasks::id.eq_any(
                        interventions::table
                            .filter(interventions::staff_id.eq(staff_id.into_inner()))
                            .select(interventions::task_id),
                    ),
                );
            }
            let rows = query.load::<TaskRow>(connection)?;
            load_tasks(connection, rows)
        })
        .await
    }
}

/// Explains why an update guarded by revision matched no row.
fn stale_or_missing(
    connection: &mut PgConnection,
    task: &Task,
) -> TaskRepositoryResult<TaskRepositoryError> {
    let stored = tasks::table
        .filter(tasks::id.eq(task.id().into_inner()))
        .select(tasks::revision)
        .first::<i64>(connection)
        .optional()?;
    Ok(match stored {
        None => TaskRepositoryError::NotFound(task.id()),
        Some(revision) => TaskRepositoryError::StaleWrite {
            task_id: task.id(),
            expected: task.revision(),
            stored: stored_revision(revision)?,
        },
    })
}

fn task_row_revision(revision: u64) -> TaskRepositoryResult<i64> {
    i64::try_from(revision).map_err(TaskRepositoryError::persistence)
}

fn stored_revision(revision: i64) -> TaskRepositoryResult<u64> {
    u64::try_from(revision).map_err(TaskRepositoryError::corrupt)
}

/// Rejects the write when `task` double-books a staff member, either among
/// its own interventions or against another active task.
fn ensure_no_conflict(connection: &mut PgConnection, task: &Task) -> TaskRepositoryResult<()> {
    if task.record_state().is_hidden() {
        return Ok(());
    }
    if let Some(conflict) = find_task_conflict(task, std::iter::empty::<&Task>()) {
        return Err(TaskRepositoryError::SchedulingConflict(conflict));
    }

    for candidate in task.interventions() {
        let period = candidate.period();
        let clash = interventions::table
            .inner_join(tasks::table)
            .filter(tasks::record_state.eq(RecordState::Active.code()))
            .filter(interventions::task_id.ne(task.id().into_inner()))
            .filter(interventions::staff_id.eq(candidate.staff_id().into_inner()))
            .filter(interventions::start_date.le(period.end()))
            .filter(interventions::end_date.ge(period.start()))
            .select(InterventionRow::as_select())
            .first::<InterventionRow>(connection)
            .optional()?;

        if let Some(row) = clash {
            return Err(TaskRepositoryError::SchedulingConflict(SchedulingConflict {
                staff_id: candidate.staff_id(),
                intervention_id: candidate.id(),
                conflicting_intervention_id: InterventionId::from_uuid(row.id),
                conflicting_task_id: TaskId::from_uuid(row.task_id),
                conflicting_period: DateRange::new(row.start_date, row.end_date)
                    .map_err(TaskRepositoryError::corrupt)?,
            }));
        }
    }
    Ok(())
}

fn insert_interventions(
    connection: &mut PgConnection,
    rows: &[InterventionRow],
) -> TaskRepositoryResult<()> {
    if rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(interventions::table)
        .values(rows)
        .execute(connection)?;
    Ok(())
}

fn load_tasks(
    connection: &mut PgConnection,
    rows: Vec<TaskRow>,
) -> TaskRepositoryResult<Vec<Task>> {
    let intervention_rows = InterventionRow::belonging_to(&rows)
        .select(InterventionRow::as_select())
        .order(interventions::sequence_number.asc())
        .load::<InterventionRow>(connection)?
        .grouped_by(&rows);

    rows.into_iter()
        .zip(intervention_rows)
        .map(|(row, children)| row_to_task(row, children))
        .collect()
}

fn to_task_row(task: &Task) -> TaskRepositoryResult<TaskRow> {
    let period = task.period();
    let details = task.details();
    Ok(TaskRow {
        id: task.id().into_inner(),
        patient_id: task.patient_id().into_inner(),
        department_id: task.department_id().map(DepartmentId::into_inner),
        priority: task.priority().code(),
        start_date: period.start(),
        end_date: period.end(),
        diagnosis: details.diagnosis().to_owned(),
        goals: details.goals().to_owned(),
        description: details.description().to_owned(),
        completed_on: task.completion().map(TaskCompletion::completed_on),
        outcome_notes: task
            .completion()
            .map(|completion| completion.outcome_notes().to_owned()),
        declared_status: task.declared_status().map(TaskStatus::code),
        record_state: task.record_state().code(),
        referral_id: task.referral_id().map(ReferralId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
        revision: task_row_revision(task.revision())?,
    })
}

fn to_intervention_rows(task: &Task) -> TaskRepositoryResult<Vec<InterventionRow>> {
    task.interventions()
        .iter()
        .map(|intervention| {
            let period = intervention.period();
            Ok(InterventionRow {
                id: intervention.id().into_inner(),
                task_id: task.id().into_inner(),
                intervention_type_id: intervention.intervention_type_id().into_inner(),
                staff_id: intervention.staff_id().into_inner(),
                ward_id: intervention.ward_id().into_inner(),
                start_date: period.start(),
                end_date: period.end(),
                sequence_number: i32::try_from(intervention.sequence().value())
                    .map_err(TaskRepositoryError::persistence)?,
            })
        })
        .collect()
}

fn row_to_intervention(row: InterventionRow) -> TaskRepositoryResult<Intervention> {
    let sequence = u32::try_from(row.sequence_number).map_err(TaskRepositoryError::corrupt)?;
    Ok(Intervention::from_persisted(
        InterventionId::from_uuid(row.id),
        InterventionPlan {
            intervention_type_id: InterventionTypeId::from_uuid(row.intervention_type_id),
            staff_id: StaffId::from_uuid(row.staff_id),
            ward_id: WardId::from_uuid(row.ward_id),
            period: DateRange::new(row.start_date, row.end_date)
                .map_err(TaskRepositoryError::corrupt)?,
        },
        SequenceNumber::new(sequence).map_err(TaskRepositoryError::corrupt)?,
    ))
}

fn row_to_task(row: TaskRow, children: Vec<InterventionRow>) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        patient_id,
        department_id,
        priority,
        start_date,
        end_date,
        diagnosis,
        goals,
        description,
        completed_on,
        outcome_notes,
        declared_status,
        record_state,
        referral_id,
        created_at,
        updated_at,
        revision,
    } = row;

    let completion = completed_on
        .map(|day| TaskCompletion::new(day, outcome_notes.unwrap_or_default()));
    let interventions = children
        .into_iter()
        .map(row_to_intervention)
        .collect::<TaskRepositoryResult<Vec<_>>>()?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        patient_id: PatientId::from_uuid(patient_id),
        department_id: department_id.map(DepartmentId::from_uuid),
        priority: Priority::from_code(priority).map_err(TaskRepositoryError::corrupt)?,
        period: DateRange::new(start_date, end_date).map_err(TaskRepositoryError::corrupt)?,
        details: TaskClinicalDetails::new(diagnosis, goals, description),
        completion,
        declared_status: declared_status
            .map(TaskStatus::from_code)
            .transpose()
            .map_err(TaskRepositoryError::corrupt)?,
        record_state: RecordState::from_code(record_state).map_err(TaskRepositoryError::corrupt)?,
        referral_id: referral_id.map(ReferralId::from_uuid),
        interventions,
        created_at,
        updated_at,
        revision: stored_revision(revision)?,
    }))
}
