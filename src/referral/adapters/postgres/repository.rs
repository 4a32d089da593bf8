//! `PostgreSQL` repository implementation for referral storage.

use super::{
    models::{ReferralRow, ReferralWriteRow},
    schema::referrals,
};
use crate::directory::{DepartmentId, InterventionTypeId, PatientId, StaffId};
use crate::normalization::{CodedEnum, Priority, RecordState, TriageStatus};
use crate::referral::{
    domain::{PersistedReferralData, RedirectHop, Referral, ReferralClinicalText, ReferralId},
    ports::{ReferralFilter, ReferralRepository, ReferralRepositoryError, ReferralRepositoryResult},
};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by referral adapters.
pub type ReferralPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed referral repository.
#[derive(Debug, Clone)]
pub struct PostgresReferralRepository {
    pool: ReferralPgPool,
}

impl PostgresReferralRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ReferralPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ReferralRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ReferralRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ReferralRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ReferralRepositoryError::persistence)?
    }
}

#[async_trait]
impl ReferralRepository for PostgresReferralRepository {
    async fn store(&self, referral: &Referral) -> ReferralRepositoryResult<()> {
        let referral_id = referral.id();
        let row = to_write_row(referral)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(referrals::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ReferralRepositoryError::DuplicateReferral(referral_id)
                    }
                    _ => ReferralRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, referral: &Referral) -> ReferralRepositoryResult<()> {
        let referral_id = referral.id();
        let row = to_write_row(referral)?;

        self.run_blocking(move |connection| {
            let affected = diesel::update(referrals::table.find(referral_id.into_inner()))
                .set(&row)
                .execute(connection)
                .map_err(ReferralRepositoryError::persistence)?;
            if affected == 0 {
                return Err(ReferralRepositoryError::NotFound(referral_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ReferralId) -> ReferralRepositoryResult<Option<Referral>> {
        self.run_blocking(move |connection| {
            find_row(connection, id)?.map(row_to_referral).transpose()
        })
        .await
    }

    async fn list(&self, filter: &ReferralFilter) -> ReferralRepositoryResult<Vec<Referral>> {
        let criteria = filter.clone();
        self.run_blocking(move |connection| {
            let mut query = referrals::table
                .select(ReferralRow::as_select())
                .order(referrals::created_at.asc())
                .into_boxed();
            if !criteria.include_hidden {
                query = query.filter(referrals::record_state.eq(RecordState::Active.code()));
            }
            if let Some(patient_id) = criteria.patient_id {
                query = query.filter(referrals::patient_id.eq(patient_id.into_inner()));
            }
            if let Some(department) = criteria.destination_department {
                query = query
                    .filter(referrals::destination_department_id.eq(department.into_inner()));
            }
            if let Some(status) = criteria.triage_status {
                query = query.filter(referrals::triage_status.eq(status.code()));
            }

            query
                .load::<ReferralRow>(connection)
                .map_err(ReferralRepositoryError::persistence)?
                .into_iter()
                .map(row_to_referral)
                .collect()
        })
        .await
    }

    async fn claim_conversion(
        &self,
        referral: &Referral,
        task_id: TaskId,
    ) -> ReferralRepositoryResult<()> {
        let referral_id = referral.id();
        let claimed_at = referral.updated_at();

        self.run_blocking(move |connection| {
            let affected = diesel::update(
                referrals::table
                    .find(referral_id.into_inner())
                    .filter(referrals::converted_to_task_id.is_null()),
            )
            .set((
                referrals::converted_to_task_id.eq(Some(task_id.into_inner())),
                referrals::updated_at.eq(claimed_at),
            ))
            .execute(connection)
            .map_err(ReferralRepositoryError::persistence)?;

            if affected == 1 {
                return Ok(());
            }
            let existing = find_row(connection, referral_id)?
                .ok_or(ReferralRepositoryError::NotFound(referral_id))?;
            Err(ReferralRepositoryError::AlreadyClaimed {
                referral_id,
                task_id: existing
                    .converted_to_task_id
                    .map_or(task_id, TaskId::from_uuid),
            })
        })
        .await
    }

    async fn release_conversion(
        &self,
        id: ReferralId,
        task_id: TaskId,
    ) -> ReferralRepositoryResult<()> {
        self.run_blocking(move |connection| {
            diesel::update(
                referrals::table
                    .find(id.into_inner())
                    .filter(referrals::converted_to_task_id.eq(task_id.into_inner())),
            )
            .set(referrals::converted_to_task_id.eq(None::<uuid::Uuid>))
            .execute(connection)
            .map_err(ReferralRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }
}

fn find_row(
    connection: &mut PgConnection,
    id: ReferralId,
) -> ReferralRepositoryResult<Option<ReferralRow>> {
    referrals::table
        .find(id.into_inner())
        .select(ReferralRow::as_select())
        .first::<ReferralRow>(connection)
        .optional()
        .map_err(ReferralRepositoryError::persistence)
}

fn to_write_row(referral: &Referral) -> ReferralRepositoryResult<ReferralWriteRow> {
    let intervention_type_ids = serde_json::to_value(referral.intervention_type_ids())
        .map_err(ReferralRepositoryError::persistence)?;
    let redirect_history = serde_json::to_value(referral.redirect_history())
        .map_err(ReferralRepositoryError::persistence)?;
    let clinical = referral.clinical();

    Ok(ReferralWriteRow {
        id: referral.id().into_inner(),
        patient_id: referral.patient_id().into_inner(),
        origin_department_id: referral.origin_department().into_inner(),
        destination_department_id: referral.destination_department().into_inner(),
        redirect_to_department_id: referral.redirect_to_department().map(DepartmentId::into_inner),
        priority: referral.priority().code(),
        triage_status: referral.triage_status().code(),
        triage_notes: referral.triage_notes().map(str::to_owned),
        referring_staff_id: referral.referring_staff_id().into_inner(),
        diagnosis: clinical.diagnosis().to_owned(),
        goals: clinical.goals().to_owned(),
        instructions: clinical.instructions().to_owned(),
        intervention_type_ids,
        redirect_history,
        needs_review: referral.needs_review(),
        record_state: referral.record_state().code(),
        created_at: referral.created_at(),
        updated_at: referral.updated_at(),
    })
}

fn row_to_referral(row: ReferralRow) -> ReferralRepositoryResult<Referral> {
    let ReferralRow {
        id,
        patient_id,
        origin_department_id,
        destination_department_id,
        redirect_to_department_id,
        priority,
        triage_status,
        triage_notes,
        referring_staff_id,
        diagnosis,
        goals,
        instructions,
        intervention_type_ids: persisted_type_ids,
        redirect_history: persisted_history,
        needs_review,
        converted_to_task_id,
        record_state,
        created_at,
        updated_at,
    } = row;

    let intervention_type_ids =
        serde_json::from_value::<Vec<InterventionTypeId>>(persisted_type_ids)
            .map_err(ReferralRepositoryError::corrupt)?;
    let redirect_history = serde_json::from_value::<Vec<RedirectHop>>(persisted_history)
        .map_err(ReferralRepositoryError::corrupt)?;

    Ok(Referral::from_persisted(PersistedReferralData {
        id: ReferralId::from_uuid(id),
        patient_id: PatientId::from_uuid(patient_id),
        origin_department: DepartmentId::from_uuid(origin_department_id),
        destination_department: DepartmentId::from_uuid(destination_department_id),
        redirect_to_department: redirect_to_department_id.map(DepartmentId::from_uuid),
        priority: Priority::from_code(priority).map_err(ReferralRepositoryError::corrupt)?,
        triage_status: TriageStatus::from_code(triage_status)
            .map_err(ReferralRepositoryError::corrupt)?,
        triage_notes,
        referring_staff_id: StaffId::from_uuid(referring_staff_id),
        clinical: ReferralClinicalText::new(diagnosis, goals, instructions),
        intervention_type_ids,
        redirect_history,
        needs_review,
        converted_to_task_id: converted_to_task_id.map(TaskId::from_uuid),
        record_state: RecordState::from_code(record_state)
            .map_err(ReferralRepositoryError::corrupt)?,
        created_at,
        updated_at,
    }))
}
