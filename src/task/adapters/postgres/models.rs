//! Diesel row models for task persistence.

use super::schema::{interventions, tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Task row, used for reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    pub id: uuid::Uuid,
    pub patient_id: uuid::Uuid,
    pub department_id: Option<uuid::Uuid>,
    pub priority: i16,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub diagnosis: String,
    pub goals: String,
    pub description: String,
    pub completed_on: Option<NaiveDate>,
    pub outcome_notes: Option<String>,
    pub declared_status: Option<i16>,
    pub record_state: i16,
    pub referral_id: Option<uuid::Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub revision: i64,
}

/// Intervention row, used for reads and writes.
#[derive(
    Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations, Insertable,
)]
#[diesel(table_name = interventions)]
#[diesel(belongs_to(TaskRow, foreign_key = task_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InterventionRow {
    pub id: uuid::Uuid,
    pub task_id: uuid::Uuid,
    pub intervention_type_id: uuid::Uuid,
    pub staff_id: uuid::Uuid,
    pub ward_id: uuid::Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sequence_number: i32,
}
