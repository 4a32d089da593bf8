//! Diesel row models for referral persistence.

use super::schema::referrals;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for referral records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = referrals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReferralRow {
    pub id: uuid::Uuid,
    pub patient_id: uuid::Uuid,
    pub origin_department_id: uuid::Uuid,
    pub destination_department_id: uuid::Uuid,
    pub redirect_to_department_id: Option<uuid::Uuid>,
    pub priority: i16,
    pub triage_status: i16,
    pub triage_notes: Option<String>,
    pub referring_staff_id: uuid::Uuid,
    pub diagnosis: String,
    pub goals: String,
    pub instructions: String,
    pub intervention_type_ids: Value,
    pub redirect_history: Value,
    pub needs_review: bool,
    pub converted_to_task_id: Option<uuid::Uuid>,
    pub record_state: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for referral records.
///
/// The conversion link is absent on purpose: it is only written through the
/// claim and release statements.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = referrals)]
#[diesel(treat_none_as_null = true)]
pub struct ReferralWriteRow {
    pub id: uuid::Uuid,
    pub patient_id: uuid::Uuid,
    pub origin_department_id: uuid::Uuid,
    pub destination_department_id: uuid::Uuid,
    pub redirect_to_department_id: Option<uuid::Uuid>,
    pub priority: i16,
    pub triage_status: i16,
    pub triage_notes: Option<String>,
    pub referring_staff_id: uuid::Uuid,
    pub diagnosis: String,
    pub goals: String,
    pub instructions: String,
    pub intervention_type_ids: Value,
    pub redirect_history: Value,
    pub needs_review: bool,
    pub record_state: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
