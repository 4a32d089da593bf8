//! Diesel schema for referral persistence.

diesel::table! {
    /// Referral records with their redirect chain.
    referrals (id) {
        /// Referral identifier.
        id -> Uuid,
        /// Referred patient.
        patient_id -> Uuid,
        /// Referring department.
        origin_department_id -> Uuid,
        /// Department currently responsible for triage.
        destination_department_id -> Uuid,
        /// Target of the latest redirect.
        redirect_to_department_id -> Nullable<Uuid>,
        /// Priority code.
        priority -> Int2,
        /// Triage status code.
        triage_status -> Int2,
        /// Notes from the latest triage decision.
        triage_notes -> Nullable<Text>,
        /// Referring staff member.
        referring_staff_id -> Uuid,
        /// Working diagnosis.
        diagnosis -> Text,
        /// Treatment goals.
        goals -> Text,
        /// Instructions for the destination department.
        instructions -> Text,
        /// Requested intervention type identifiers.
        intervention_type_ids -> Jsonb,
        /// Redirect hops in order.
        redirect_history -> Jsonb,
        /// Review escalation flag.
        needs_review -> Bool,
        /// Task created from this referral.
        converted_to_task_id -> Nullable<Uuid>,
        /// Visibility code.
        record_state -> Int2,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
