//! Diesel schema for task and intervention persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Patient receiving care.
        patient_id -> Uuid,
        /// Responsible department; null only on legacy rows.
        department_id -> Nullable<Uuid>,
        /// Priority code.
        priority -> Int2,
        /// First planned day.
        start_date -> Date,
        /// Last planned day.
        end_date -> Date,
        /// Working diagnosis.
        diagnosis -> Text,
        /// Treatment goals.
        goals -> Text,
        /// Free-text description.
        description -> Text,
        /// Completion day.
        completed_on -> Nullable<Date>,
        /// Completion outcome notes.
        outcome_notes -> Nullable<Text>,
        /// Status code written by legacy rows.
        declared_status -> Nullable<Int2>,
        /// Visibility code.
        record_state -> Int2,
        /// Originating referral.
        referral_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Optimistic concurrency counter.
        revision -> Int8,
    }
}

diesel::table! {
    /// Interventions scheduled inside a task.
    interventions (id) {
        /// Intervention identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Intervention type.
        intervention_type_id -> Uuid,
        /// Assigned staff member.
        staff_id -> Uuid,
        /// Ward.
        ward_id -> Uuid,
        /// First day.
        start_date -> Date,
        /// Last day.
        end_date -> Date,
        /// One-based display position within the task.
        sequence_number -> Int4,
    }
}

diesel::joinable!(interventions -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, interventions);
