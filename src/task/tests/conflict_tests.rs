//! Tests for staff double-booking detection.

use super::support::{plan, range, task_with};
use crate::directory::StaffId;
use crate::task::domain::{find_staff_conflict, find_task_conflict};
use crate::test_support::FixedClock;
use rstest::rstest;

#[rstest]
fn overlapping_booking_on_another_ward_conflicts() {
    let staff = StaffId::new();
    let existing = task_with(
        "2024-02-01",
        "2024-02-29",
        vec![plan(staff, "2024-02-01", "2024-02-05")],
    );
    let proposed = task_with(
        "2024-02-01",
        "2024-02-29",
        vec![plan(staff, "2024-02-03", "2024-02-10")],
    );

    let conflict = find_task_conflict(&proposed, [&existing]).expect("staff is double-booked");

    let booked = existing.interventions().first().expect("one booking");
    assert_eq!(conflict.staff_id, staff);
    assert_eq!(conflict.conflicting_task_id, existing.id());
    assert_eq!(conflict.conflicting_intervention_id, booked.id());
    assert_eq!(conflict.conflicting_period, range("2024-02-01", "2024-02-05"));
    assert!(conflict.to_string().contains("2024-02-01..2024-02-05"));
}

#[rstest]
fn other_staff_and_disjoint_days_do_not_conflict() {
    let staff = StaffId::new();
    let existing = task_with(
        "2024-02-01",
        "2024-02-29",
        vec![
            plan(staff, "2024-02-01", "2024-02-05"),
            plan(StaffId::new(), "2024-02-06", "2024-02-10"),
        ],
    );
    let proposed = task_with(
        "2024-02-01",
        "2024-02-29",
        vec![
            plan(staff, "2024-02-06", "2024-02-10"),
            plan(StaffId::new(), "2024-02-01", "2024-02-05"),
        ],
    );

    assert_eq!(find_task_conflict(&proposed, [&existing]), None);
}

#[rstest]
fn hidden_tasks_free_their_bookings() {
    let staff = StaffId::new();
    let mut existing = task_with(
        "2024-02-01",
        "2024-02-29",
        vec![plan(staff, "2024-02-01", "2024-02-05")],
    );
    existing.toggle_hidden(&FixedClock::default());
    let proposed = task_with(
        "2024-02-01",
        "2024-02-29",
        vec![plan(staff, "2024-02-01", "2024-02-05")],
    );

    assert_eq!(find_task_conflict(&proposed, [&existing]), None);
    assert!(find_task_conflict(&existing, [&proposed]).is_none());
}

#[rstest]
fn siblings_within_one_task_conflict() {
    let staff = StaffId::new();
    let task = task_with(
        "2024-02-01",
        "2024-02-29",
        vec![
            plan(staff, "2024-02-01", "2024-02-05"),
            plan(staff, "2024-02-05", "2024-02-07"),
        ],
    );

    let conflict = find_task_conflict(&task, std::iter::empty()).expect("sibling overlap");
    assert_eq!(conflict.conflicting_task_id, task.id());
}

#[rstest]
fn stored_copy_of_same_task_is_ignored() {
    let staff = StaffId::new();
    let stored = task_with(
        "2024-02-01",
        "2024-02-29",
        vec![plan(staff, "2024-02-01", "2024-02-05")],
    );
    let mut edited = stored.clone();
    edited
        .add_intervention(plan(staff, "2024-02-10", "2024-02-12"), &FixedClock::default())
        .expect("intervention fits");

    assert_eq!(find_task_conflict(&edited, [&stored]), None);
}

#[rstest]
fn single_intervention_does_not_conflict_with_itself() {
    let staff = StaffId::new();
    let task = task_with(
        "2024-02-01",
        "2024-02-29",
        vec![plan(staff, "2024-02-01", "2024-02-05")],
    );
    let candidate = task.interventions().first().expect("one booking");

    assert_eq!(find_staff_conflict(candidate, [&task]), None);
}
