//! Tests for inclusive date range arithmetic.

use super::support::range;
use crate::error::ErrorKind;
use crate::task::domain::{DateRange, TaskDomainError};
use crate::test_support::date;
use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case::shared_middle("2024-02-01", "2024-02-05", "2024-02-03", "2024-02-10", true)]
#[case::touching_edge("2024-02-01", "2024-02-05", "2024-02-05", "2024-02-06", true)]
#[case::nested("2024-02-01", "2024-02-10", "2024-02-03", "2024-02-04", true)]
#[case::adjacent("2024-02-01", "2024-02-05", "2024-02-06", "2024-02-10", false)]
#[case::disjoint("2024-02-01", "2024-02-02", "2024-03-01", "2024-03-02", false)]
fn overlap_is_inclusive(
    #[case] first_start: &str,
    #[case] first_end: &str,
    #[case] second_start: &str,
    #[case] second_end: &str,
    #[case] expected: bool,
) {
    let first = range(first_start, first_end);
    let second = range(second_start, second_end);
    assert_eq!(first.overlaps(second), expected);
}

#[test]
fn end_before_start_is_rejected() {
    let err = DateRange::new(date("2024-02-10"), date("2024-02-01"))
        .expect_err("reversed range is invalid");
    assert_eq!(
        err,
        TaskDomainError::InvalidDateRange {
            start: date("2024-02-10"),
            end: date("2024-02-01"),
        }
    );
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn single_day_range_is_valid() {
    let day = date("2024-02-29");
    assert_eq!(DateRange::new(day, day), Ok(DateRange::single_day(day)));
    assert_eq!(DateRange::single_day(day).to_string(), "2024-02-29..2024-02-29");
}

#[test]
fn deserialization_validates_order() {
    let parsed: Result<DateRange, _> =
        serde_json::from_str(r#"{"start":"2024-02-10","end":"2024-02-01"}"#);
    assert!(parsed.is_err());
}

fn arb_range() -> impl Strategy<Value = DateRange> {
    (0_u64..400, 0_u64..30).prop_map(|(offset, length)| {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid base date");
        let start = base + Days::new(offset);
        DateRange::new(start, start + Days::new(length)).expect("end follows start")
    })
}

proptest! {
    #[test]
    fn overlap_is_symmetric(first in arb_range(), second in arb_range()) {
        prop_assert_eq!(first.overlaps(second), second.overlaps(first));
    }

    #[test]
    fn containment_implies_overlap(outer in arb_range(), inner in arb_range()) {
        if outer.contains(inner) {
            prop_assert!(outer.overlaps(inner));
        }
    }

    #[test]
    fn every_range_overlaps_and_contains_itself(value in arb_range()) {
        prop_assert!(value.overlaps(value));
        prop_assert!(value.contains(value));
    }
}
