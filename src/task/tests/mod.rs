//! Unit tests for the task module.

mod conflict_tests;
mod date_range_tests;
mod support;
