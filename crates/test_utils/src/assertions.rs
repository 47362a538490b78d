//! Custom Test Assertions
//!
//! Assertion helpers for generated portfolios that print the offending
//! month instead of a whole struct dump.

use chrono::{Datelike, NaiveDate};
use domain_estimation::{Budget, ErrorKind, EstimationError, Workload};

/// Asserts a budget's allocations, as (year, month, amount), in order
pub fn assert_budget_allocations(budget: &Budget, expected: &[(i32, u32, f64)]) {
    let actual: Vec<(i32, u32, f64)> = budget
        .allocations()
        .iter()
        .map(|a| (a.date().year(), a.date().month(), a.amount()))
        .collect();
    assert_eq!(
        actual, expected,
        "Budget allocations differ for cost {}",
        budget.cost_id()
    );
}

/// Asserts a workload's allocations, as (year, month, hours), in order
pub fn assert_workload_allocations(workload: &Workload, expected: &[(i32, u32, i32)]) {
    let actual: Vec<(i32, u32, i32)> = workload
        .allocations()
        .iter()
        .map(|a| (a.date().year(), a.date().month(), a.hours()))
        .collect();
    assert_eq!(
        actual, expected,
        "Workload allocations differ for effort {}",
        workload.effort_id()
    );
}

/// Asserts that every allocation of a budget falls on or after `date`
pub fn assert_budget_starts_on_or_after(budget: &Budget, date: NaiveDate) {
    for allocation in budget.allocations() {
        assert!(
            allocation.date() >= date,
            "Allocation on {} is before {}",
            allocation.date(),
            date
        );
    }
}

/// Asserts that two amounts agree to the cent
pub fn assert_cents_eq(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.005,
        "Amounts differ: actual={:.2}, expected={:.2}",
        actual,
        expected
    );
}

/// Asserts the classification of a failed result
pub fn assert_error_kind<T: std::fmt::Debug>(result: Result<T, EstimationError>, kind: ErrorKind) {
    match result {
        Ok(value) => panic!("Expected {:?} error, got Ok({:?})", kind, value),
        Err(err) => assert_eq!(err.kind(), kind, "Unexpected error: {}", err),
    }
}
