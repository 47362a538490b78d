//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::money::MoneyError;
use core_kernel::temporal::TemporalError;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_from_money_error() {
    let core_error: CoreError = MoneyError::UnknownCurrency("GBP".to_string()).into();
    assert!(matches!(core_error, CoreError::Money(_)));
}

#[test]
fn test_core_error_from_temporal_error() {
    let core_error: CoreError = TemporalError::InvalidMonth { year: 2024, month: 13 }.into();
    assert!(core_error.to_string().contains("Invalid month 13"));
}

#[test]
fn test_core_error_from_uuid_error() {
    let parse_error = "nope".parse::<uuid::Uuid>().unwrap_err();
    let core_error: CoreError = parse_error.into();
    assert!(matches!(core_error, CoreError::InvalidIdentifier(_)));
}

#[test]
fn test_core_error_display() {
    let display = format!("{}", CoreError::validation("Test error"));
    assert!(display.contains("Validation error"));
}
