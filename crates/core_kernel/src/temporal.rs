//! Month-granular date arithmetic
//!
//! Baselines, allocations and portfolios are all pinned to the first day of
//! a calendar month. These helpers build such dates and shift them.

use chrono::{Datelike, Months, NaiveDate};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid month {month} for year {year}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Date {date} shifted by {months} months is out of range")]
    OutOfRange { date: NaiveDate, months: u32 },
}

/// Returns the first day of the given calendar month
pub fn first_day_of_month(year: i32, month: u32) -> Result<NaiveDate, TemporalError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(TemporalError::InvalidMonth { year, month })
}

/// Shifts a date forward by a whole number of months
///
/// Dates on the first of a month stay on the first of a month.
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate, TemporalError> {
    date.checked_add_months(Months::new(months))
        .ok_or(TemporalError::OutOfRange { date, months })
}

/// Returns the first day of the month containing `date`
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_day_of_month() {
        let date = first_day_of_month(2022, 8).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2022, 8, 1).unwrap());
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert_eq!(
            first_day_of_month(2022, 13),
            Err(TemporalError::InvalidMonth { year: 2022, month: 13 })
        );
        assert!(first_day_of_month(2022, 0).is_err());
    }

    #[test]
    fn test_add_months_crosses_year() {
        let date = first_day_of_month(2023, 12).unwrap();
        assert_eq!(add_months(date, 8).unwrap(), first_day_of_month(2024, 8).unwrap());
    }
}
