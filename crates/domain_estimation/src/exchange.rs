//! Exchange rate table
//!
//! Maps (currency, year) to the rate that converts one unit of that currency
//! into the home currency. Derived from a plan's assumptions.

use std::collections::HashMap;

use core_kernel::{round2, Currency};

use crate::error::EstimationError;

/// One (currency, year, rate) entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRate {
    pub currency: Currency,
    pub year: i32,
    pub rate: f64,
}

/// Lookup table of yearly exchange rates
#[derive(Debug, Clone, Default)]
pub struct Exchange {
    rates: HashMap<(Currency, i32), f64>,
}

impl Exchange {
    /// Builds the table; a later entry for the same key replaces an earlier one
    pub fn new(rates: impl IntoIterator<Item = ExchangeRate>) -> Self {
        Self {
            rates: rates
                .into_iter()
                .map(|r| ((r.currency, r.year), r.rate))
                .collect(),
        }
    }

    /// Returns the rate for a currency in a year, if the plan covers it
    pub fn rate(&self, currency: Currency, year: i32) -> Option<f64> {
        self.rates.get(&(currency, year)).copied()
    }

    /// Converts `amount` in `currency` into the home currency at the rate for `year`
    pub fn convert_to_home(&self, amount: f64, currency: Currency, year: i32) -> Result<f64, EstimationError> {
        let rate = self
            .rate(currency, year)
            .ok_or(EstimationError::ExchangeRateNotFound { currency, year })?;
        Ok(round2(amount * rate))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
