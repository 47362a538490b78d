//! Inflation accumulator
//!
//! Turns yearly inflation percentages into compounded multipliers between two
//! years. A multiplier from `start` to `end` compounds every year in
//! `start + 1 ..= end`, is rounded to four decimals, and is memoized for the
//! lifetime of the accumulator. One accumulator serves one generation run.

use std::collections::HashMap;

use core_kernel::{round2, round4};

use crate::error::EstimationError;

/// Inflation percent for one year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InflationRate {
    pub year: i32,
    pub inflation: f64,
}

/// Compounds amounts across years, caching each (start, end) multiplier
#[derive(Debug, Clone, Default)]
pub struct Inflation {
    factors: Vec<InflationRate>,
    memo: HashMap<(i32, i32), f64>,
}

impl Inflation {
    /// Builds an accumulator; factors are sorted by year here
    pub fn new(mut factors: Vec<InflationRate>) -> Self {
        factors.sort_by_key(|f| f.year);
        Self {
            factors,
            memo: HashMap::new(),
        }
    }

    /// Values `amount`, priced in `start`, in `end` money
    ///
    /// # Errors
    ///
    /// * `InvalidPeriod` when `start > end`
    /// * `MissingStartInflation` when there is no rate for `start + 1`
    /// * `MissingEndInflation` when there is no rate for `end`
    pub fn apply_inflation(&mut self, amount: f64, start: i32, end: i32) -> Result<f64, EstimationError> {
        if start > end {
            return Err(EstimationError::InvalidPeriod { start, end });
        }
        if start == end {
            return Ok(round2(amount));
        }
        let factor = self.accumulated_factor(start, end)?;
        Ok(round2(factor * amount))
    }

    /// Returns the compounded multiplier from `start` to `end`, rounded to four decimals
    pub fn accumulated_factor(&mut self, start: i32, end: i32) -> Result<f64, EstimationError> {
        if start > end {
            return Err(EstimationError::InvalidPeriod { start, end });
        }
        if start == end {
            return Ok(1.0);
        }
        if let Some(factor) = self.memo.get(&(start, end)) {
            return Ok(*factor);
        }

        let mut has_start = false;
        let mut has_end = false;
        let mut factor = 1.0_f64;
        for rate in self.factors.iter().filter(|f| f.year > start) {
            if rate.year > end {
                break;
            }
            if rate.year == start + 1 {
                has_start = true;
            }
            factor *= 1.0 + rate.inflation / 100.0;
            if rate.year == end {
                has_end = true;
                break;
            }
        }

        if !has_start {
            return Err(EstimationError::MissingStartInflation { year: start + 1 });
        }
        if !has_end {
            return Err(EstimationError::MissingEndInflation { year: end });
        }

        let factor = round4(factor);
        self.memo.insert((start, end), factor);
        Ok(factor)
    }

    /// Multiplier already computed for (start, end), if any
    pub fn cached_factor(&self, start: i32, end: i32) -> Option<f64> {
        self.memo.get(&(start, end)).copied()
    }

    /// Years covered, in ascending order
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.factors.iter().map(|f| f.year)
    }
}
