//! Currencies and decimal-safe rounding of floating point amounts
//!
//! Amounts travel through the estimation engine as `f64` so that allocation
//! totals can be compared for exact equality. Every rounding step, however,
//! goes through `rust_decimal`: the float is read back through its shortest
//! round-trip representation, rounded half away from zero, and converted back.
//! This keeps results such as `4337.025 -> 4337.03` stable where plain binary
//! rounding would drift by a cent.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Currencies known to the estimation system
///
/// `BRL` is the home currency. Plans carry yearly exchange rates for the
/// foreign ones only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    BRL,
    USD,
    EUR,
}

impl Currency {
    /// The currency every budget is normalized into
    pub const HOME: Currency = Currency::BRL;

    /// Currencies that need an exchange rate per plan year
    pub const FOREIGN: [Currency; 2] = [Currency::USD, Currency::EUR];

    /// Returns true for the home currency
    pub fn is_home(&self) -> bool {
        *self == Self::HOME
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BRL => "BRL",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BRL" => Ok(Currency::BRL),
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            other => Err(MoneyError::UnknownCurrency(other.to_string())),
        }
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Amount {0} has no decimal representation")]
    NotRepresentable(String),
}

/// Reads a float through its shortest round-trip representation
///
/// NaN, infinities and magnitudes beyond the decimal range are rejected.
pub fn to_decimal(value: f64) -> Result<Decimal, MoneyError> {
    if !value.is_finite() {
        return Err(MoneyError::NotRepresentable(value.to_string()));
    }
    Decimal::from_str(&value.to_string())
        .or_else(|_| Decimal::from_f64_retain(value).ok_or(()))
        .map_err(|_| MoneyError::NotRepresentable(value.to_string()))
}

/// Converts a decimal back into the nearest float
pub fn from_decimal(value: Decimal) -> f64 {
    value.to_string().parse::<f64>().unwrap_or(0.0)
}

/// Rounds `value` to `decimals` places, half away from zero
///
/// Values that cannot be represented as a decimal (NaN, infinities) are
/// returned unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    match to_decimal(value) {
        Ok(d) => from_decimal(d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)),
        Err(_) => value,
    }
}

/// Rounds a monetary amount or percentage to cents
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Rounds a compounded factor, keeping precision for later multiplication
pub fn round4(value: f64) -> f64 {
    round_to(value, 4)
}

/// Returns true when `value` already has at most two decimal places
pub fn is_two_decimals(value: f64) -> bool {
    round2(value) == value
}
