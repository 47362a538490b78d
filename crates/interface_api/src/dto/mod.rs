//! Request and response bodies
//!
//! Requests carry `validator` rules for what can be checked without the
//! store; the domain validates the rest. Responses are flat views of the
//! domain entities.

pub mod plan;
pub mod baseline;
pub mod cost;
pub mod effort;
pub mod portfolio;

use core_kernel::is_two_decimals;
use validator::ValidationError;

/// Rejects amounts with more than two decimal places
pub fn validate_two_decimals(value: f64) -> Result<(), ValidationError> {
    if is_two_decimals(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("two_decimals");
        err.message = Some(format!("{} must have at most two decimal places", value).into());
        Err(err)
    }
}
