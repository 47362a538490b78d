//! Estimation domain errors

use thiserror::Error;

use core_kernel::{Currency, PortError, TemporalError};

/// Coarse classification used by callers to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    InvalidPeriod,
    Internal,
}

/// Errors that can occur in the estimation domain
#[derive(Debug, Error)]
pub enum EstimationError {
    #[error("{entity} domain validation failed: {message}")]
    Validation {
        entity: &'static str,
        message: String,
    },

    #[error("invalid period: start year {start} is greater than end year {end}")]
    InvalidPeriod { start: i32, end: i32 },

    #[error("currency and year combination not found: {currency} {year}")]
    ExchangeRateNotFound { currency: Currency, year: i32 },

    #[error("there is no inflation for start year {year}")]
    MissingStartInflation { year: i32 },

    #[error("there is no inflation for end year {year}")]
    MissingEndInflation { year: i32 },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("repository error: {0}")]
    Port(PortError),
}

impl EstimationError {
    pub fn validation(entity: &'static str, message: impl Into<String>) -> Self {
        EstimationError::Validation {
            entity,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        EstimationError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        EstimationError::Conflict(message.into())
    }

    /// Classifies the error
    ///
    /// Missing exchange rates and inflation rates mean the plan does not
    /// cover the projected years, which the caller fixes by editing the plan.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EstimationError::Validation { .. }
            | EstimationError::ExchangeRateNotFound { .. }
            | EstimationError::MissingStartInflation { .. }
            | EstimationError::MissingEndInflation { .. } => ErrorKind::Validation,
            EstimationError::InvalidPeriod { .. } => ErrorKind::InvalidPeriod,
            EstimationError::NotFound(_) => ErrorKind::NotFound,
            EstimationError::Conflict(_) => ErrorKind::Conflict,
            EstimationError::Port(_) => ErrorKind::Internal,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }
}

impl From<PortError> for EstimationError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { .. } => EstimationError::NotFound(err.to_string()),
            PortError::Conflict { message } => EstimationError::Conflict(message),
            PortError::Validation { message, .. } => EstimationError::validation("repository", message),
            other => EstimationError::Port(other),
        }
    }
}

impl From<TemporalError> for EstimationError {
    fn from(err: TemporalError) -> Self {
        EstimationError::validation("date", err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_not_found_maps_to_not_found() {
        let err: EstimationError = PortError::not_found("Plan", "123").into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_port_conflict_keeps_message() {
        let err: EstimationError = PortError::conflict("duplicate plan code").into();
        assert!(err.is_conflict());
        assert_eq!(err.to_string(), "duplicate plan code");
    }

    #[test]
    fn test_connection_failure_is_internal() {
        let err: EstimationError = PortError::connection("refused").into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
