//! Repository implementations
//!
//! Each module holds the SQL for one aggregate. Functions take a borrowed
//! connection so that callers decide the transaction boundary; the
//! `PostgresTransaction` adapter passes its open transaction.

pub mod plan;
pub mod baseline;
pub mod cost;
pub mod effort;
pub mod portfolio;

use domain_estimation::EstimationError;

use crate::error::DatabaseError;

/// A stored row no longer satisfies the entity's invariants
pub(crate) fn invalid_row(entity: &str, error: EstimationError) -> DatabaseError {
    DatabaseError::SerializationError(format!("stored {} is invalid: {}", entity, error))
}
