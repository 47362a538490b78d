//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! estimation test suite.
//!
//! # Modules
//!
//! - `fixtures`: The reference plan, baseline, costs and efforts
//! - `builders`: Builders for random but valid inputs
//! - `database`: PostgreSQL containers with the migrations applied
//! - `assertions`: Assertion helpers for generated budgets and workloads
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
