//! Core Kernel - Foundational types and utilities for the estimation system
//!
//! This crate provides the building blocks shared by the domain, the
//! persistence adapter and the HTTP interface:
//! - Decimal-safe rounding for floating point monetary values
//! - The currencies a plan can express exchange rates for
//! - Month-granular date arithmetic
//! - Strongly-typed identifiers
//! - Port contracts (errors, health checks) for hexagonal adapters

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use money::{Currency, MoneyError, round_to, round2, round4, is_two_decimals, to_decimal, from_decimal};
pub use temporal::{first_day_of_month, add_months, start_of_month, TemporalError};
pub use identifiers::{
    BaselineId, CostId, EffortId, PlanId, PortfolioId, BudgetId, WorkloadId,
    UserId, CompetenceId,
};
pub use error::CoreError;
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
