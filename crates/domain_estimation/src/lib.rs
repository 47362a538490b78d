//! Estimation Domain
//!
//! This crate records project baselines with their cost and effort estimates,
//! yearly financial plans, and derives portfolios from them.
//!
//! # Key Concepts
//!
//! - **Baseline**: a recorded project that costs and efforts attach to
//! - **Plan**: yearly inflation percentages and USD/EUR exchange rates
//! - **Portfolio**: one projection of a baseline under a plan, shifted by a
//!   number of months
//! - **Budget / Workload**: the generated monthly projection of one cost /
//!   one effort
//!
//! # Valuation
//!
//! Each cost allocation is moved forward by the shift and taxed, then valued
//! in the home currency along one of three paths:
//!
//! - home currency, no inflation: passed through, rounded to cents
//! - home currency with inflation: compounded from the baseline start year to
//!   the shifted year
//! - foreign currency: converted at the plan's rate for the shifted year
//!
//! All rounding goes through [`core_kernel::round2`] and
//! [`core_kernel::round4`].

pub mod baseline;
pub mod cost;
pub mod effort;
pub mod plan;
pub mod portfolio;
pub mod budget;
pub mod workload;
pub mod exchange;
pub mod inflation;
pub mod services;
pub mod ports;
pub mod usecases;
pub mod error;

pub use baseline::{Baseline, BaselineChanges, BaselineRecord, NewBaseline};
pub use cost::{
    create_cost_allocations, Cost, CostAllocation, CostAllocationInput, CostChanges, CostRecord,
    CostType, NewCost,
};
pub use effort::{
    create_effort_allocations, Effort, EffortAllocation, EffortAllocationInput, EffortChanges,
    EffortRecord, NewEffort,
};
pub use plan::{Assumption, CurrencyAssumption, NewPlan, Plan, PlanChanges, PlanRecord};
pub use portfolio::{Portfolio, PortfolioRecord};
pub use budget::{Budget, BudgetAllocation, BudgetRecord, NewBudget};
pub use workload::{NewWorkload, Workload, WorkloadAllocation, WorkloadRecord};
pub use exchange::{Exchange, ExchangeRate};
pub use inflation::{Inflation, InflationRate};
pub use services::{GeneratedPortfolio, PortfolioService, MAX_SHIFT_MONTHS};
pub use ports::{EstimationRepository, EstimationStore, EstimationTransaction};
pub use usecases::{CreatePortfolioInput, EstimationService, PortfolioDetail};
pub use error::{ErrorKind, EstimationError};

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::InMemoryEstimationStore;
