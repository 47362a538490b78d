//! Portfolio generation
//!
//! Projects a baseline's costs and efforts through a plan: every allocation
//! is moved forward by the shift, costs are taxed and then either passed
//! through, compounded for inflation, or converted from a foreign currency.
//! Generation is all-or-nothing; the first failing step aborts the run.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use core_kernel::{add_months, round2, PlanId};

use crate::baseline::Baseline;
use crate::budget::{Budget, BudgetAllocation, NewBudget};
use crate::cost::{Cost, CostAllocation};
use crate::effort::Effort;
use crate::error::EstimationError;
use crate::exchange::Exchange;
use crate::inflation::Inflation;
use crate::portfolio::Portfolio;
use crate::workload::{NewWorkload, Workload, WorkloadAllocation};

/// Largest shift, in months, a portfolio may apply to its baseline
pub const MAX_SHIFT_MONTHS: u32 = 36;

/// Everything produced by one generation run
#[derive(Debug, Clone)]
pub struct GeneratedPortfolio {
    pub portfolio: Portfolio,
    pub budgets: Vec<Budget>,
    pub workloads: Vec<Workload>,
}

/// Generates one portfolio for a baseline under a plan
///
/// The inflation accumulator is owned by the service so its memo lives
/// exactly as long as one run.
pub struct PortfolioService<'a> {
    plan_id: PlanId,
    baseline: &'a Baseline,
    costs: &'a [Cost],
    efforts: &'a [Effort],
    inflation: Inflation,
    exchange: Exchange,
    shift_months: u32,
}

impl<'a> PortfolioService<'a> {
    pub fn new(
        plan_id: PlanId,
        baseline: &'a Baseline,
        costs: &'a [Cost],
        efforts: &'a [Effort],
        inflation: Inflation,
        exchange: Exchange,
        shift_months: u32,
    ) -> Self {
        Self {
            plan_id,
            baseline,
            costs,
            efforts,
            inflation,
            exchange,
            shift_months,
        }
    }

    /// Runs the generation
    ///
    /// Produces one budget per cost and one workload per effort, in input order.
    pub fn generate_portfolio(&mut self) -> Result<GeneratedPortfolio, EstimationError> {
        debug!(
            baseline_id = %self.baseline.id(),
            plan_id = %self.plan_id,
            shift_months = self.shift_months,
            costs = self.costs.len(),
            efforts = self.efforts.len(),
            "Generating portfolio"
        );

        let start_date = add_months(self.baseline.start_date(), self.shift_months)?;
        let portfolio = Portfolio::new(self.baseline.id(), self.plan_id, start_date)?;

        let mut budgets = Vec::with_capacity(self.costs.len());
        for cost in self.costs {
            budgets.push(self.build_budget(&portfolio, cost)?);
        }

        let mut workloads = Vec::with_capacity(self.efforts.len());
        for effort in self.efforts {
            workloads.push(self.build_workload(&portfolio, effort)?);
        }

        info!(
            portfolio_id = %portfolio.id(),
            budgets = budgets.len(),
            workloads = workloads.len(),
            "Portfolio generated"
        );

        Ok(GeneratedPortfolio {
            portfolio,
            budgets,
            workloads,
        })
    }

    fn build_budget(&mut self, portfolio: &Portfolio, cost: &Cost) -> Result<Budget, EstimationError> {
        let mut amount = 0.0;
        let mut allocations = Vec::with_capacity(cost.allocations().len());
        for allocation in cost.allocations() {
            let shifted = add_months(allocation.date(), self.shift_months)?;
            let value = self.calculate_budget_allocation(cost, allocation, shifted)?;
            amount += value;
            allocations.push(BudgetAllocation::new(shifted, value));
        }

        Budget::new(NewBudget {
            portfolio_id: portfolio.id(),
            cost_id: cost.id(),
            amount: round2(amount),
            allocations,
        })
    }

    fn build_workload(&self, portfolio: &Portfolio, effort: &Effort) -> Result<Workload, EstimationError> {
        let allocations = effort
            .allocations()
            .iter()
            .map(|a| -> Result<WorkloadAllocation, EstimationError> {
                Ok(WorkloadAllocation::new(add_months(a.date(), self.shift_months)?, a.hours()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Workload::new(NewWorkload {
            portfolio_id: portfolio.id(),
            effort_id: effort.id(),
            hours: effort.hours(),
            allocations,
        })
    }

    /// Values one cost allocation in the home currency at its shifted date
    ///
    /// Foreign-currency costs are converted at the rate for the shifted year
    /// and never compounded, whatever their inflation flag says.
    fn calculate_budget_allocation(
        &mut self,
        cost: &Cost,
        allocation: &CostAllocation,
        shifted: NaiveDate,
    ) -> Result<f64, EstimationError> {
        let taxed = apply_tax(cost, allocation);

        if cost.currency().is_home() {
            if !cost.apply_inflation() {
                return Ok(round2(taxed));
            }
            return self
                .inflation
                .apply_inflation(taxed, self.baseline.start_date().year(), shifted.year());
        }

        self.exchange.convert_to_home(taxed, cost.currency(), shifted.year())
    }
}

/// Adds the cost's tax percent to an allocation, without rounding
fn apply_tax(cost: &Cost, allocation: &CostAllocation) -> f64 {
    if cost.tax() == 0.0 {
        return allocation.amount();
    }
    (1.0 + cost.tax() / 100.0) * allocation.amount()
}
