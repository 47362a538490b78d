//! Budget aggregate
//!
//! The home-currency projection of one cost inside a portfolio.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use core_kernel::{round2, BudgetId, CostId, PortfolioId};

use crate::error::EstimationError;

const ENTITY: &str = "budget";

/// One month of a budget, in the home currency
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetAllocation {
    date: NaiveDate,
    amount: f64,
}

impl BudgetAllocation {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }
}

/// Input for creating a budget
#[derive(Debug, Clone)]
pub struct NewBudget {
    pub portfolio_id: PortfolioId,
    pub cost_id: CostId,
    pub amount: f64,
    pub allocations: Vec<BudgetAllocation>,
}

/// A fully-populated budget as read back from storage
#[derive(Debug, Clone)]
pub struct BudgetRecord {
    pub id: BudgetId,
    pub portfolio_id: PortfolioId,
    pub cost_id: CostId,
    pub amount: f64,
    pub allocations: Vec<BudgetAllocation>,
    pub created_at: DateTime<Utc>,
}

/// Normalized monthly projection of a cost
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    id: BudgetId,
    portfolio_id: PortfolioId,
    cost_id: CostId,
    amount: f64,
    allocations: Vec<BudgetAllocation>,
    created_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(input: NewBudget) -> Result<Self, EstimationError> {
        let mut allocations = input.allocations;
        allocations.sort_by_key(|a| a.date);
        let budget = Self {
            id: BudgetId::new_v7(),
            portfolio_id: input.portfolio_id,
            cost_id: input.cost_id,
            amount: input.amount,
            allocations,
            created_at: Utc::now(),
        };
        budget.validate()?;
        Ok(budget)
    }

    pub fn restore(record: BudgetRecord) -> Result<Self, EstimationError> {
        let budget = Self {
            id: record.id,
            portfolio_id: record.portfolio_id,
            cost_id: record.cost_id,
            amount: record.amount,
            allocations: record.allocations,
            created_at: record.created_at,
        };
        budget.validate()?;
        Ok(budget)
    }

    /// Checks the budget invariants; the allocation sum is compared at cent precision
    pub fn validate(&self) -> Result<(), EstimationError> {
        if self.id.is_nil() {
            return Err(EstimationError::validation(ENTITY, "id is required"));
        }
        if self.portfolio_id.is_nil() {
            return Err(EstimationError::validation(ENTITY, "portfolio is required"));
        }
        if self.cost_id.is_nil() {
            return Err(EstimationError::validation(ENTITY, "cost is required"));
        }
        if self.amount <= 0.0 {
            return Err(EstimationError::validation(ENTITY, format!("invalid budget amount {:.2}", self.amount)));
        }
        let total = round2(self.allocations.iter().map(|a| a.amount).sum());
        if total != self.amount {
            return Err(EstimationError::validation(
                ENTITY,
                format!("budget allocation total {:.2} is not equal to budget amount {:.2}", total, self.amount),
            ));
        }
        Ok(())
    }

    /// Allocation totals per calendar year, rounded to cents
    pub fn yearly_totals(&self) -> BTreeMap<i32, f64> {
        let mut totals = BTreeMap::new();
        for allocation in &self.allocations {
            *totals.entry(allocation.year()).or_insert(0.0) += allocation.amount;
        }
        totals.into_iter().map(|(year, total)| (year, round2(total))).collect()
    }

    pub fn id(&self) -> BudgetId {
        self.id
    }

    pub fn portfolio_id(&self) -> PortfolioId {
        self.portfolio_id
    }

    pub fn cost_id(&self) -> CostId {
        self.cost_id
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn allocations(&self) -> &[BudgetAllocation] {
        &self.allocations
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
