//! Cost aggregate
//!
//! A cost is a monetary estimate attached to a baseline, spread over calendar
//! months. The sum of its monthly allocations must equal its total amount
//! exactly, and the allocations are always kept in date order.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{first_day_of_month, BaselineId, CostId, Currency};

use crate::error::EstimationError;

const ENTITY: &str = "cost";

/// How a cost recurs over the life of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostType {
    OneTime,
    Running,
    Investment,
}

impl CostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostType::OneTime => "one_time",
            CostType::Running => "running",
            CostType::Investment => "investment",
        }
    }
}

impl fmt::Display for CostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostType {
    type Err = EstimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one_time" => Ok(CostType::OneTime),
            "running" => Ok(CostType::Running),
            "investment" => Ok(CostType::Investment),
            other => Err(EstimationError::validation(ENTITY, format!("invalid cost type {}", other))),
        }
    }
}

/// One month of a cost
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostAllocation {
    date: NaiveDate,
    amount: f64,
}

impl CostAllocation {
    /// Creates an allocation pinned to the first day of (year, month)
    pub fn new(year: i32, month: u32, amount: f64) -> Result<Self, EstimationError> {
        Ok(Self {
            date: first_day_of_month(year, month)?,
            amount,
        })
    }

    /// Rebuilds a stored allocation; the date is checked by `Cost::validate`
    pub fn from_date(date: NaiveDate, amount: f64) -> Self {
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

/// Raw (year, month, amount) allocation input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostAllocationInput {
    pub year: i32,
    pub month: u32,
    pub amount: f64,
}

/// Builds allocations dated to the first of their month, sorted by date
pub fn create_cost_allocations(inputs: &[CostAllocationInput]) -> Result<Vec<CostAllocation>, EstimationError> {
    let mut allocations = inputs
        .iter()
        .map(|input| CostAllocation::new(input.year, input.month, input.amount))
        .collect::<Result<Vec<_>, _>>()?;
    allocations.sort_by_key(|a| a.date);
    Ok(allocations)
}

/// Input for creating a cost
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCost {
    pub baseline_id: BaselineId,
    pub cost_type: CostType,
    pub description: String,
    pub comment: String,
    pub amount: f64,
    pub currency: Currency,
    pub tax: f64,
    pub apply_inflation: bool,
    pub allocations: Vec<CostAllocationInput>,
}

/// A fully-populated cost as read back from storage
#[derive(Debug, Clone)]
pub struct CostRecord {
    pub id: CostId,
    pub baseline_id: BaselineId,
    pub cost_type: CostType,
    pub description: String,
    pub comment: String,
    pub amount: f64,
    pub currency: Currency,
    pub tax: f64,
    pub apply_inflation: bool,
    pub allocations: Vec<CostAllocation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostChanges {
    pub cost_type: Option<CostType>,
    pub description: Option<String>,
    pub comment: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<Currency>,
    pub tax: Option<f64>,
    pub apply_inflation: Option<bool>,
    pub allocations: Option<Vec<CostAllocationInput>>,
}

/// A cost estimate belonging to a baseline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cost {
    id: CostId,
    baseline_id: BaselineId,
    cost_type: CostType,
    description: String,
    comment: String,
    amount: f64,
    currency: Currency,
    tax: f64,
    apply_inflation: bool,
    allocations: Vec<CostAllocation>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Cost {
    /// Creates a validated cost with a fresh identity
    pub fn new(input: NewCost) -> Result<Self, EstimationError> {
        let cost = Self {
            id: CostId::new_v7(),
            baseline_id: input.baseline_id,
            cost_type: input.cost_type,
            description: input.description,
            comment: input.comment,
            amount: input.amount,
            currency: input.currency,
            tax: input.tax,
            apply_inflation: input.apply_inflation,
            allocations: create_cost_allocations(&input.allocations)?,
            created_at: Utc::now(),
            updated_at: None,
        };
        cost.validate()?;
        Ok(cost)
    }

    /// Rebuilds a stored cost, re-checking its invariants
    pub fn restore(record: CostRecord) -> Result<Self, EstimationError> {
        let cost = Self {
            id: record.id,
            baseline_id: record.baseline_id,
            cost_type: record.cost_type,
            description: record.description,
            comment: record.comment,
            amount: record.amount,
            currency: record.currency,
            tax: record.tax,
            apply_inflation: record.apply_inflation,
            allocations: record.allocations,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        cost.validate()?;
        Ok(cost)
    }

    /// Applies a partial update and re-validates
    ///
    /// Replacing the allocations re-sorts them. On failure the cost is left
    /// as it was.
    pub fn update(&mut self, changes: CostChanges) -> Result<(), EstimationError> {
        let mut next = self.clone();
        if let Some(cost_type) = changes.cost_type {
            next.cost_type = cost_type;
        }
        if let Some(description) = changes.description {
            next.description = description;
        }
        if let Some(comment) = changes.comment {
            next.comment = comment;
        }
        if let Some(amount) = changes.amount {
            next.amount = amount;
        }
        if let Some(currency) = changes.currency {
            next.currency = currency;
        }
        if let Some(tax) = changes.tax {
            next.tax = tax;
        }
        if let Some(apply_inflation) = changes.apply_inflation {
            next.apply_inflation = apply_inflation;
        }
        if let Some(allocations) = changes.allocations {
            next.allocations = create_cost_allocations(&allocations)?;
        }
        next.validate()?;
        next.updated_at = Some(Utc::now());
        *self = next;
        Ok(())
    }

    /// Checks the cost invariants
    pub fn validate(&self) -> Result<(), EstimationError> {
        if self.id.is_nil() {
            return Err(EstimationError::validation(ENTITY, "id is required"));
        }
        if self.baseline_id.is_nil() {
            return Err(EstimationError::validation(ENTITY, "baseline is required"));
        }
        if self.description.trim().is_empty() {
            return Err(EstimationError::validation(ENTITY, "description is required"));
        }
        if self.allocations.is_empty() {
            return Err(EstimationError::validation(ENTITY, "cost allocations are required"));
        }
        if self.allocations.iter().any(|a| a.date.day() != 1) {
            return Err(EstimationError::validation(ENTITY, "cost allocation must be on the first day of a month"));
        }
        if self.amount <= 0.0 {
            return Err(EstimationError::validation(ENTITY, format!("invalid cost amount {:.2}", self.amount)));
        }
        let total: f64 = self.allocations.iter().map(|a| a.amount).sum();
        if total != self.amount {
            return Err(EstimationError::validation(
                ENTITY,
                format!("cost allocation total {:.2} is not equal to cost amount {:.2}", total, self.amount),
            ));
        }
        if self.tax < 0.0 {
            return Err(EstimationError::validation(ENTITY, format!("invalid tax {:.2}", self.tax)));
        }
        Ok(())
    }

    /// Returns true if no allocation falls before `date`
    pub fn starts_on_or_after(&self, date: NaiveDate) -> bool {
        self.allocations.iter().all(|a| a.date >= date)
    }

    pub fn id(&self) -> CostId {
        self.id
    }

    pub fn baseline_id(&self) -> BaselineId {
        self.baseline_id
    }

    pub fn cost_type(&self) -> CostType {
        self.cost_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Tax percent applied on top of each allocation
    pub fn tax(&self) -> f64 {
        self.tax
    }

    /// Whether home-currency allocations are compounded to their target year
    pub fn apply_inflation(&self) -> bool {
        self.apply_inflation
    }

    pub fn allocations(&self) -> &[CostAllocation] {
        &self.allocations
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
