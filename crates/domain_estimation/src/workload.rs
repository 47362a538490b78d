//! Workload aggregate
//!
//! The time-shifted projection of one effort inside a portfolio.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use core_kernel::{EffortId, PortfolioId, WorkloadId};

use crate::error::EstimationError;

const ENTITY: &str = "workload";

/// One month of a workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkloadAllocation {
    date: NaiveDate,
    hours: i32,
}

impl WorkloadAllocation {
    pub fn new(date: NaiveDate, hours: i32) -> Self {
        Self { date, hours }
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

    pub fn hours(&self) -> i32 {
        self.hours
    }
}

/// Input for creating a workload
#[derive(Debug, Clone)]
pub struct NewWorkload {
    pub portfolio_id: PortfolioId,
    pub effort_id: EffortId,
    pub hours: i32,
    pub allocations: Vec<WorkloadAllocation>,
}

/// A fully-populated workload as read back from storage
#[derive(Debug, Clone)]
pub struct WorkloadRecord {
    pub id: WorkloadId,
    pub portfolio_id: PortfolioId,
    pub effort_id: EffortId,
    pub hours: i32,
    pub allocations: Vec<WorkloadAllocation>,
    pub created_at: DateTime<Utc>,
}

/// Monthly labor projection of an effort
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workload {
    id: WorkloadId,
    portfolio_id: PortfolioId,
    effort_id: EffortId,
    hours: i32,
    allocations: Vec<WorkloadAllocation>,
    created_at: DateTime<Utc>,
}

impl Workload {
    pub fn new(input: NewWorkload) -> Result<Self, EstimationError> {
        let mut allocations = input.allocations;
        allocations.sort_by_key(|a| a.date);
        let workload = Self {
            id: WorkloadId::new_v7(),
            portfolio_id: input.portfolio_id,
            effort_id: input.effort_id,
            hours: input.hours,
            allocations,
            created_at: Utc::now(),
        };
        workload.validate()?;
        Ok(workload)
    }

    pub fn restore(record: WorkloadRecord) -> Result<Self, EstimationError> {
        let workload = Self {
            id: record.id,
            portfolio_id: record.portfolio_id,
            effort_id: record.effort_id,
            hours: record.hours,
            allocations: record.allocations,
            created_at: record.created_at,
        };
        workload.validate()?;
        Ok(workload)
    }

    pub fn validate(&self) -> Result<(), EstimationError> {
        if self.id.is_nil() {
            return Err(EstimationError::validation(ENTITY, "id is required"));
        }
        if self.portfolio_id.is_nil() {
            return Err(EstimationError::validation(ENTITY, "portfolio is required"));
        }
        if self.effort_id.is_nil() {
            return Err(EstimationError::validation(ENTITY, "effort is required"));
        }
        if self.hours <= 0 {
            return Err(EstimationError::validation(ENTITY, format!("invalid workload hours {}", self.hours)));
        }
        let total: i64 = self.allocations.iter().map(|a| i64::from(a.hours)).sum();
        if total != i64::from(self.hours) {
            return Err(EstimationError::validation(
                ENTITY,
                format!("workload allocation total {} is not equal to workload hours {}", total, self.hours),
            ));
        }
        Ok(())
    }

    /// Allocated hours per calendar year
    pub fn yearly_hours(&self) -> BTreeMap<i32, i64> {
        let mut totals = BTreeMap::new();
        for allocation in &self.allocations {
            *totals.entry(allocation.year()).or_insert(0) += i64::from(allocation.hours);
        }
        totals
    }

    pub fn id(&self) -> WorkloadId {
        self.id
    }

    pub fn portfolio_id(&self) -> PortfolioId {
        self.portfolio_id
    }

    pub fn effort_id(&self) -> EffortId {
        self.effort_id
    }

    pub fn hours(&self) -> i32 {
        self.hours
    }

    pub fn allocations(&self) -> &[WorkloadAllocation] {
        &self.allocations
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
