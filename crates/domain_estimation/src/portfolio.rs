//! Portfolio entity
//!
//! One time-shifted projection of a baseline under a plan. The budgets and
//! workloads generated with it reference it by id.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use core_kernel::{BaselineId, PlanId, PortfolioId};

use crate::error::EstimationError;

const ENTITY: &str = "portfolio";

/// A fully-populated portfolio as read back from storage
#[derive(Debug, Clone)]
pub struct PortfolioRecord {
    pub id: PortfolioId,
    pub baseline_id: BaselineId,
    pub plan_id: PlanId,
    pub start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A generated projection of a baseline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    id: PortfolioId,
    baseline_id: BaselineId,
    plan_id: PlanId,
    start_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Portfolio {
    /// Creates a validated portfolio with a fresh identity
    pub fn new(baseline_id: BaselineId, plan_id: PlanId, start_date: NaiveDate) -> Result<Self, EstimationError> {
        let portfolio = Self {
            id: PortfolioId::new_v7(),
            baseline_id,
            plan_id,
            start_date,
            created_at: Utc::now(),
            updated_at: None,
        };
        portfolio.validate()?;
        Ok(portfolio)
    }

    /// Rebuilds a stored portfolio, re-checking its invariants
    pub fn restore(record: PortfolioRecord) -> Result<Self, EstimationError> {
        let portfolio = Self {
            id: record.id,
            baseline_id: record.baseline_id,
            plan_id: record.plan_id,
            start_date: record.start_date,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        portfolio.validate()?;
        Ok(portfolio)
    }

    pub fn validate(&self) -> Result<(), EstimationError> {
        if self.id.is_nil() {
            return Err(EstimationError::validation(ENTITY, "id is required"));
        }
        if self.baseline_id.is_nil() {
            return Err(EstimationError::validation(ENTITY, "baseline is required"));
        }
        if self.plan_id.is_nil() {
            return Err(EstimationError::validation(ENTITY, "plan is required"));
        }
        if self.start_date.day() != 1 {
            return Err(EstimationError::validation(ENTITY, "start date must be the first day of a month"));
        }
        Ok(())
    }

    pub fn id(&self) -> PortfolioId {
        self.id
    }

    pub fn baseline_id(&self) -> BaselineId {
        self.baseline_id
    }

    pub fn plan_id(&self) -> PlanId {
        self.plan_id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
