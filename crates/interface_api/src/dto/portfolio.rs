//! Portfolio DTOs

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{BaselineId, PlanId};
use domain_estimation::{
    Budget, CreatePortfolioInput, Portfolio, PortfolioDetail, Workload, MAX_SHIFT_MONTHS,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePortfolioRequest {
    pub baseline_id: Uuid,
    pub plan_id: Uuid,
    #[serde(default)]
    #[validate(range(max = MAX_SHIFT_MONTHS))]
    pub shift_months: u32,
}

impl From<CreatePortfolioRequest> for CreatePortfolioInput {
    fn from(request: CreatePortfolioRequest) -> Self {
        CreatePortfolioInput {
            baseline_id: BaselineId::from_uuid(request.baseline_id),
            plan_id: PlanId::from_uuid(request.plan_id),
            shift_months: request.shift_months,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PortfolioQuery {
    pub plan_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    pub id: Uuid,
    pub baseline_id: Uuid,
    pub plan_id: Uuid,
    pub start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<&Portfolio> for PortfolioResponse {
    fn from(portfolio: &Portfolio) -> Self {
        Self {
            id: *portfolio.id().as_uuid(),
            baseline_id: *portfolio.baseline_id().as_uuid(),
            plan_id: *portfolio.plan_id().as_uuid(),
            start_date: portfolio.start_date(),
            created_at: portfolio.created_at(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BudgetAllocationResponse {
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    pub id: Uuid,
    pub cost_id: Uuid,
    pub amount: f64,
    pub allocations: Vec<BudgetAllocationResponse>,
    pub yearly_totals: BTreeMap<i32, f64>,
}

impl From<&Budget> for BudgetResponse {
    fn from(budget: &Budget) -> Self {
        Self {
            id: *budget.id().as_uuid(),
            cost_id: *budget.cost_id().as_uuid(),
            amount: budget.amount(),
            allocations: budget
                .allocations()
                .iter()
                .map(|a| BudgetAllocationResponse {
                    date: a.date(),
                    amount: a.amount(),
                })
                .collect(),
            yearly_totals: budget.yearly_totals(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorkloadAllocationResponse {
    pub date: NaiveDate,
    pub hours: i32,
}

#[derive(Debug, Serialize)]
pub struct WorkloadResponse {
    pub id: Uuid,
    pub effort_id: Uuid,
    pub hours: i32,
    pub allocations: Vec<WorkloadAllocationResponse>,
    pub yearly_hours: BTreeMap<i32, i64>,
}

impl From<&Workload> for WorkloadResponse {
    fn from(workload: &Workload) -> Self {
        Self {
            id: *workload.id().as_uuid(),
            effort_id: *workload.effort_id().as_uuid(),
            hours: workload.hours(),
            allocations: workload
                .allocations()
                .iter()
                .map(|a| WorkloadAllocationResponse {
                    date: a.date(),
                    hours: a.hours(),
                })
                .collect(),
            yearly_hours: workload.yearly_hours(),
        }
    }
}

/// A portfolio with its generated budgets and workloads
#[derive(Debug, Serialize)]
pub struct PortfolioDetailResponse {
    #[serde(flatten)]
    pub portfolio: PortfolioResponse,
    pub budgets: Vec<BudgetResponse>,
    pub workloads: Vec<WorkloadResponse>,
}

impl From<PortfolioDetail> for PortfolioDetailResponse {
    fn from(detail: PortfolioDetail) -> Self {
        Self {
            portfolio: PortfolioResponse::from(&detail.portfolio),
            budgets: detail.budgets.iter().map(BudgetResponse::from).collect(),
            workloads: detail.workloads.iter().map(WorkloadResponse::from).collect(),
        }
    }
}
