//! Cost DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{BaselineId, Currency};
use domain_estimation::{Cost, CostAllocationInput, CostChanges, CostType, NewCost};

use super::validate_two_decimals;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Validate)]
pub struct CostAllocationDto {
    pub year: i32,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    #[validate(custom(function = "validate_two_decimals"))]
    pub amount: f64,
}

impl From<CostAllocationDto> for CostAllocationInput {
    fn from(dto: CostAllocationDto) -> Self {
        CostAllocationInput {
            year: dto.year,
            month: dto.month,
            amount: dto.amount,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCostRequest {
    pub cost_type: CostType,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub comment: String,
    #[validate(custom(function = "validate_two_decimals"))]
    pub amount: f64,
    pub currency: Currency,
    #[serde(default)]
    #[validate(range(min = 0.0), custom(function = "validate_two_decimals"))]
    pub tax: f64,
    #[serde(default)]
    pub apply_inflation: bool,
    #[validate(length(min = 1), nested)]
    pub allocations: Vec<CostAllocationDto>,
}

impl CreateCostRequest {
    pub fn into_new_cost(self, baseline_id: BaselineId) -> NewCost {
        NewCost {
            baseline_id,
            cost_type: self.cost_type,
            description: self.description,
            comment: self.comment,
            amount: self.amount,
            currency: self.currency,
            tax: self.tax,
            apply_inflation: self.apply_inflation,
            allocations: self.allocations.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCostRequest {
    pub cost_type: Option<CostType>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub comment: Option<String>,
    #[validate(custom(function = "validate_two_decimals"))]
    pub amount: Option<f64>,
    pub currency: Option<Currency>,
    #[validate(range(min = 0.0), custom(function = "validate_two_decimals"))]
    pub tax: Option<f64>,
    pub apply_inflation: Option<bool>,
    #[validate(length(min = 1), nested)]
    pub allocations: Option<Vec<CostAllocationDto>>,
}

impl From<UpdateCostRequest> for CostChanges {
    fn from(request: UpdateCostRequest) -> Self {
        CostChanges {
            cost_type: request.cost_type,
            description: request.description,
            comment: request.comment,
            amount: request.amount,
            currency: request.currency,
            tax: request.tax,
            apply_inflation: request.apply_inflation,
            allocations: request
                .allocations
                .map(|allocations| allocations.into_iter().map(Into::into).collect()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CostResponse {
    pub id: Uuid,
    pub baseline_id: Uuid,
    pub cost_type: CostType,
    pub description: String,
    pub comment: String,
    pub amount: f64,
    pub currency: Currency,
    pub tax: f64,
    pub apply_inflation: bool,
    pub allocations: Vec<CostAllocationDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Cost> for CostResponse {
    fn from(cost: Cost) -> Self {
        Self {
            id: *cost.id().as_uuid(),
            baseline_id: *cost.baseline_id().as_uuid(),
            cost_type: cost.cost_type(),
            description: cost.description().to_string(),
            comment: cost.comment().to_string(),
            amount: cost.amount(),
            currency: cost.currency(),
            tax: cost.tax(),
            apply_inflation: cost.apply_inflation(),
            allocations: cost
                .allocations()
                .iter()
                .map(|a| CostAllocationDto {
                    year: a.year(),
                    month: a.month(),
                    amount: a.amount(),
                })
                .collect(),
            created_at: cost.created_at(),
            updated_at: cost.updated_at(),
        }
    }
}
