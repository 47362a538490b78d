//! Plan DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_estimation::{Assumption, NewPlan, Plan, PlanChanges};

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, max = 10))]
    pub code: String,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(min = 1))]
    pub assumptions: Vec<Assumption>,
}

impl From<CreatePlanRequest> for NewPlan {
    fn from(request: CreatePlanRequest) -> Self {
        NewPlan {
            code: request.code,
            name: request.name,
            assumptions: request.assumptions,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePlanRequest {
    #[validate(length(min = 1, max = 10))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub assumptions: Option<Vec<Assumption>>,
}

impl From<UpdatePlanRequest> for PlanChanges {
    fn from(request: UpdatePlanRequest) -> Self {
        PlanChanges {
            code: request.code,
            name: request.name,
            assumptions: request.assumptions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub assumptions: Vec<Assumption>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        Self {
            id: *plan.id().as_uuid(),
            code: plan.code().to_string(),
            name: plan.name().to_string(),
            assumptions: plan.assumptions().to_vec(),
            created_at: plan.created_at(),
            updated_at: plan.updated_at(),
        }
    }
}
