//! Effort DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{BaselineId, CompetenceId};
use domain_estimation::{Effort, EffortAllocationInput, EffortChanges, NewEffort};

/// Upper bound of the hours of one effort
pub const MAX_EFFORT_HOURS: i32 = 160_000;

/// Upper bound of the hours of one month of an effort
pub const MAX_ALLOCATION_HOURS: i32 = 8_000;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Validate)]
pub struct EffortAllocationDto {
    pub year: i32,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    #[validate(range(min = 1, max = MAX_ALLOCATION_HOURS))]
    pub hours: i32,
}

impl From<EffortAllocationDto> for EffortAllocationInput {
    fn from(dto: EffortAllocationDto) -> Self {
        EffortAllocationInput {
            year: dto.year,
            month: dto.month,
            hours: dto.hours,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEffortRequest {
    pub competence_id: Uuid,
    #[serde(default)]
    pub comment: String,
    #[validate(range(min = 1, max = MAX_EFFORT_HOURS))]
    pub hours: i32,
    #[validate(length(min = 1), nested)]
    pub allocations: Vec<EffortAllocationDto>,
}

impl CreateEffortRequest {
    pub fn into_new_effort(self, baseline_id: BaselineId) -> NewEffort {
        NewEffort {
            baseline_id,
            competence_id: CompetenceId::from_uuid(self.competence_id),
            comment: self.comment,
            hours: self.hours,
            allocations: self.allocations.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateEffortRequest {
    pub competence_id: Option<Uuid>,
    pub comment: Option<String>,
    #[validate(range(min = 1, max = MAX_EFFORT_HOURS))]
    pub hours: Option<i32>,
    #[validate(length(min = 1), nested)]
    pub allocations: Option<Vec<EffortAllocationDto>>,
}

impl From<UpdateEffortRequest> for EffortChanges {
    fn from(request: UpdateEffortRequest) -> Self {
        EffortChanges {
            competence_id: request.competence_id.map(CompetenceId::from_uuid),
            comment: request.comment,
            hours: request.hours,
            allocations: request
                .allocations
                .map(|allocations| allocations.into_iter().map(Into::into).collect()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EffortResponse {
    pub id: Uuid,
    pub baseline_id: Uuid,
    pub competence_id: Uuid,
    pub comment: String,
    pub hours: i32,
    pub allocations: Vec<EffortAllocationDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Effort> for EffortResponse {
    fn from(effort: Effort) -> Self {
        Self {
            id: *effort.id().as_uuid(),
            baseline_id: *effort.baseline_id().as_uuid(),
            competence_id: *effort.competence_id().as_uuid(),
            comment: effort.comment().to_string(),
            hours: effort.hours(),
            allocations: effort
                .allocations()
                .iter()
                .map(|a| EffortAllocationDto {
                    year: a.year(),
                    month: a.month(),
                    hours: a.hours(),
                })
                .collect(),
            created_at: effort.created_at(),
            updated_at: effort.updated_at(),
        }
    }
}
