//! Baseline DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::UserId;
use domain_estimation::{Baseline, BaselineChanges, NewBaseline};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBaselineRequest {
    #[validate(length(min = 1, max = 20))]
    pub code: String,
    #[validate(range(min = 1))]
    pub review: i32,
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_year: i32,
    #[validate(range(min = 1, max = 12))]
    pub start_month: u32,
    #[validate(range(min = 1, max = 60))]
    pub duration: i32,
    pub manager_id: Uuid,
    pub estimator_id: Uuid,
}

impl From<CreateBaselineRequest> for NewBaseline {
    fn from(request: CreateBaselineRequest) -> Self {
        NewBaseline {
            code: request.code,
            review: request.review,
            title: request.title,
            description: request.description,
            start_year: request.start_year,
            start_month: request.start_month,
            duration: request.duration,
            manager_id: UserId::from_uuid(request.manager_id),
            estimator_id: UserId::from_uuid(request.estimator_id),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBaselineRequest {
    #[validate(length(min = 1, max = 20))]
    pub code: Option<String>,
    #[validate(range(min = 1))]
    pub review: Option<i32>,
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_year: Option<i32>,
    #[validate(range(min = 1, max = 12))]
    pub start_month: Option<u32>,
    #[validate(range(min = 1, max = 60))]
    pub duration: Option<i32>,
    pub manager_id: Option<Uuid>,
    pub estimator_id: Option<Uuid>,
}

impl From<UpdateBaselineRequest> for BaselineChanges {
    fn from(request: UpdateBaselineRequest) -> Self {
        BaselineChanges {
            code: request.code,
            review: request.review,
            title: request.title,
            description: request.description,
            start_year: request.start_year,
            start_month: request.start_month,
            duration: request.duration,
            manager_id: request.manager_id.map(UserId::from_uuid),
            estimator_id: request.estimator_id.map(UserId::from_uuid),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BaselineResponse {
    pub id: Uuid,
    pub code: String,
    pub review: i32,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub duration: i32,
    pub manager_id: Uuid,
    pub estimator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Baseline> for BaselineResponse {
    fn from(baseline: Baseline) -> Self {
        Self {
            id: *baseline.id().as_uuid(),
            code: baseline.code().to_string(),
            review: baseline.review(),
            title: baseline.title().to_string(),
            description: baseline.description().to_string(),
            start_date: baseline.start_date(),
            duration: baseline.duration(),
            manager_id: *baseline.manager_id().as_uuid(),
            estimator_id: *baseline.estimator_id().as_uuid(),
            created_at: baseline.created_at(),
            updated_at: baseline.updated_at(),
        }
    }
}
