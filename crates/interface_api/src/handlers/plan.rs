//! Plan handlers

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use core_kernel::PlanId;

use crate::dto::plan::*;
use crate::extract::{ApiPath, ValidatedJson};
use crate::{error::ApiError, AppState};

/// Creates a plan
pub async fn create_plan(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreatePlanRequest>,
) -> Result<(StatusCode, Json<PlanResponse>), ApiError> {
    let plan = state.service.create_plan(request.into()).await?;
    Ok((StatusCode::CREATED, Json(plan.into())))
}

/// Lists plans
pub async fn list_plans(State(state): State<AppState>) -> Result<Json<Vec<PlanResponse>>, ApiError> {
    let plans = state.service.list_plans().await?;
    Ok(Json(plans.into_iter().map(PlanResponse::from).collect()))
}

/// Gets a plan by ID
pub async fn get_plan(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<PlanResponse>, ApiError> {
    let plan = state.service.get_plan(PlanId::from_uuid(id)).await?;
    Ok(Json(plan.into()))
}

/// Updates a plan that has no portfolios
pub async fn update_plan(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdatePlanRequest>,
) -> Result<Json<PlanResponse>, ApiError> {
    let plan = state
        .service
        .update_plan(PlanId::from_uuid(id), request.into())
        .await?;
    Ok(Json(plan.into()))
}

/// Deletes a plan that has no portfolios
pub async fn delete_plan(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_plan(PlanId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
