//! Cost handlers, nested under a baseline

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use core_kernel::{BaselineId, CostId};

use crate::dto::cost::*;
use crate::extract::{ApiPath, ValidatedJson};
use crate::{error::ApiError, AppState};

pub async fn create_cost(
    State(state): State<AppState>,
    ApiPath(baseline_id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<CreateCostRequest>,
) -> Result<(StatusCode, Json<CostResponse>), ApiError> {
    let input = request.into_new_cost(BaselineId::from_uuid(baseline_id));
    let cost = state.service.create_cost(input).await?;
    Ok((StatusCode::CREATED, Json(cost.into())))
}

pub async fn list_costs(
    State(state): State<AppState>,
    ApiPath(baseline_id): ApiPath<Uuid>,
) -> Result<Json<Vec<CostResponse>>, ApiError> {
    let costs = state.service.list_costs(BaselineId::from_uuid(baseline_id)).await?;
    Ok(Json(costs.into_iter().map(CostResponse::from).collect()))
}

pub async fn update_cost(
    State(state): State<AppState>,
    ApiPath((baseline_id, cost_id)): ApiPath<(Uuid, Uuid)>,
    ValidatedJson(request): ValidatedJson<UpdateCostRequest>,
) -> Result<Json<CostResponse>, ApiError> {
    let cost = state
        .service
        .update_cost(
            BaselineId::from_uuid(baseline_id),
            CostId::from_uuid(cost_id),
            request.into(),
        )
        .await?;
    Ok(Json(cost.into()))
}

pub async fn delete_cost(
    State(state): State<AppState>,
    ApiPath((baseline_id, cost_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .delete_cost(BaselineId::from_uuid(baseline_id), CostId::from_uuid(cost_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
