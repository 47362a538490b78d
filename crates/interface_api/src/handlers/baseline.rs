//! Baseline handlers

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use core_kernel::BaselineId;

use crate::dto::baseline::*;
use crate::extract::{ApiPath, ValidatedJson};
use crate::{error::ApiError, AppState};

/// Creates a baseline
pub async fn create_baseline(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateBaselineRequest>,
) -> Result<(StatusCode, Json<BaselineResponse>), ApiError> {
    let baseline = state.service.create_baseline(request.into()).await?;
    Ok((StatusCode::CREATED, Json(baseline.into())))
}

/// Lists baselines
pub async fn list_baselines(
    State(state): State<AppState>,
) -> Result<Json<Vec<BaselineResponse>>, ApiError> {
    let baselines = state.service.list_baselines().await?;
    Ok(Json(baselines.into_iter().map(BaselineResponse::from).collect()))
}

/// Gets a baseline by ID
pub async fn get_baseline(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<BaselineResponse>, ApiError> {
    let baseline = state.service.get_baseline(BaselineId::from_uuid(id)).await?;
    Ok(Json(baseline.into()))
}

/// Updates a baseline that has no portfolios
pub async fn update_baseline(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateBaselineRequest>,
) -> Result<Json<BaselineResponse>, ApiError> {
    let baseline = state
        .service
        .update_baseline(BaselineId::from_uuid(id), request.into())
        .await?;
    Ok(Json(baseline.into()))
}

/// Deletes a baseline with its costs and efforts
pub async fn delete_baseline(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_baseline(BaselineId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
