//! Effort handlers, nested under a baseline

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use core_kernel::{BaselineId, EffortId};

use crate::dto::effort::*;
use crate::extract::{ApiPath, ValidatedJson};
use crate::{error::ApiError, AppState};

pub async fn create_effort(
    State(state): State<AppState>,
    ApiPath(baseline_id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<CreateEffortRequest>,
) -> Result<(StatusCode, Json<EffortResponse>), ApiError> {
    let input = request.into_new_effort(BaselineId::from_uuid(baseline_id));
    let effort = state.service.create_effort(input).await?;
    Ok((StatusCode::CREATED, Json(effort.into())))
}

pub async fn list_efforts(
    State(state): State<AppState>,
    ApiPath(baseline_id): ApiPath<Uuid>,
) -> Result<Json<Vec<EffortResponse>>, ApiError> {
    let efforts = state.service.list_efforts(BaselineId::from_uuid(baseline_id)).await?;
    Ok(Json(efforts.into_iter().map(EffortResponse::from).collect()))
}

pub async fn update_effort(
    State(state): State<AppState>,
    ApiPath((baseline_id, effort_id)): ApiPath<(Uuid, Uuid)>,
    ValidatedJson(request): ValidatedJson<UpdateEffortRequest>,
) -> Result<Json<EffortResponse>, ApiError> {
    let effort = state
        .service
        .update_effort(
            BaselineId::from_uuid(baseline_id),
            EffortId::from_uuid(effort_id),
            request.into(),
        )
        .await?;
    Ok(Json(effort.into()))
}

pub async fn delete_effort(
    State(state): State<AppState>,
    ApiPath((baseline_id, effort_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .delete_effort(BaselineId::from_uuid(baseline_id), EffortId::from_uuid(effort_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
