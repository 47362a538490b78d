//! Portfolio handlers

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use core_kernel::{PlanId, PortfolioId};

use crate::dto::portfolio::*;
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::{error::ApiError, AppState};

/// Generates a portfolio from a baseline and a plan
pub async fn create_portfolio(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreatePortfolioRequest>,
) -> Result<(StatusCode, Json<PortfolioDetailResponse>), ApiError> {
    let detail = state.service.create_portfolio(request.into()).await?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}

/// Lists portfolios, optionally for one plan
pub async fn list_portfolios(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PortfolioQuery>,
) -> Result<Json<Vec<PortfolioResponse>>, ApiError> {
    let portfolios = state
        .service
        .list_portfolios(query.plan_id.map(PlanId::from_uuid))
        .await?;
    Ok(Json(portfolios.iter().map(PortfolioResponse::from).collect()))
}

/// Gets a portfolio with its budgets and workloads
pub async fn get_portfolio(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<PortfolioDetailResponse>, ApiError> {
    let detail = state.service.get_portfolio(PortfolioId::from_uuid(id)).await?;
    Ok(Json(detail.into()))
}

/// Deletes a portfolio with its budgets and workloads
pub async fn delete_portfolio(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_portfolio(PortfolioId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
