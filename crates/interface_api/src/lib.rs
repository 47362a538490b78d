//! HTTP API Layer
//!
//! This crate provides the REST API for plans, baselines and portfolio
//! generation using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for each resource
//! - **Middleware**: Request tracing and logging
//! - **DTOs**: Request/Response data transfer objects with `validator` rules
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(service, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod handlers;
pub mod dto;

use axum::{
    middleware as axum_middleware,
    routing::{get, patch},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_estimation::EstimationService;

use crate::config::ApiConfig;
use crate::handlers::{baseline, cost, effort, health, plan, portfolio};
use crate::middleware::request_logging_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: EstimationService,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `service` - Estimation use cases over a store
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(service: EstimationService, config: ApiConfig) -> Router {
    let state = AppState { service, config };

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let plan_routes = Router::new()
        .route("/", get(plan::list_plans).post(plan::create_plan))
        .route(
            "/:plan_id",
            get(plan::get_plan)
                .patch(plan::update_plan)
                .delete(plan::delete_plan),
        );

    let baseline_routes = Router::new()
        .route("/", get(baseline::list_baselines).post(baseline::create_baseline))
        .route(
            "/:baseline_id",
            get(baseline::get_baseline)
                .patch(baseline::update_baseline)
                .delete(baseline::delete_baseline),
        )
        .route(
            "/:baseline_id/costs",
            get(cost::list_costs).post(cost::create_cost),
        )
        .route(
            "/:baseline_id/costs/:cost_id",
            patch(cost::update_cost).delete(cost::delete_cost),
        )
        .route(
            "/:baseline_id/efforts",
            get(effort::list_efforts).post(effort::create_effort),
        )
        .route(
            "/:baseline_id/efforts/:effort_id",
            patch(effort::update_effort).delete(effort::delete_effort),
        );

    let portfolio_routes = Router::new()
        .route(
            "/",
            get(portfolio::list_portfolios).post(portfolio::create_portfolio),
        )
        .route(
            "/:portfolio_id",
            get(portfolio::get_portfolio).delete(portfolio::delete_portfolio),
        );

    let api_routes = Router::new()
        .nest("/plans", plan_routes)
        .nest("/baselines", baseline_routes)
        .nest("/portfolios", portfolio_routes);

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(axum_middleware::from_fn(request_logging_middleware)),
        )
        .with_state(state)
}
