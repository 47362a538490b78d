//! PostgreSQL Estimation Adapter
//!
//! `PostgresEstimationStore` opens one database transaction per use case and
//! hands it out as an `EstimationTransaction`. Every repository call made
//! through the transaction runs on that connection, so a use case either
//! commits all of its writes or none of them.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, BaselineId, CostId, DomainPort, EffortId, HealthCheckResult, HealthCheckable, PlanId,
    PortError, PortfolioId,
};
use domain_estimation::{
    Baseline, Budget, Cost, Effort, EstimationRepository, EstimationStore, EstimationTransaction, Plan,
    Portfolio, Workload,
};

use crate::error::DatabaseError;
use crate::repositories::{baseline, cost, effort, plan, portfolio};

const ADAPTER_ID: &str = "postgres-estimation-store";

/// PostgreSQL-backed implementation of `EstimationStore`
#[derive(Debug, Clone)]
pub struct PostgresEstimationStore {
    pool: PgPool,
}

impl PostgresEstimationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl DomainPort for PostgresEstimationStore {}

#[async_trait]
impl HealthCheckable for PostgresEstimationStore {
    /// Runs `SELECT 1` against the pool
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl EstimationStore for PostgresEstimationStore {
    async fn begin(&self) -> Result<Box<dyn EstimationTransaction>, PortError> {
        let tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        Ok(Box::new(PostgresTransaction { tx }))
    }
}

/// One open database transaction
///
/// Dropping it without calling `commit` rolls the transaction back.
pub struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl EstimationTransaction for PostgresTransaction {
    async fn commit(self: Box<Self>) -> Result<(), PortError> {
        self.tx.commit().await.map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), PortError> {
        self.tx.rollback().await.map_err(DatabaseError::from)?;
        Ok(())
    }
}

/// Replaces the raw unique-violation text with a message naming the clash
fn duplicate_as(message: String) -> impl FnOnce(DatabaseError) -> PortError {
    move |err| match err {
        DatabaseError::DuplicateEntry(_) => PortError::conflict(message),
        other => other.into(),
    }
}

#[async_trait]
impl EstimationRepository for PostgresTransaction {
    #[instrument(skip(self, plan), fields(plan_id = %plan.id()))]
    async fn create_plan(&mut self, plan: &Plan) -> Result<(), PortError> {
        plan::insert(&mut self.tx, plan)
            .await
            .map_err(duplicate_as(format!("plan code {} already exists", plan.code())))
    }

    async fn get_plan(&mut self, id: PlanId) -> Result<Plan, PortError> {
        Ok(plan::find(&mut self.tx, id).await?)
    }

    async fn list_plans(&mut self) -> Result<Vec<Plan>, PortError> {
        Ok(plan::list(&mut self.tx).await?)
    }

    async fn update_plan(&mut self, plan: &Plan) -> Result<(), PortError> {
        plan::update(&mut self.tx, plan)
            .await
            .map_err(duplicate_as(format!("plan code {} already exists", plan.code())))
    }

    async fn delete_plan(&mut self, id: PlanId) -> Result<(), PortError> {
        Ok(plan::delete(&mut self.tx, id).await?)
    }

    #[instrument(skip(self, baseline), fields(baseline_id = %baseline.id()))]
    async fn create_baseline(&mut self, baseline: &Baseline) -> Result<(), PortError> {
        baseline::insert(&mut self.tx, baseline).await.map_err(duplicate_as(format!(
            "baseline code {} review {} already exists",
            baseline.code(),
            baseline.review()
        )))
    }

    async fn get_baseline(&mut self, id: BaselineId) -> Result<Baseline, PortError> {
        Ok(baseline::find(&mut self.tx, id).await?)
    }

    async fn list_baselines(&mut self) -> Result<Vec<Baseline>, PortError> {
        Ok(baseline::list(&mut self.tx).await?)
    }

    async fn update_baseline(&mut self, baseline: &Baseline) -> Result<(), PortError> {
        baseline::update(&mut self.tx, baseline).await.map_err(duplicate_as(format!(
            "baseline code {} review {} already exists",
            baseline.code(),
            baseline.review()
        )))
    }

    async fn delete_baseline(&mut self, id: BaselineId) -> Result<(), PortError> {
        Ok(baseline::delete(&mut self.tx, id).await?)
    }

    #[instrument(skip(self, cost), fields(cost_id = %cost.id()))]
    async fn create_cost(&mut self, cost: &Cost) -> Result<(), PortError> {
        Ok(cost::insert(&mut self.tx, cost).await?)
    }

    async fn get_cost(&mut self, id: CostId) -> Result<Cost, PortError> {
        Ok(cost::find(&mut self.tx, id).await?)
    }

    async fn get_costs_by_baseline(&mut self, baseline_id: BaselineId) -> Result<Vec<Cost>, PortError> {
        Ok(cost::find_by_baseline(&mut self.tx, baseline_id).await?)
    }

    async fn update_cost(&mut self, cost: &Cost) -> Result<(), PortError> {
        Ok(cost::update(&mut self.tx, cost).await?)
    }

    async fn delete_cost(&mut self, id: CostId) -> Result<(), PortError> {
        Ok(cost::delete(&mut self.tx, id).await?)
    }

    #[instrument(skip(self, effort), fields(effort_id = %effort.id()))]
    async fn create_effort(&mut self, effort: &Effort) -> Result<(), PortError> {
        Ok(effort::insert(&mut self.tx, effort).await?)
    }

    async fn get_effort(&mut self, id: EffortId) -> Result<Effort, PortError> {
        Ok(effort::find(&mut self.tx, id).await?)
    }

    async fn get_efforts_by_baseline(&mut self, baseline_id: BaselineId) -> Result<Vec<Effort>, PortError> {
        Ok(effort::find_by_baseline(&mut self.tx, baseline_id).await?)
    }

    async fn update_effort(&mut self, effort: &Effort) -> Result<(), PortError> {
        Ok(effort::update(&mut self.tx, effort).await?)
    }

    async fn delete_effort(&mut self, id: EffortId) -> Result<(), PortError> {
        Ok(effort::delete(&mut self.tx, id).await?)
    }

    #[instrument(skip(self, portfolio), fields(portfolio_id = %portfolio.id()))]
    async fn create_portfolio(&mut self, portfolio: &Portfolio) -> Result<(), PortError> {
        let code = baseline::find(&mut self.tx, portfolio.baseline_id())
            .await?
            .code()
            .to_string();
        if self.portfolio_exists(portfolio.plan_id(), &code).await? {
            return Err(PortError::conflict(format!(
                "portfolio for plan id {} and baseline code {} already exists",
                portfolio.plan_id(),
                code
            )));
        }
        debug!("Inserting portfolio");
        Ok(portfolio::insert(&mut self.tx, portfolio).await?)
    }

    async fn get_portfolio(&mut self, id: PortfolioId) -> Result<Portfolio, PortError> {
        Ok(portfolio::find(&mut self.tx, id).await?)
    }

    async fn list_portfolios(&mut self, plan_id: Option<PlanId>) -> Result<Vec<Portfolio>, PortError> {
        Ok(portfolio::list(&mut self.tx, plan_id).await?)
    }

    async fn delete_portfolio(&mut self, id: PortfolioId) -> Result<(), PortError> {
        Ok(portfolio::delete(&mut self.tx, id).await?)
    }

    /// Locks the plan row first, so the answer holds until commit
    async fn portfolio_exists(&mut self, plan_id: PlanId, baseline_code: &str) -> Result<bool, PortError> {
        plan::lock(&mut self.tx, plan_id).await?;
        Ok(portfolio::exists_for_plan_and_code(&mut self.tx, plan_id, baseline_code).await?)
    }

    async fn count_portfolios_by_baseline(&mut self, baseline_id: BaselineId) -> Result<i64, PortError> {
        Ok(portfolio::count_by_baseline(&mut self.tx, baseline_id).await?)
    }

    async fn count_portfolios_by_plan(&mut self, plan_id: PlanId) -> Result<i64, PortError> {
        Ok(portfolio::count_by_plan(&mut self.tx, plan_id).await?)
    }

    async fn create_budgets(&mut self, budgets: &[Budget]) -> Result<(), PortError> {
        debug!(count = budgets.len(), "Inserting budgets");
        Ok(portfolio::insert_budgets(&mut self.tx, budgets).await?)
    }

    async fn get_budgets_by_portfolio(&mut self, portfolio_id: PortfolioId) -> Result<Vec<Budget>, PortError> {
        Ok(portfolio::find_budgets(&mut self.tx, portfolio_id).await?)
    }

    async fn create_workloads(&mut self, workloads: &[Workload]) -> Result<(), PortError> {
        debug!(count = workloads.len(), "Inserting workloads");
        Ok(portfolio::insert_workloads(&mut self.tx, workloads).await?)
    }

    async fn get_workloads_by_portfolio(&mut self, portfolio_id: PortfolioId) -> Result<Vec<Workload>, PortError> {
        Ok(portfolio::find_workloads(&mut self.tx, portfolio_id).await?)
    }
}
