//! Estimation Domain Ports
//!
//! Persistence is reached through a transactional store. A use case opens a
//! transaction with [`EstimationStore::begin`], runs every read and write of
//! one logical operation through the returned [`EstimationTransaction`], and
//! then commits or rolls back. Dropping a transaction without committing
//! discards its writes.
//!
//! Adapters:
//!
//! - **PostgreSQL**: `infra_db::PostgresEstimationStore`
//! - **In-memory**: [`mock::InMemoryEstimationStore`], for tests
//!
//! ```rust,ignore
//! let mut tx = store.begin().await?;
//! let baseline = tx.get_baseline(baseline_id).await?;
//! tx.create_portfolio(&portfolio).await?;
//! tx.commit().await?;
//! ```

use async_trait::async_trait;

use core_kernel::{
    BaselineId, CostId, DomainPort, EffortId, HealthCheckable, PlanId, PortError, PortfolioId,
};

use crate::baseline::Baseline;
use crate::budget::Budget;
use crate::cost::Cost;
use crate::effort::Effort;
use crate::plan::Plan;
use crate::portfolio::Portfolio;
use crate::workload::Workload;

/// Reads and writes available inside one transaction
///
/// Lookups by id fail with `PortError::NotFound`. Writes that break a
/// uniqueness or reference rule fail with `PortError::Conflict`.
#[async_trait]
pub trait EstimationRepository: Send {
    // Plans
    async fn create_plan(&mut self, plan: &Plan) -> Result<(), PortError>;
    async fn get_plan(&mut self, id: PlanId) -> Result<Plan, PortError>;
    async fn list_plans(&mut self) -> Result<Vec<Plan>, PortError>;
    async fn update_plan(&mut self, plan: &Plan) -> Result<(), PortError>;
    async fn delete_plan(&mut self, id: PlanId) -> Result<(), PortError>;

    // Baselines
    async fn create_baseline(&mut self, baseline: &Baseline) -> Result<(), PortError>;
    async fn get_baseline(&mut self, id: BaselineId) -> Result<Baseline, PortError>;
    async fn list_baselines(&mut self) -> Result<Vec<Baseline>, PortError>;
    async fn update_baseline(&mut self, baseline: &Baseline) -> Result<(), PortError>;
    /// Deletes the baseline together with its costs and efforts
    async fn delete_baseline(&mut self, id: BaselineId) -> Result<(), PortError>;

    // Costs
    async fn create_cost(&mut self, cost: &Cost) -> Result<(), PortError>;
    async fn get_cost(&mut self, id: CostId) -> Result<Cost, PortError>;
    async fn get_costs_by_baseline(&mut self, baseline_id: BaselineId) -> Result<Vec<Cost>, PortError>;
    async fn update_cost(&mut self, cost: &Cost) -> Result<(), PortError>;
    async fn delete_cost(&mut self, id: CostId) -> Result<(), PortError>;

    // Efforts
    async fn create_effort(&mut self, effort: &Effort) -> Result<(), PortError>;
    async fn get_effort(&mut self, id: EffortId) -> Result<Effort, PortError>;
    async fn get_efforts_by_baseline(&mut self, baseline_id: BaselineId) -> Result<Vec<Effort>, PortError>;
    async fn update_effort(&mut self, effort: &Effort) -> Result<(), PortError>;
    async fn delete_effort(&mut self, id: EffortId) -> Result<(), PortError>;

    // Portfolios
    async fn create_portfolio(&mut self, portfolio: &Portfolio) -> Result<(), PortError>;
    async fn get_portfolio(&mut self, id: PortfolioId) -> Result<Portfolio, PortError>;
    async fn list_portfolios(&mut self, plan_id: Option<PlanId>) -> Result<Vec<Portfolio>, PortError>;
    /// Deletes the portfolio together with its budgets and workloads
    async fn delete_portfolio(&mut self, id: PortfolioId) -> Result<(), PortError>;
    /// Whether a portfolio exists for the plan and any revision of the baseline code
    async fn portfolio_exists(&mut self, plan_id: PlanId, baseline_code: &str) -> Result<bool, PortError>;
    async fn count_portfolios_by_baseline(&mut self, baseline_id: BaselineId) -> Result<i64, PortError>;
    async fn count_portfolios_by_plan(&mut self, plan_id: PlanId) -> Result<i64, PortError>;

    // Generated projections
    async fn create_budgets(&mut self, budgets: &[Budget]) -> Result<(), PortError>;
    async fn get_budgets_by_portfolio(&mut self, portfolio_id: PortfolioId) -> Result<Vec<Budget>, PortError>;
    async fn create_workloads(&mut self, workloads: &[Workload]) -> Result<(), PortError>;
    async fn get_workloads_by_portfolio(&mut self, portfolio_id: PortfolioId) -> Result<Vec<Workload>, PortError>;
}

/// A unit of work over the repository
#[async_trait]
pub trait EstimationTransaction: EstimationRepository {
    async fn commit(self: Box<Self>) -> Result<(), PortError>;
    async fn rollback(self: Box<Self>) -> Result<(), PortError>;
}

/// Entry point for persistence adapters
#[async_trait]
pub trait EstimationStore: DomainPort + HealthCheckable {
    async fn begin(&self) -> Result<Box<dyn EstimationTransaction>, PortError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::{Mutex, OwnedMutexGuard};
    use chrono::Utc;

    use core_kernel::{BudgetId, HealthCheckResult, WorkloadId};

    #[derive(Debug, Clone, Default)]
    struct MemoryState {
        plans: HashMap<PlanId, Plan>,
        baselines: HashMap<BaselineId, Baseline>,
        costs: HashMap<CostId, Cost>,
        efforts: HashMap<EffortId, Effort>,
        portfolios: HashMap<PortfolioId, Portfolio>,
        budgets: HashMap<BudgetId, Budget>,
        workloads: HashMap<WorkloadId, Workload>,
    }

    /// In-memory store; transactions are serialized by a single lock
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryEstimationStore {
        state: Arc<Mutex<MemoryState>>,
    }

    impl InMemoryEstimationStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DomainPort for InMemoryEstimationStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryEstimationStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "memory-estimation-store".to_string(),
                status: core_kernel::AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("In-memory store always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl EstimationStore for InMemoryEstimationStore {
        async fn begin(&self) -> Result<Box<dyn EstimationTransaction>, PortError> {
            let guard = self.state.clone().lock_owned().await;
            let working = guard.clone();
            Ok(Box::new(InMemoryTransaction { guard, working }))
        }
    }

    /// Works on a copy of the state and writes it back on commit
    pub struct InMemoryTransaction {
        guard: OwnedMutexGuard<MemoryState>,
        working: MemoryState,
    }

    fn sorted<K, V: Clone, F, O>(map: &HashMap<K, V>, filter: F, key: O) -> Vec<V>
    where
        F: Fn(&V) -> bool,
        O: Fn(&V) -> String,
    {
        let mut values: Vec<V> = map.values().filter(|v| filter(*v)).cloned().collect();
        values.sort_by_key(|v| key(v));
        values
    }

    #[async_trait]
    impl EstimationTransaction for InMemoryTransaction {
        async fn commit(self: Box<Self>) -> Result<(), PortError> {
            let InMemoryTransaction { mut guard, working } = *self;
            *guard = working;
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<(), PortError> {
            Ok(())
        }
    }

    #[async_trait]
    impl EstimationRepository for InMemoryTransaction {
        async fn create_plan(&mut self, plan: &Plan) -> Result<(), PortError> {
            if self.working.plans.values().any(|p| p.code() == plan.code()) {
                return Err(PortError::conflict(format!("plan code {} already exists", plan.code())));
            }
            self.working.plans.insert(plan.id(), plan.clone());
            Ok(())
        }

        async fn get_plan(&mut self, id: PlanId) -> Result<Plan, PortError> {
            self.working
                .plans
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Plan", id))
        }

        async fn list_plans(&mut self) -> Result<Vec<Plan>, PortError> {
            Ok(sorted(&self.working.plans, |_| true, |p| p.code().to_string()))
        }

        async fn update_plan(&mut self, plan: &Plan) -> Result<(), PortError> {
            if !self.working.plans.contains_key(&plan.id()) {
                return Err(PortError::not_found("Plan", plan.id()));
            }
            if self
                .working
                .plans
                .values()
                .any(|p| p.id() != plan.id() && p.code() == plan.code())
            {
                return Err(PortError::conflict(format!("plan code {} already exists", plan.code())));
            }
            self.working.plans.insert(plan.id(), plan.clone());
            Ok(())
        }

        async fn delete_plan(&mut self, id: PlanId) -> Result<(), PortError> {
            self.working
                .plans
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Plan", id))
        }

        async fn create_baseline(&mut self, baseline: &Baseline) -> Result<(), PortError> {
            if self
                .working
                .baselines
                .values()
                .any(|b| b.code() == baseline.code() && b.review() == baseline.review())
            {
                return Err(PortError::conflict(format!(
                    "baseline code {} review {} already exists",
                    baseline.code(),
                    baseline.review()
                )));
            }
            self.working.baselines.insert(baseline.id(), baseline.clone());
            Ok(())
        }

        async fn get_baseline(&mut self, id: BaselineId) -> Result<Baseline, PortError> {
            self.working
                .baselines
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Baseline", id))
        }

        async fn list_baselines(&mut self) -> Result<Vec<Baseline>, PortError> {
            Ok(sorted(&self.working.baselines, |_| true, |b| format!("{}#{:010}", b.code(), b.review())))
        }

        async fn update_baseline(&mut self, baseline: &Baseline) -> Result<(), PortError> {
            if !self.working.baselines.contains_key(&baseline.id()) {
                return Err(PortError::not_found("Baseline", baseline.id()));
            }
            if self.working.baselines.values().any(|b| {
                b.id() != baseline.id() && b.code() == baseline.code() && b.review() == baseline.review()
            }) {
                return Err(PortError::conflict(format!(
                    "baseline code {} review {} already exists",
                    baseline.code(),
                    baseline.review()
                )));
            }
            self.working.baselines.insert(baseline.id(), baseline.clone());
            Ok(())
        }

        async fn delete_baseline(&mut self, id: BaselineId) -> Result<(), PortError> {
            if self.working.baselines.remove(&id).is_none() {
                return Err(PortError::not_found("Baseline", id));
            }
            self.working.costs.retain(|_, c| c.baseline_id() != id);
            self.working.efforts.retain(|_, e| e.baseline_id() != id);
            Ok(())
        }

        async fn create_cost(&mut self, cost: &Cost) -> Result<(), PortError> {
            if !self.working.baselines.contains_key(&cost.baseline_id()) {
                return Err(PortError::conflict(format!("baseline {} does not exist", cost.baseline_id())));
            }
            self.working.costs.insert(cost.id(), cost.clone());
            Ok(())
        }

        async fn get_cost(&mut self, id: CostId) -> Result<Cost, PortError> {
            self.working
                .costs
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Cost", id))
        }

        async fn get_costs_by_baseline(&mut self, baseline_id: BaselineId) -> Result<Vec<Cost>, PortError> {
            Ok(sorted(
                &self.working.costs,
                |c| c.baseline_id() == baseline_id,
                |c| c.id().as_uuid().to_string(),
            ))
        }

        async fn update_cost(&mut self, cost: &Cost) -> Result<(), PortError> {
            if !self.working.costs.contains_key(&cost.id()) {
                return Err(PortError::not_found("Cost", cost.id()));
            }
            self.working.costs.insert(cost.id(), cost.clone());
            Ok(())
        }

        async fn delete_cost(&mut self, id: CostId) -> Result<(), PortError> {
            self.working
                .costs
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Cost", id))
        }

        async fn create_effort(&mut self, effort: &Effort) -> Result<(), PortError> {
            if !self.working.baselines.contains_key(&effort.baseline_id()) {
                return Err(PortError::conflict(format!("baseline {} does not exist", effort.baseline_id())));
            }
            self.working.efforts.insert(effort.id(), effort.clone());
            Ok(())
        }

        async fn get_effort(&mut self, id: EffortId) -> Result<Effort, PortError> {
            self.working
                .efforts
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Effort", id))
        }

        async fn get_efforts_by_baseline(&mut self, baseline_id: BaselineId) -> Result<Vec<Effort>, PortError> {
            Ok(sorted(
                &self.working.efforts,
                |e| e.baseline_id() == baseline_id,
                |e| e.id().as_uuid().to_string(),
            ))
        }

        async fn update_effort(&mut self, effort: &Effort) -> Result<(), PortError> {
            if !self.working.efforts.contains_key(&effort.id()) {
                return Err(PortError::not_found("Effort", effort.id()));
            }
            self.working.efforts.insert(effort.id(), effort.clone());
            Ok(())
        }

        async fn delete_effort(&mut self, id: EffortId) -> Result<(), PortError> {
            self.working
                .efforts
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Effort", id))
        }

        async fn create_portfolio(&mut self, portfolio: &Portfolio) -> Result<(), PortError> {
            let baseline = self
                .working
                .baselines
                .get(&portfolio.baseline_id())
                .ok_or_else(|| PortError::conflict(format!("baseline {} does not exist", portfolio.baseline_id())))?;
            if !self.working.plans.contains_key(&portfolio.plan_id()) {
                return Err(PortError::conflict(format!("plan {} does not exist", portfolio.plan_id())));
            }
            let code = baseline.code().to_string();
            if self.portfolio_exists(portfolio.plan_id(), &code).await? {
                return Err(PortError::conflict(format!(
                    "portfolio for plan id {} and baseline code {} already exists",
                    portfolio.plan_id(),
                    code
                )));
            }
            self.working.portfolios.insert(portfolio.id(), portfolio.clone());
            Ok(())
        }

        async fn get_portfolio(&mut self, id: PortfolioId) -> Result<Portfolio, PortError> {
            self.working
                .portfolios
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Portfolio", id))
        }

        async fn list_portfolios(&mut self, plan_id: Option<PlanId>) -> Result<Vec<Portfolio>, PortError> {
            Ok(sorted(
                &self.working.portfolios,
                |p| plan_id.map_or(true, |id| p.plan_id() == id),
                |p| p.id().as_uuid().to_string(),
            ))
        }

        async fn delete_portfolio(&mut self, id: PortfolioId) -> Result<(), PortError> {
            if self.working.portfolios.remove(&id).is_none() {
                return Err(PortError::not_found("Portfolio", id));
            }
            self.working.budgets.retain(|_, b| b.portfolio_id() != id);
            self.working.workloads.retain(|_, w| w.portfolio_id() != id);
            Ok(())
        }

        async fn portfolio_exists(&mut self, plan_id: PlanId, baseline_code: &str) -> Result<bool, PortError> {
            let baselines = &self.working.baselines;
            Ok(self.working.portfolios.values().any(|p| {
                p.plan_id() == plan_id
                    && baselines
                        .get(&p.baseline_id())
                        .map_or(false, |b| b.code() == baseline_code)
            }))
        }

        async fn count_portfolios_by_baseline(&mut self, baseline_id: BaselineId) -> Result<i64, PortError> {
            Ok(self
                .working
                .portfolios
                .values()
                .filter(|p| p.baseline_id() == baseline_id)
                .count() as i64)
        }

        async fn count_portfolios_by_plan(&mut self, plan_id: PlanId) -> Result<i64, PortError> {
            Ok(self
                .working
                .portfolios
                .values()
                .filter(|p| p.plan_id() == plan_id)
                .count() as i64)
        }

        async fn create_budgets(&mut self, budgets: &[Budget]) -> Result<(), PortError> {
            for budget in budgets {
                if !self.working.portfolios.contains_key(&budget.portfolio_id()) {
                    return Err(PortError::conflict(format!("portfolio {} does not exist", budget.portfolio_id())));
                }
                self.working.budgets.insert(budget.id(), budget.clone());
            }
            Ok(())
        }

        async fn get_budgets_by_portfolio(&mut self, portfolio_id: PortfolioId) -> Result<Vec<Budget>, PortError> {
            Ok(sorted(
                &self.working.budgets,
                |b| b.portfolio_id() == portfolio_id,
                |b| b.id().as_uuid().to_string(),
            ))
        }

        async fn create_workloads(&mut self, workloads: &[Workload]) -> Result<(), PortError> {
            for workload in workloads {
                if !self.working.portfolios.contains_key(&workload.portfolio_id()) {
                    return Err(PortError::conflict(format!("portfolio {} does not exist", workload.portfolio_id())));
                }
                self.working.workloads.insert(workload.id(), workload.clone());
            }
            Ok(())
        }

        async fn get_workloads_by_portfolio(&mut self, portfolio_id: PortfolioId) -> Result<Vec<Workload>, PortError> {
            Ok(sorted(
                &self.working.workloads,
                |w| w.portfolio_id() == portfolio_id,
                |w| w.id().as_uuid().to_string(),
            ))
        }
    }
}
