//! Application use cases
//!
//! Each operation runs inside one store transaction: it is committed when the
//! operation succeeds and rolled back on the first error.

use std::sync::Arc;

use tracing::{debug, info, warn};

use core_kernel::{BaselineId, CostId, EffortId, PlanId, PortfolioId};

use crate::baseline::{Baseline, BaselineChanges, NewBaseline};
use crate::budget::Budget;
use crate::cost::{Cost, CostChanges, NewCost};
use crate::effort::{Effort, EffortChanges, NewEffort};
use crate::error::EstimationError;
use crate::plan::{NewPlan, Plan, PlanChanges};
use crate::portfolio::Portfolio;
use crate::ports::{EstimationStore, EstimationTransaction};
use crate::services::{PortfolioService, MAX_SHIFT_MONTHS};
use crate::workload::Workload;

/// Request to project a baseline under a plan
#[derive(Debug, Clone, Copy)]
pub struct CreatePortfolioInput {
    pub baseline_id: BaselineId,
    pub plan_id: PlanId,
    pub shift_months: u32,
}

/// A portfolio with everything generated for it
#[derive(Debug, Clone)]
pub struct PortfolioDetail {
    pub portfolio: Portfolio,
    pub budgets: Vec<Budget>,
    pub workloads: Vec<Workload>,
}

/// Entry point for every estimation operation
#[derive(Clone)]
pub struct EstimationService {
    store: Arc<dyn EstimationStore>,
}

impl EstimationService {
    pub fn new(store: Arc<dyn EstimationStore>) -> Self {
        Self { store }
    }

    /// The underlying store, for health checks
    pub fn store(&self) -> &Arc<dyn EstimationStore> {
        &self.store
    }

    // ------------------------------------------------------------------
    // Plans
    // ------------------------------------------------------------------

    pub async fn create_plan(&self, input: NewPlan) -> Result<Plan, EstimationError> {
        let plan = Plan::new(input)?;
        let mut tx = self.store.begin().await?;
        let result = tx.create_plan(&plan).await.map_err(EstimationError::from);
        let plan = finish(tx, result.map(|_| plan), "create_plan").await?;
        info!(plan_id = %plan.id(), code = plan.code(), "Plan created");
        Ok(plan)
    }

    pub async fn get_plan(&self, id: PlanId) -> Result<Plan, EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = tx.get_plan(id).await.map_err(EstimationError::from);
        finish(tx, result, "get_plan").await
    }

    pub async fn list_plans(&self) -> Result<Vec<Plan>, EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = tx.list_plans().await.map_err(EstimationError::from);
        finish(tx, result, "list_plans").await
    }

    pub async fn update_plan(&self, id: PlanId, changes: PlanChanges) -> Result<Plan, EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = update_plan_in(tx.as_mut(), id, changes).await;
        finish(tx, result, "update_plan").await
    }

    pub async fn delete_plan(&self, id: PlanId) -> Result<(), EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = delete_plan_in(tx.as_mut(), id).await;
        finish(tx, result, "delete_plan").await?;
        info!(plan_id = %id, "Plan deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Baselines
    // ------------------------------------------------------------------

    pub async fn create_baseline(&self, input: NewBaseline) -> Result<Baseline, EstimationError> {
        let baseline = Baseline::new(input)?;
        let mut tx = self.store.begin().await?;
        let result = tx.create_baseline(&baseline).await.map_err(EstimationError::from);
        let baseline = finish(tx, result.map(|_| baseline), "create_baseline").await?;
        info!(baseline_id = %baseline.id(), code = baseline.code(), review = baseline.review(), "Baseline created");
        Ok(baseline)
    }

    pub async fn get_baseline(&self, id: BaselineId) -> Result<Baseline, EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = tx.get_baseline(id).await.map_err(EstimationError::from);
        finish(tx, result, "get_baseline").await
    }

    pub async fn list_baselines(&self) -> Result<Vec<Baseline>, EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = tx.list_baselines().await.map_err(EstimationError::from);
        finish(tx, result, "list_baselines").await
    }

    pub async fn update_baseline(&self, id: BaselineId, changes: BaselineChanges) -> Result<Baseline, EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = update_baseline_in(tx.as_mut(), id, changes).await;
        finish(tx, result, "update_baseline").await
    }

    /// Deletes a baseline with its costs and efforts
    pub async fn delete_baseline(&self, id: BaselineId) -> Result<(), EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = delete_baseline_in(tx.as_mut(), id).await;
        finish(tx, result, "delete_baseline").await?;
        info!(baseline_id = %id, "Baseline deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Costs
    // ------------------------------------------------------------------

    pub async fn create_cost(&self, input: NewCost) -> Result<Cost, EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = create_cost_in(tx.as_mut(), input).await;
        finish(tx, result, "create_cost").await
    }

    pub async fn list_costs(&self, baseline_id: BaselineId) -> Result<Vec<Cost>, EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = list_costs_in(tx.as_mut(), baseline_id).await;
        finish(tx, result, "list_costs").await
    }

    pub async fn update_cost(
        &self,
        baseline_id: BaselineId,
        cost_id: CostId,
        changes: CostChanges,
    ) -> Result<Cost, EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = update_cost_in(tx.as_mut(), baseline_id, cost_id, changes).await;
        finish(tx, result, "update_cost").await
    }

    pub async fn delete_cost(&self, baseline_id: BaselineId, cost_id: CostId) -> Result<(), EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = delete_cost_in(tx.as_mut(), baseline_id, cost_id).await;
        finish(tx, result, "delete_cost").await
    }

    // ------------------------------------------------------------------
    // Efforts
    // ------------------------------------------------------------------

    pub async fn create_effort(&self, input: NewEffort) -> Result<Effort, EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = create_effort_in(tx.as_mut(), input).await;
        finish(tx, result, "create_effort").await
    }

    pub async fn list_efforts(&self, baseline_id: BaselineId) -> Result<Vec<Effort>, EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = list_efforts_in(tx.as_mut(), baseline_id).await;
        finish(tx, result, "list_efforts").await
    }

    pub async fn update_effort(
        &self,
        baseline_id: BaselineId,
        effort_id: EffortId,
        changes: EffortChanges,
    ) -> Result<Effort, EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = update_effort_in(tx.as_mut(), baseline_id, effort_id, changes).await;
        finish(tx, result, "update_effort").await
    }

    pub async fn delete_effort(&self, baseline_id: BaselineId, effort_id: EffortId) -> Result<(), EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = delete_effort_in(tx.as_mut(), baseline_id, effort_id).await;
        finish(tx, result, "delete_effort").await
    }

    // ------------------------------------------------------------------
    // Portfolios
    // ------------------------------------------------------------------

    /// Generates and stores a portfolio with its budgets and workloads
    pub async fn create_portfolio(&self, input: CreatePortfolioInput) -> Result<PortfolioDetail, EstimationError> {
        if input.shift_months > MAX_SHIFT_MONTHS {
            return Err(EstimationError::validation(
                "portfolio",
                format!("shift months {} must be between 0 and {}", input.shift_months, MAX_SHIFT_MONTHS),
            ));
        }
        let mut tx = self.store.begin().await?;
        let result = create_portfolio_in(tx.as_mut(), input).await;
        let detail = finish(tx, result, "create_portfolio").await?;
        info!(
            portfolio_id = %detail.portfolio.id(),
            baseline_id = %input.baseline_id,
            plan_id = %input.plan_id,
            "Portfolio created"
        );
        Ok(detail)
    }

    pub async fn get_portfolio(&self, id: PortfolioId) -> Result<PortfolioDetail, EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = get_portfolio_in(tx.as_mut(), id).await;
        finish(tx, result, "get_portfolio").await
    }

    pub async fn list_portfolios(&self, plan_id: Option<PlanId>) -> Result<Vec<Portfolio>, EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = tx.list_portfolios(plan_id).await.map_err(EstimationError::from);
        finish(tx, result, "list_portfolios").await
    }

    /// Deletes a portfolio with its budgets and workloads
    pub async fn delete_portfolio(&self, id: PortfolioId) -> Result<(), EstimationError> {
        let mut tx = self.store.begin().await?;
        let result = tx.delete_portfolio(id).await.map_err(EstimationError::from);
        finish(tx, result, "delete_portfolio").await?;
        info!(portfolio_id = %id, "Portfolio deleted");
        Ok(())
    }
}

/// Commits on success, rolls back on failure
async fn finish<T>(
    tx: Box<dyn EstimationTransaction>,
    result: Result<T, EstimationError>,
    operation: &'static str,
) -> Result<T, EstimationError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            debug!(operation, "Transaction committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(operation, error = %rollback_err, "Rollback failed");
            }
            debug!(operation, error = %err, "Transaction rolled back");
            Err(err)
        }
    }
}

async fn ensure_baseline_has_no_portfolios(
    tx: &mut dyn EstimationTransaction,
    baseline_id: BaselineId,
) -> Result<(), EstimationError> {
    let count = tx.count_portfolios_by_baseline(baseline_id).await?;
    if count > 0 {
        return Err(EstimationError::conflict(format!(
            "baseline {} has {} portfolio(s)",
            baseline_id, count
        )));
    }
    Ok(())
}

async fn ensure_plan_has_no_portfolios(tx: &mut dyn EstimationTransaction, plan_id: PlanId) -> Result<(), EstimationError> {
    let count = tx.count_portfolios_by_plan(plan_id).await?;
    if count > 0 {
        return Err(EstimationError::conflict(format!("plan {} has {} portfolio(s)", plan_id, count)));
    }
    Ok(())
}

async fn update_plan_in(
    tx: &mut dyn EstimationTransaction,
    id: PlanId,
    changes: PlanChanges,
) -> Result<Plan, EstimationError> {
    let mut plan = tx.get_plan(id).await?;
    ensure_plan_has_no_portfolios(tx, id).await?;
    plan.update(changes)?;
    tx.update_plan(&plan).await?;
    Ok(plan)
}

async fn delete_plan_in(tx: &mut dyn EstimationTransaction, id: PlanId) -> Result<(), EstimationError> {
    tx.get_plan(id).await?;
    ensure_plan_has_no_portfolios(tx, id).await?;
    tx.delete_plan(id).await?;
    Ok(())
}

async fn update_baseline_in(
    tx: &mut dyn EstimationTransaction,
    id: BaselineId,
    changes: BaselineChanges,
) -> Result<Baseline, EstimationError> {
    let mut baseline = tx.get_baseline(id).await?;
    ensure_baseline_has_no_portfolios(tx, id).await?;
    baseline.update(changes)?;
    tx.update_baseline(&baseline).await?;
    Ok(baseline)
}

async fn delete_baseline_in(tx: &mut dyn EstimationTransaction, id: BaselineId) -> Result<(), EstimationError> {
    tx.get_baseline(id).await?;
    ensure_baseline_has_no_portfolios(tx, id).await?;
    tx.delete_baseline(id).await?;
    Ok(())
}

async fn create_cost_in(tx: &mut dyn EstimationTransaction, input: NewCost) -> Result<Cost, EstimationError> {
    let baseline = tx.get_baseline(input.baseline_id).await?;
    ensure_baseline_has_no_portfolios(tx, baseline.id()).await?;
    let cost = Cost::new(input)?;
    if !cost.starts_on_or_after(baseline.start_date()) {
        return Err(EstimationError::validation("cost", "cost allocation date is invalid"));
    }
    tx.create_cost(&cost).await?;
    debug!(cost_id = %cost.id(), baseline_id = %baseline.id(), "Cost created");
    Ok(cost)
}

async fn list_costs_in(tx: &mut dyn EstimationTransaction, baseline_id: BaselineId) -> Result<Vec<Cost>, EstimationError> {
    tx.get_baseline(baseline_id).await?;
    Ok(tx.get_costs_by_baseline(baseline_id).await?)
}

async fn owned_cost(
    tx: &mut dyn EstimationTransaction,
    baseline_id: BaselineId,
    cost_id: CostId,
) -> Result<Cost, EstimationError> {
    let cost = tx.get_cost(cost_id).await?;
    if cost.baseline_id() != baseline_id {
        return Err(EstimationError::not_found(format!(
            "cost baseline mismatch: cost {} does not belong to baseline {}",
            cost_id, baseline_id
        )));
    }
    Ok(cost)
}

async fn update_cost_in(
    tx: &mut dyn EstimationTransaction,
    baseline_id: BaselineId,
    cost_id: CostId,
    changes: CostChanges,
) -> Result<Cost, EstimationError> {
    let baseline = tx.get_baseline(baseline_id).await?;
    ensure_baseline_has_no_portfolios(tx, baseline_id).await?;
    let mut cost = owned_cost(tx, baseline_id, cost_id).await?;
    cost.update(changes)?;
    if !cost.starts_on_or_after(baseline.start_date()) {
        return Err(EstimationError::validation("cost", "cost allocation date is invalid"));
    }
    tx.update_cost(&cost).await?;
    Ok(cost)
}

async fn delete_cost_in(
    tx: &mut dyn EstimationTransaction,
    baseline_id: BaselineId,
    cost_id: CostId,
) -> Result<(), EstimationError> {
    tx.get_baseline(baseline_id).await?;
    ensure_baseline_has_no_portfolios(tx, baseline_id).await?;
    owned_cost(tx, baseline_id, cost_id).await?;
    tx.delete_cost(cost_id).await?;
    Ok(())
}

async fn create_effort_in(tx: &mut dyn EstimationTransaction, input: NewEffort) -> Result<Effort, EstimationError> {
    let baseline = tx.get_baseline(input.baseline_id).await?;
    ensure_baseline_has_no_portfolios(tx, baseline.id()).await?;
    let effort = Effort::new(input)?;
    if !effort.starts_on_or_after(baseline.start_date()) {
        return Err(EstimationError::validation("effort", "effort allocation date is invalid"));
    }
    tx.create_effort(&effort).await?;
    debug!(effort_id = %effort.id(), baseline_id = %baseline.id(), "Effort created");
    Ok(effort)
}

async fn list_efforts_in(
    tx: &mut dyn EstimationTransaction,
    baseline_id: BaselineId,
) -> Result<Vec<Effort>, EstimationError> {
    tx.get_baseline(baseline_id).await?;
    Ok(tx.get_efforts_by_baseline(baseline_id).await?)
}

async fn owned_effort(
    tx: &mut dyn EstimationTransaction,
    baseline_id: BaselineId,
    effort_id: EffortId,
) -> Result<Effort, EstimationError> {
    let effort = tx.get_effort(effort_id).await?;
    if effort.baseline_id() != baseline_id {
        return Err(EstimationError::not_found(format!(
            "effort baseline mismatch: effort {} does not belong to baseline {}",
            effort_id, baseline_id
        )));
    }
    Ok(effort)
}

async fn update_effort_in(
    tx: &mut dyn EstimationTransaction,
    baseline_id: BaselineId,
    effort_id: EffortId,
    changes: EffortChanges,
) -> Result<Effort, EstimationError> {
    let baseline = tx.get_baseline(baseline_id).await?;
    ensure_baseline_has_no_portfolios(tx, baseline_id).await?;
    let mut effort = owned_effort(tx, baseline_id, effort_id).await?;
    effort.update(changes)?;
    if !effort.starts_on_or_after(baseline.start_date()) {
        return Err(EstimationError::validation("effort", "effort allocation date is invalid"));
    }
    tx.update_effort(&effort).await?;
    Ok(effort)
}

async fn delete_effort_in(
    tx: &mut dyn EstimationTransaction,
    baseline_id: BaselineId,
    effort_id: EffortId,
) -> Result<(), EstimationError> {
    tx.get_baseline(baseline_id).await?;
    ensure_baseline_has_no_portfolios(tx, baseline_id).await?;
    owned_effort(tx, baseline_id, effort_id).await?;
    tx.delete_effort(effort_id).await?;
    Ok(())
}

async fn create_portfolio_in(
    tx: &mut dyn EstimationTransaction,
    input: CreatePortfolioInput,
) -> Result<PortfolioDetail, EstimationError> {
    let baseline = tx.get_baseline(input.baseline_id).await?;
    let plan = tx.get_plan(input.plan_id).await?;

    if tx.portfolio_exists(plan.id(), baseline.code()).await? {
        return Err(EstimationError::conflict(format!(
            "portfolio for plan id {} and baseline code {} already exists",
            plan.id(),
            baseline.code()
        )));
    }

    let costs = tx.get_costs_by_baseline(baseline.id()).await?;
    let efforts = tx.get_efforts_by_baseline(baseline.id()).await?;

    let generated = PortfolioService::new(
        plan.id(),
        &baseline,
        &costs,
        &efforts,
        plan.inflation(),
        plan.exchange(),
        input.shift_months,
    )
    .generate_portfolio()?;

    tx.create_portfolio(&generated.portfolio).await?;
    tx.create_budgets(&generated.budgets).await?;
    tx.create_workloads(&generated.workloads).await?;

    Ok(PortfolioDetail {
        portfolio: generated.portfolio,
        budgets: generated.budgets,
        workloads: generated.workloads,
    })
}

async fn get_portfolio_in(tx: &mut dyn EstimationTransaction, id: PortfolioId) -> Result<PortfolioDetail, EstimationError> {
    let portfolio = tx.get_portfolio(id).await?;
    let budgets = tx.get_budgets_by_portfolio(id).await?;
    let workloads = tx.get_workloads_by_portfolio(id).await?;
    Ok(PortfolioDetail {
        portfolio,
        budgets,
        workloads,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{CostAllocationInput, CostType};
    use crate::effort::EffortAllocationInput;
    use crate::plan::{Assumption, CurrencyAssumption};
    use crate::ports::mock::InMemoryEstimationStore;
    use crate::error::ErrorKind;
    use core_kernel::{CompetenceId, Currency, UserId};

    fn service() -> EstimationService {
        EstimationService::new(Arc::new(InMemoryEstimationStore::new()))
    }

    fn new_plan(code: &str) -> NewPlan {
        let table = [(2022, 3.10, 4.15, 5.36), (2023, 3.50, 4.25, 5.56), (2024, 4.00, 4.50, 5.50)];
        NewPlan {
            code: code.to_string(),
            name: "Business Plan".to_string(),
            assumptions: table
                .iter()
                .map(|&(year, inflation, usd, eur)| Assumption {
                    year,
                    inflation,
                    currencies: vec![
                        CurrencyAssumption { currency: Currency::USD, exchange: usd },
                        CurrencyAssumption { currency: Currency::EUR, exchange: eur },
                    ],
                })
                .collect(),
        }
    }

    fn new_baseline(code: &str, review: i32) -> NewBaseline {
        NewBaseline {
            code: code.to_string(),
            review,
            title: "Data platform".to_string(),
            description: String::new(),
            start_year: 2022,
            start_month: 1,
            duration: 12,
            manager_id: UserId::new(),
            estimator_id: UserId::new(),
        }
    }

    fn new_cost(baseline_id: BaselineId, year: i32, month: u32) -> NewCost {
        NewCost {
            baseline_id,
            cost_type: CostType::Running,
            description: "Cloud".to_string(),
            comment: String::new(),
            amount: 880.30,
            currency: Currency::BRL,
            tax: 0.0,
            apply_inflation: true,
            allocations: vec![CostAllocationInput { year, month, amount: 880.30 }],
        }
    }

    fn new_effort(baseline_id: BaselineId) -> NewEffort {
        NewEffort {
            baseline_id,
            competence_id: CompetenceId::new(),
            comment: String::new(),
            hours: 160,
            allocations: vec![EffortAllocationInput { year: 2022, month: 2, hours: 160 }],
        }
    }

    fn portfolio_input(baseline: &Baseline, plan: &Plan, shift_months: u32) -> CreatePortfolioInput {
        CreatePortfolioInput {
            baseline_id: baseline.id(),
            plan_id: plan.id(),
            shift_months,
        }
    }

    #[tokio::test]
    async fn test_create_portfolio_stores_projection() {
        let service = service();
        let plan = service.create_plan(new_plan("BP")).await.unwrap();
        let baseline = service.create_baseline(new_baseline("PRJ", 1)).await.unwrap();
        service.create_cost(new_cost(baseline.id(), 2022, 8)).await.unwrap();
        service.create_effort(new_effort(baseline.id())).await.unwrap();

        let created = service.create_portfolio(portfolio_input(&baseline, &plan, 8)).await.unwrap();
        let loaded = service.get_portfolio(created.portfolio.id()).await.unwrap();

        assert_eq!(loaded.portfolio, created.portfolio);
        assert_eq!(loaded.budgets.len(), 1);
        assert_eq!(loaded.budgets[0].amount(), 911.11);
        assert_eq!(loaded.workloads.len(), 1);
        assert_eq!(service.list_portfolios(Some(plan.id())).await.unwrap().len(), 1);
        assert!(service.list_portfolios(Some(PlanId::new())).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_shift_above_limit_is_rejected() {
        let service = service();
        let plan = service.create_plan(new_plan("BP")).await.unwrap();
        let baseline = service.create_baseline(new_baseline("PRJ", 1)).await.unwrap();

        let err = service
            .create_portfolio(portfolio_input(&baseline, &plan, MAX_SHIFT_MONTHS + 1))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_duplicate_portfolio_conflicts_across_reviews() {
        let service = service();
        let plan = service.create_plan(new_plan("BP")).await.unwrap();
        let first = service.create_baseline(new_baseline("PRJ", 1)).await.unwrap();
        let second = service.create_baseline(new_baseline("PRJ", 2)).await.unwrap();
        service.create_portfolio(portfolio_input(&first, &plan, 0)).await.unwrap();

        let err = service.create_portfolio(portfolio_input(&second, &plan, 0)).await.unwrap_err();

        assert!(err.is_conflict());
        assert!(err.to_string().contains("baseline code PRJ already exists"));
    }

    #[tokio::test]
    async fn test_failed_generation_stores_nothing() {
        let service = service();
        let plan = service.create_plan(new_plan("BP")).await.unwrap();
        let baseline = service.create_baseline(new_baseline("PRJ", 1)).await.unwrap();
        service.create_cost(new_cost(baseline.id(), 2024, 6)).await.unwrap();

        let err = service.create_portfolio(portfolio_input(&baseline, &plan, 12)).await.unwrap_err();

        assert!(matches!(err, EstimationError::MissingEndInflation { year: 2025 }));
        assert!(service.list_portfolios(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_references_are_not_found() {
        let service = service();
        let plan = service.create_plan(new_plan("BP")).await.unwrap();

        let err = service
            .create_portfolio(CreatePortfolioInput {
                baseline_id: BaselineId::new(),
                plan_id: plan.id(),
                shift_months: 0,
            })
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_baseline_with_portfolio_is_frozen() {
        let service = service();
        let plan = service.create_plan(new_plan("BP")).await.unwrap();
        let baseline = service.create_baseline(new_baseline("PRJ", 1)).await.unwrap();
        let cost = service.create_cost(new_cost(baseline.id(), 2022, 3)).await.unwrap();
        service.create_portfolio(portfolio_input(&baseline, &plan, 0)).await.unwrap();

        let err = service.delete_baseline(baseline.id()).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(err.to_string(), format!("baseline {} has 1 portfolio(s)", baseline.id()));

        let err = service
            .update_cost(baseline.id(), cost.id(), CostChanges::default())
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let err = service.create_effort(new_effort(baseline.id())).await.unwrap_err();
        assert!(err.is_conflict());

        let err = service.delete_plan(plan.id()).await.unwrap_err();
        assert_eq!(err.to_string(), format!("plan {} has 1 portfolio(s)", plan.id()));
    }

    #[tokio::test]
    async fn test_deleting_portfolio_unfreezes_baseline() {
        let service = service();
        let plan = service.create_plan(new_plan("BP")).await.unwrap();
        let baseline = service.create_baseline(new_baseline("PRJ", 1)).await.unwrap();
        let created = service.create_portfolio(portfolio_input(&baseline, &plan, 0)).await.unwrap();

        service.delete_portfolio(created.portfolio.id()).await.unwrap();

        assert!(service.get_portfolio(created.portfolio.id()).await.unwrap_err().is_not_found());
        service.delete_baseline(baseline.id()).await.unwrap();
        service.delete_plan(plan.id()).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_baseline_cascades_estimates() {
        let service = service();
        let baseline = service.create_baseline(new_baseline("PRJ", 1)).await.unwrap();
        let cost = service.create_cost(new_cost(baseline.id(), 2022, 3)).await.unwrap();

        service.delete_baseline(baseline.id()).await.unwrap();

        let mut tx = service.store().begin().await.unwrap();
        assert!(tx.get_cost(cost.id()).await.unwrap_err().is_not_found());
        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_allocation_before_baseline_start_is_rejected() {
        let service = service();
        let mut input = new_baseline("PRJ", 1);
        input.start_month = 6;
        let baseline = service.create_baseline(input).await.unwrap();

        let err = service.create_cost(new_cost(baseline.id(), 2022, 5)).await.unwrap_err();

        assert_eq!(err.to_string(), "cost domain validation failed: cost allocation date is invalid");
        assert!(service.list_costs(baseline.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cost_of_other_baseline_is_not_found() {
        let service = service();
        let owner = service.create_baseline(new_baseline("PRJ", 1)).await.unwrap();
        let other = service.create_baseline(new_baseline("OTHER", 1)).await.unwrap();
        let cost = service.create_cost(new_cost(owner.id(), 2022, 3)).await.unwrap();

        let err = service.delete_cost(other.id(), cost.id()).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().starts_with("cost baseline mismatch"));
        assert_eq!(service.list_costs(owner.id()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_effort_replaces_allocations() {
        let service = service();
        let baseline = service.create_baseline(new_baseline("PRJ", 1)).await.unwrap();
        let effort = service.create_effort(new_effort(baseline.id())).await.unwrap();

        let updated = service
            .update_effort(
                baseline.id(),
                effort.id(),
                EffortChanges {
                    hours: Some(200),
                    allocations: Some(vec![
                        EffortAllocationInput { year: 2022, month: 2, hours: 120 },
                        EffortAllocationInput { year: 2022, month: 3, hours: 80 },
                    ]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.hours(), 200);
        assert_eq!(service.list_efforts(baseline.id()).await.unwrap()[0].allocations().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_codes_conflict() {
        let service = service();
        service.create_plan(new_plan("BP")).await.unwrap();
        service.create_baseline(new_baseline("PRJ", 1)).await.unwrap();

        assert!(service.create_plan(new_plan("BP")).await.unwrap_err().is_conflict());
        assert!(service.create_baseline(new_baseline("PRJ", 1)).await.unwrap_err().is_conflict());
        assert_eq!(service.list_baselines().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_update_is_rolled_back() {
        let service = service();
        let plan = service.create_plan(new_plan("BP")).await.unwrap();

        let err = service
            .update_plan(
                plan.id(),
                PlanChanges {
                    name: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(service.get_plan(plan.id()).await.unwrap().name(), "Business Plan");
    }
}
