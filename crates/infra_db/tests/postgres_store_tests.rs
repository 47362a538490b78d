//! PostgreSQL store tests
//!
//! Run against a disposable container with `cargo test -- --ignored`.

use std::sync::Arc;

use domain_estimation::{
    CostChanges, CreatePortfolioInput, ErrorKind, EstimationService, EstimationStore,
};
use infra_db::PostgresEstimationStore;
use test_utils::{
    assert_budget_allocations, assert_error_kind, count_rows, db_test, BaselineFixtures,
    CostFixtures, EffortFixtures, NewBaselineBuilder, PlanFixtures,
};

fn service(store: PostgresEstimationStore) -> EstimationService {
    EstimationService::new(Arc::new(store) as Arc<dyn EstimationStore>)
}

// ============================================================================
// Plans and baselines
// ============================================================================

mod plan_and_baseline_tests {
    use super::*;

    db_test!(test_plan_round_trips_assumptions, |db, store| {
        let service = service(store);
        let plan = service.create_plan(PlanFixtures::bp_2026()).await.unwrap();

        let loaded = service.get_plan(plan.id()).await.unwrap();

        assert_eq!(loaded.code(), "BP 2026");
        assert_eq!(loaded.assumptions(), plan.assumptions());
        assert_eq!(count_rows(db.pool(), "plans").await, 1);
    });

    db_test!(test_duplicate_plan_code_is_conflict, |db, store| {
        let service = service(store);
        service.create_plan(PlanFixtures::bp_2026()).await.unwrap();

        let result = service.create_plan(PlanFixtures::bp_2026()).await;

        assert_error_kind(result, ErrorKind::Conflict);
        assert_eq!(count_rows(db.pool(), "plans").await, 1);
    });

    db_test!(test_duplicate_baseline_review_is_conflict, |db, store| {
        let service = service(store);
        service.create_baseline(BaselineFixtures::data_platform()).await.unwrap();

        let result = service.create_baseline(BaselineFixtures::data_platform()).await;
        assert_error_kind(result, ErrorKind::Conflict);

        let next_review = NewBaselineBuilder::new()
            .with_code("DATA-PLAT")
            .with_review(2)
            .build();
        service.create_baseline(next_review).await.unwrap();
        assert_eq!(count_rows(db.pool(), "baselines").await, 2);
    });

    db_test!(test_baseline_delete_cascades, |db, store| {
        let service = service(store);
        let baseline = service.create_baseline(BaselineFixtures::data_platform()).await.unwrap();
        service.create_cost(CostFixtures::brl_with_inflation(baseline.id())).await.unwrap();
        service.create_effort(EffortFixtures::backend(baseline.id())).await.unwrap();

        service.delete_baseline(baseline.id()).await.unwrap();

        assert_eq!(count_rows(db.pool(), "costs").await, 0);
        assert_eq!(count_rows(db.pool(), "cost_allocations").await, 0);
        assert_eq!(count_rows(db.pool(), "efforts").await, 0);
        assert_eq!(count_rows(db.pool(), "effort_allocations").await, 0);
    });
}

// ============================================================================
// Costs
// ============================================================================

mod cost_tests {
    use super::*;

    db_test!(test_cost_allocations_come_back_sorted, |_db, store| {
        let service = service(store);
        let baseline = service.create_baseline(BaselineFixtures::data_platform()).await.unwrap();
        let created = service.create_cost(CostFixtures::eur_with_tax(baseline.id())).await.unwrap();

        let costs = service.list_costs(baseline.id()).await.unwrap();

        assert_eq!(costs.len(), 1);
        assert_eq!(costs[0].id(), created.id());
        assert_eq!(costs[0].amount(), 220.20);
        assert_eq!(costs[0].tax(), 23.0);
        let months: Vec<u32> = costs[0].allocations().iter().map(|a| a.month()).collect();
        assert_eq!(months, vec![2, 12]);
    });

    db_test!(test_cost_update_replaces_allocations, |db, store| {
        let service = service(store);
        let baseline = service.create_baseline(BaselineFixtures::data_platform()).await.unwrap();
        let cost = service.create_cost(CostFixtures::brl_with_inflation(baseline.id())).await.unwrap();

        let changes = CostChanges {
            amount: Some(880.30),
            allocations: Some(vec![domain_estimation::CostAllocationInput {
                year: 2022,
                month: 3,
                amount: 880.30,
            }]),
            ..CostChanges::default()
        };
        let updated = service.update_cost(baseline.id(), cost.id(), changes).await.unwrap();

        assert_eq!(updated.allocations().len(), 1);
        assert_eq!(count_rows(db.pool(), "cost_allocations").await, 1);
    });
}

// ============================================================================
// Portfolios
// ============================================================================

mod portfolio_tests {
    use super::*;

    db_test!(test_portfolio_round_trip, |db, store| {
        let service = service(store);
        let plan = service.create_plan(PlanFixtures::bp_2026()).await.unwrap();
        let baseline = service.create_baseline(BaselineFixtures::data_platform()).await.unwrap();
        service.create_cost(CostFixtures::brl_with_inflation(baseline.id())).await.unwrap();
        service.create_effort(EffortFixtures::backend(baseline.id())).await.unwrap();

        let created = service
            .create_portfolio(CreatePortfolioInput {
                baseline_id: baseline.id(),
                plan_id: plan.id(),
                shift_months: 8,
            })
            .await
            .unwrap();

        let detail = service.get_portfolio(created.portfolio.id()).await.unwrap();
        assert_eq!(detail.budgets.len(), 1);
        assert_eq!(detail.budgets[0].amount(), 889.76);
        assert_budget_allocations(&detail.budgets[0], &[(2022, 9, 610.15), (2023, 4, 279.61)]);
        assert_eq!(detail.workloads.len(), 1);
        assert_eq!(detail.workloads[0].hours(), 300);
        assert_eq!(count_rows(db.pool(), "budget_allocations").await, 2);
    });

    db_test!(test_second_portfolio_for_code_and_plan_is_conflict, |db, store| {
        let service = service(store);
        let plan = service.create_plan(PlanFixtures::bp_2026()).await.unwrap();
        let first = service.create_baseline(BaselineFixtures::data_platform()).await.unwrap();
        let second = service
            .create_baseline(NewBaselineBuilder::new().with_code("DATA-PLAT").with_review(2).build())
            .await
            .unwrap();

        service
            .create_portfolio(CreatePortfolioInput { baseline_id: first.id(), plan_id: plan.id(), shift_months: 0 })
            .await
            .unwrap();
        let result = service
            .create_portfolio(CreatePortfolioInput { baseline_id: second.id(), plan_id: plan.id(), shift_months: 0 })
            .await;

        assert_error_kind(result, ErrorKind::Conflict);
        assert_eq!(count_rows(db.pool(), "portfolios").await, 1);
    });

    db_test!(test_delete_portfolio_removes_generated_rows, |db, store| {
        let service = service(store);
        let plan = service.create_plan(PlanFixtures::bp_2026()).await.unwrap();
        let baseline = service.create_baseline(BaselineFixtures::data_platform()).await.unwrap();
        service.create_cost(CostFixtures::eur_with_tax(baseline.id())).await.unwrap();
        let detail = service
            .create_portfolio(CreatePortfolioInput { baseline_id: baseline.id(), plan_id: plan.id(), shift_months: 8 })
            .await
            .unwrap();

        service.delete_portfolio(detail.portfolio.id()).await.unwrap();

        assert_eq!(count_rows(db.pool(), "budgets").await, 0);
        assert_eq!(count_rows(db.pool(), "budget_allocations").await, 0);
        service.delete_baseline(baseline.id()).await.unwrap();
    });

    db_test!(test_frozen_plan_cannot_be_deleted, |_db, store| {
        let service = service(store);
        let plan = service.create_plan(PlanFixtures::bp_2026()).await.unwrap();
        let baseline = service.create_baseline(BaselineFixtures::data_platform()).await.unwrap();
        service
            .create_portfolio(CreatePortfolioInput { baseline_id: baseline.id(), plan_id: plan.id(), shift_months: 0 })
            .await
            .unwrap();

        assert_error_kind(service.delete_plan(plan.id()).await, ErrorKind::Conflict);
        assert_error_kind(service.delete_baseline(baseline.id()).await, ErrorKind::Conflict);
    });
}
