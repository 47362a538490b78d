//! HTTP API tests over the in-memory store

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

use domain_estimation::{EstimationService, InMemoryEstimationStore};
use interface_api::{config::ApiConfig, create_router};
use test_utils::{BaselineFixtures, PlanFixtures};

fn server() -> TestServer {
    let store = Arc::new(InMemoryEstimationStore::new());
    let app = create_router(EstimationService::new(store), ApiConfig::default());
    TestServer::new(app).unwrap()
}

async fn create_plan(server: &TestServer) -> String {
    let response = server
        .post("/api/v1/plans")
        .json(&serde_json::to_value(PlanFixtures::bp_2026()).unwrap())
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

async fn create_baseline(server: &TestServer) -> String {
    let response = server
        .post("/api/v1/baselines")
        .json(&serde_json::to_value(BaselineFixtures::data_platform()).unwrap())
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

fn brl_cost_body() -> Value {
    json!({
        "cost_type": "one_time",
        "description": "Licenses",
        "amount": 880.30,
        "currency": "BRL",
        "tax": 0.0,
        "apply_inflation": true,
        "allocations": [
            {"year": 2022, "month": 1, "amount": 610.15},
            {"year": 2022, "month": 8, "amount": 270.15}
        ]
    })
}

fn effort_body() -> Value {
    json!({
        "competence_id": Uuid::new_v4(),
        "comment": "Backend squad",
        "hours": 300,
        "allocations": [
            {"year": 2022, "month": 11, "hours": 100},
            {"year": 2022, "month": 12, "hours": 200}
        ]
    })
}

// ============================================================================
// Health
// ============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let response = server().get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_reports_store() {
        let response = server().get("/health/ready").await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["status"], "ready");
        assert_eq!(body["store"]["status"], "healthy");
    }
}

// ============================================================================
// Plans
// ============================================================================

mod plan_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_plan() {
        let server = server();
        let id = create_plan(&server).await;

        let response = server.get(&format!("/api/v1/plans/{}", id)).await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["code"], "BP 2026");
        assert_eq!(body["assumptions"].as_array().unwrap().len(), 6);
        assert_eq!(body["assumptions"][0]["currencies"][0]["currency"], "USD");
    }

    #[tokio::test]
    async fn test_duplicate_plan_code_conflicts() {
        let server = server();
        create_plan(&server).await;

        let response = server
            .post("/api/v1/plans")
            .json(&serde_json::to_value(PlanFixtures::bp_2026()).unwrap())
            .await;

        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<Value>()["error"], "conflict");
    }

    #[tokio::test]
    async fn test_gap_in_years_is_unprocessable() {
        let mut plan = PlanFixtures::bp_2026();
        plan.assumptions.remove(2);

        let response = server()
            .post("/api/v1/plans")
            .json(&serde_json::to_value(plan).unwrap())
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.json::<Value>();
        assert_eq!(body["error"], "validation_error");
        assert!(body["message"].as_str().unwrap().contains("consecutive years"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let response = server()
            .post("/api/v1/plans")
            .text("{\"code\": ")
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let response = server().get("/api/v1/plans/not-a-uuid").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_plan_is_not_found() {
        let response = server().get(&format!("/api/v1/plans/{}", Uuid::new_v4())).await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "not_found");
    }

    #[tokio::test]
    async fn test_update_and_delete_plan() {
        let server = server();
        let id = create_plan(&server).await;

        let response = server
            .patch(&format!("/api/v1/plans/{}", id))
            .json(&json!({"name": "Revised plan"}))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["name"], "Revised plan");

        server
            .delete(&format!("/api/v1/plans/{}", id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/api/v1/plans/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

// ============================================================================
// Baselines, costs and efforts
// ============================================================================

mod baseline_tests {
    use super::*;

    #[tokio::test]
    async fn test_baseline_start_date_is_first_of_month() {
        let server = server();
        let id = create_baseline(&server).await;

        let response = server.get(&format!("/api/v1/baselines/{}", id)).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["start_date"], "2022-01-01");
    }

    #[tokio::test]
    async fn test_baseline_duration_is_bounded() {
        let mut baseline = BaselineFixtures::data_platform();
        baseline.duration = 61;

        let response = server()
            .post("/api/v1/baselines")
            .json(&serde_json::to_value(baseline).unwrap())
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.json::<Value>()["details"].is_array());
    }

    #[tokio::test]
    async fn test_create_and_list_costs() {
        let server = server();
        let baseline_id = create_baseline(&server).await;

        server
            .post(&format!("/api/v1/baselines/{}/costs", baseline_id))
            .json(&brl_cost_body())
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get(&format!("/api/v1/baselines/{}/costs", baseline_id)).await;
        response.assert_status_ok();
        let costs = response.json::<Value>();
        assert_eq!(costs.as_array().unwrap().len(), 1);
        assert_eq!(costs[0]["cost_type"], "one_time");
        assert_eq!(costs[0]["allocations"][1]["month"], 8);
    }

    #[tokio::test]
    async fn test_cost_amount_with_three_decimals_is_unprocessable() {
        let server = server();
        let baseline_id = create_baseline(&server).await;
        let mut body = brl_cost_body();
        body["amount"] = json!(880.305);

        let response = server
            .post(&format!("/api/v1/baselines/{}/costs", baseline_id))
            .json(&body)
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_cost_total_mismatch_is_unprocessable() {
        let server = server();
        let baseline_id = create_baseline(&server).await;
        let mut body = brl_cost_body();
        body["amount"] = json!(880.31);

        let response = server
            .post(&format!("/api/v1/baselines/{}/costs", baseline_id))
            .json(&body)
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.json::<Value>()["message"],
            "cost domain validation failed: cost allocation total 880.30 is not equal to cost amount 880.31"
        );
    }

    #[tokio::test]
    async fn test_cost_for_unknown_baseline_is_not_found() {
        let response = server()
            .post(&format!("/api/v1/baselines/{}/costs", Uuid::new_v4()))
            .json(&brl_cost_body())
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_effort_hours_are_capped() {
        let server = server();
        let baseline_id = create_baseline(&server).await;
        let mut body = effort_body();
        body["hours"] = json!(160_001);

        let response = server
            .post(&format!("/api/v1/baselines/{}/efforts", baseline_id))
            .json(&body)
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_update_and_delete_effort() {
        let server = server();
        let baseline_id = create_baseline(&server).await;
        let created = server
            .post(&format!("/api/v1/baselines/{}/efforts", baseline_id))
            .json(&effort_body())
            .await;
        created.assert_status(StatusCode::CREATED);
        let effort_id = created.json::<Value>()["id"].as_str().unwrap().to_string();
        let path = format!("/api/v1/baselines/{}/efforts/{}", baseline_id, effort_id);

        let response = server
            .patch(&path)
            .json(&json!({
                "hours": 400,
                "allocations": [{"year": 2022, "month": 11, "hours": 400}]
            }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["hours"], 400);

        server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
        let remaining = server
            .get(&format!("/api/v1/baselines/{}/efforts", baseline_id))
            .await
            .json::<Value>();
        assert!(remaining.as_array().unwrap().is_empty());
    }
}

// ============================================================================
// Portfolios
// ============================================================================

mod portfolio_tests {
    use super::*;

    async fn seeded() -> (TestServer, String, String) {
        let server = server();
        let plan_id = create_plan(&server).await;
        let baseline_id = create_baseline(&server).await;
        server
            .post(&format!("/api/v1/baselines/{}/costs", baseline_id))
            .json(&brl_cost_body())
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post(&format!("/api/v1/baselines/{}/efforts", baseline_id))
            .json(&effort_body())
            .await
            .assert_status(StatusCode::CREATED);
        (server, plan_id, baseline_id)
    }

    #[tokio::test]
    async fn test_generated_portfolio_detail() {
        let (server, plan_id, baseline_id) = seeded().await;

        let response = server
            .post("/api/v1/portfolios")
            .json(&json!({"baseline_id": baseline_id, "plan_id": plan_id, "shift_months": 8}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["start_date"], "2022-09-01");
        assert_eq!(body["budgets"][0]["amount"], 889.76);
        assert_eq!(body["budgets"][0]["allocations"][0]["date"], "2022-09-01");
        assert_eq!(body["budgets"][0]["allocations"][1]["amount"], 279.61);
        assert_eq!(body["budgets"][0]["yearly_totals"]["2022"], 610.15);
        assert_eq!(body["budgets"][0]["yearly_totals"]["2023"], 279.61);
        assert_eq!(body["workloads"][0]["hours"], 300);
        assert_eq!(body["workloads"][0]["yearly_hours"]["2023"], 300);
    }

    #[tokio::test]
    async fn test_shift_above_limit_is_unprocessable() {
        let (server, plan_id, baseline_id) = seeded().await;

        let response = server
            .post("/api/v1/portfolios")
            .json(&json!({"baseline_id": baseline_id, "plan_id": plan_id, "shift_months": 37}))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_second_portfolio_conflicts() {
        let (server, plan_id, baseline_id) = seeded().await;
        let body = json!({"baseline_id": baseline_id, "plan_id": plan_id, "shift_months": 0});

        server.post("/api/v1/portfolios").json(&body).await.assert_status(StatusCode::CREATED);
        let response = server.post("/api/v1/portfolios").json(&body).await;

        response.assert_status(StatusCode::CONFLICT);
        assert!(response.json::<Value>()["message"]
            .as_str()
            .unwrap()
            .contains("already exists"));
    }

    #[tokio::test]
    async fn test_frozen_baseline_rejects_changes() {
        let (server, plan_id, baseline_id) = seeded().await;
        server
            .post("/api/v1/portfolios")
            .json(&json!({"baseline_id": baseline_id, "plan_id": plan_id}))
            .await
            .assert_status(StatusCode::CREATED);

        server
            .patch(&format!("/api/v1/baselines/{}", baseline_id))
            .json(&json!({"title": "Renamed"}))
            .await
            .assert_status(StatusCode::CONFLICT);
        server
            .post(&format!("/api/v1/baselines/{}/costs", baseline_id))
            .json(&brl_cost_body())
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_list_filter_and_delete() {
        let (server, plan_id, baseline_id) = seeded().await;
        let created = server
            .post("/api/v1/portfolios")
            .json(&json!({"baseline_id": baseline_id, "plan_id": plan_id, "shift_months": 8}))
            .await
            .json::<Value>();
        let portfolio_id = created["id"].as_str().unwrap().to_string();

        let listed = server
            .get("/api/v1/portfolios")
            .add_query_param("plan_id", &plan_id)
            .await
            .json::<Value>();
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let other = server
            .get("/api/v1/portfolios")
            .add_query_param("plan_id", Uuid::new_v4())
            .await
            .json::<Value>();
        assert!(other.as_array().unwrap().is_empty());

        server
            .get("/api/v1/portfolios")
            .add_query_param("plan_id", "nope")
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .delete(&format!("/api/v1/portfolios/{}", portfolio_id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/api/v1/portfolios/{}", portfolio_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
