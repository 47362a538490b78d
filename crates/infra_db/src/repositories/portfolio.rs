//! Portfolio repository
//!
//! Portfolios together with the budgets and workloads generated for them.
//! Deleting a portfolio removes its budgets and workloads through the
//! foreign keys.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use core_kernel::{from_decimal, to_decimal, BaselineId, BudgetId, CostId, EffortId, PlanId, PortfolioId, WorkloadId};
use domain_estimation::{
    Budget, BudgetAllocation, BudgetRecord, Portfolio, PortfolioRecord, Workload, WorkloadAllocation,
    WorkloadRecord,
};

use super::invalid_row;
use crate::error::DatabaseError;

/// Database row for the `portfolios` table
#[derive(Debug, Clone, FromRow)]
pub struct PortfolioRow {
    pub id: Uuid,
    pub baseline_id: Uuid,
    pub plan_id: Uuid,
    pub start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PortfolioRow {
    pub fn into_portfolio(self) -> Result<Portfolio, DatabaseError> {
        Portfolio::restore(PortfolioRecord {
            id: PortfolioId::from_uuid(self.id),
            baseline_id: BaselineId::from_uuid(self.baseline_id),
            plan_id: PlanId::from_uuid(self.plan_id),
            start_date: self.start_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
        .map_err(|e| invalid_row("portfolio", e))
    }
}

/// Database row for the `budgets` table
#[derive(Debug, Clone, FromRow)]
pub struct BudgetRow {
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub cost_id: Uuid,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Database row for the `budget_allocations` table
#[derive(Debug, Clone, FromRow)]
pub struct BudgetAllocationRow {
    pub budget_id: Uuid,
    pub allocation_date: NaiveDate,
    pub amount: Decimal,
}

/// Database row for the `workloads` table
#[derive(Debug, Clone, FromRow)]
pub struct WorkloadRow {
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub effort_id: Uuid,
    pub hours: i32,
    pub created_at: DateTime<Utc>,
}

/// Database row for the `workload_allocations` table
#[derive(Debug, Clone, FromRow)]
pub struct WorkloadAllocationRow {
    pub workload_id: Uuid,
    pub allocation_date: NaiveDate,
    pub hours: i32,
}

const SELECT_PORTFOLIO: &str = r#"
    SELECT id, baseline_id, plan_id, start_date, created_at, updated_at
    FROM portfolios
"#;

pub async fn insert(conn: &mut PgConnection, portfolio: &Portfolio) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO portfolios (id, baseline_id, plan_id, start_date, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(*portfolio.id().as_uuid())
    .bind(*portfolio.baseline_id().as_uuid())
    .bind(*portfolio.plan_id().as_uuid())
    .bind(portfolio.start_date())
    .bind(portfolio.created_at())
    .bind(portfolio.updated_at())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn find(conn: &mut PgConnection, id: PortfolioId) -> Result<Portfolio, DatabaseError> {
    let row: Option<PortfolioRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_PORTFOLIO))
        .bind(*id.as_uuid())
        .fetch_optional(&mut *conn)
        .await?;
    row.ok_or_else(|| DatabaseError::not_found("Portfolio", id))?
        .into_portfolio()
}

pub async fn list(conn: &mut PgConnection, plan_id: Option<PlanId>) -> Result<Vec<Portfolio>, DatabaseError> {
    let rows: Vec<PortfolioRow> = sqlx::query_as(&format!(
        "{} WHERE $1::uuid IS NULL OR plan_id = $1 ORDER BY created_at, id",
        SELECT_PORTFOLIO
    ))
    .bind(plan_id.map(|id| *id.as_uuid()))
    .fetch_all(&mut *conn)
    .await?;
    rows.into_iter().map(PortfolioRow::into_portfolio).collect()
}

pub async fn delete(conn: &mut PgConnection, id: PortfolioId) -> Result<(), DatabaseError> {
    let result = sqlx::query("DELETE FROM portfolios WHERE id = $1")
        .bind(*id.as_uuid())
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Portfolio", id));
    }
    Ok(())
}

/// Whether any revision of `baseline_code` already has a portfolio under the plan
pub async fn exists_for_plan_and_code(
    conn: &mut PgConnection,
    plan_id: PlanId,
    baseline_code: &str,
) -> Result<bool, DatabaseError> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM portfolios p
            JOIN baselines b ON b.id = p.baseline_id
            WHERE p.plan_id = $1 AND b.code = $2
        )
        "#,
    )
    .bind(*plan_id.as_uuid())
    .bind(baseline_code)
    .fetch_one(&mut *conn)
    .await?;
    Ok(exists)
}

pub async fn count_by_baseline(conn: &mut PgConnection, baseline_id: BaselineId) -> Result<i64, DatabaseError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM portfolios WHERE baseline_id = $1")
        .bind(*baseline_id.as_uuid())
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

pub async fn count_by_plan(conn: &mut PgConnection, plan_id: PlanId) -> Result<i64, DatabaseError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM portfolios WHERE plan_id = $1")
        .bind(*plan_id.as_uuid())
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

// ============================================================================
// Budgets
// ============================================================================

pub async fn insert_budgets(conn: &mut PgConnection, budgets: &[Budget]) -> Result<(), DatabaseError> {
    for budget in budgets {
        sqlx::query(
            r#"
            INSERT INTO budgets (id, portfolio_id, cost_id, amount, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(*budget.id().as_uuid())
        .bind(*budget.portfolio_id().as_uuid())
        .bind(*budget.cost_id().as_uuid())
        .bind(to_decimal(budget.amount())?)
        .bind(budget.created_at())
        .execute(&mut *conn)
        .await?;

        for allocation in budget.allocations() {
            sqlx::query("INSERT INTO budget_allocations (budget_id, allocation_date, amount) VALUES ($1, $2, $3)")
                .bind(*budget.id().as_uuid())
                .bind(allocation.date())
                .bind(to_decimal(allocation.amount())?)
                .execute(&mut *conn)
                .await?;
        }
    }
    Ok(())
}

pub async fn find_budgets(conn: &mut PgConnection, portfolio_id: PortfolioId) -> Result<Vec<Budget>, DatabaseError> {
    let rows: Vec<BudgetRow> = sqlx::query_as(
        r#"
        SELECT id, portfolio_id, cost_id, amount, created_at
        FROM budgets
        WHERE portfolio_id = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(*portfolio_id.as_uuid())
    .fetch_all(&mut *conn)
    .await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let allocation_rows: Vec<BudgetAllocationRow> = sqlx::query_as(
        r#"
        SELECT budget_id, allocation_date, amount
        FROM budget_allocations
        WHERE budget_id = ANY($1)
        ORDER BY budget_id, allocation_date, id
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut allocations: HashMap<Uuid, Vec<BudgetAllocation>> = HashMap::new();
    for row in allocation_rows {
        allocations
            .entry(row.budget_id)
            .or_default()
            .push(BudgetAllocation::new(row.allocation_date, from_decimal(row.amount)));
    }

    rows.into_iter()
        .map(|row| {
            Budget::restore(BudgetRecord {
                id: BudgetId::from_uuid(row.id),
                portfolio_id: PortfolioId::from_uuid(row.portfolio_id),
                cost_id: CostId::from_uuid(row.cost_id),
                amount: from_decimal(row.amount),
                allocations: allocations.remove(&row.id).unwrap_or_default(),
                created_at: row.created_at,
            })
            .map_err(|e| invalid_row("budget", e))
        })
        .collect()
}

// ============================================================================
// Workloads
// ============================================================================

pub async fn insert_workloads(conn: &mut PgConnection, workloads: &[Workload]) -> Result<(), DatabaseError> {
    for workload in workloads {
        sqlx::query(
            r#"
            INSERT INTO workloads (id, portfolio_id, effort_id, hours, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(*workload.id().as_uuid())
        .bind(*workload.portfolio_id().as_uuid())
        .bind(*workload.effort_id().as_uuid())
        .bind(workload.hours())
        .bind(workload.created_at())
        .execute(&mut *conn)
        .await?;

        for allocation in workload.allocations() {
            sqlx::query("INSERT INTO workload_allocations (workload_id, allocation_date, hours) VALUES ($1, $2, $3)")
                .bind(*workload.id().as_uuid())
                .bind(allocation.date())
                .bind(allocation.hours())
                .execute(&mut *conn)
                .await?;
        }
    }
    Ok(())
}

pub async fn find_workloads(conn: &mut PgConnection, portfolio_id: PortfolioId) -> Result<Vec<Workload>, DatabaseError> {
    let rows: Vec<WorkloadRow> = sqlx::query_as(
        r#"
        SELECT id, portfolio_id, effort_id, hours, created_at
        FROM workloads
        WHERE portfolio_id = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(*portfolio_id.as_uuid())
    .fetch_all(&mut *conn)
    .await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let allocation_rows: Vec<WorkloadAllocationRow> = sqlx::query_as(
        r#"
        SELECT workload_id, allocation_date, hours
        FROM workload_allocations
        WHERE workload_id = ANY($1)
        ORDER BY workload_id, allocation_date, id
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut allocations: HashMap<Uuid, Vec<WorkloadAllocation>> = HashMap::new();
    for row in allocation_rows {
        allocations
            .entry(row.workload_id)
            .or_default()
            .push(WorkloadAllocation::new(row.allocation_date, row.hours));
    }

    rows.into_iter()
        .map(|row| {
            Workload::restore(WorkloadRecord {
                id: WorkloadId::from_uuid(row.id),
                portfolio_id: PortfolioId::from_uuid(row.portfolio_id),
                effort_id: EffortId::from_uuid(row.effort_id),
                hours: row.hours,
                allocations: allocations.remove(&row.id).unwrap_or_default(),
                created_at: row.created_at,
            })
            .map_err(|e| invalid_row("workload", e))
        })
        .collect()
}
