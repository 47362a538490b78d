//! Plan repository
//!
//! Assumptions are stored as a JSONB array on the plan row.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use core_kernel::PlanId;
use domain_estimation::{Assumption, Plan, PlanRecord};

use super::invalid_row;
use crate::error::DatabaseError;

/// Database row for the `plans` table
#[derive(Debug, Clone, FromRow)]
pub struct PlanRow {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub assumptions: Json<Vec<Assumption>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PlanRow {
    pub fn into_plan(self) -> Result<Plan, DatabaseError> {
        Plan::restore(PlanRecord {
            id: PlanId::from_uuid(self.id),
            code: self.code,
            name: self.name,
            assumptions: self.assumptions.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
        .map_err(|e| invalid_row("plan", e))
    }
}

const SELECT_PLAN: &str = r#"
    SELECT id, code, name, assumptions, created_at, updated_at
    FROM plans
"#;

pub async fn insert(conn: &mut PgConnection, plan: &Plan) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO plans (id, code, name, assumptions, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(*plan.id().as_uuid())
    .bind(plan.code())
    .bind(plan.name())
    .bind(Json(plan.assumptions()))
    .bind(plan.created_at())
    .bind(plan.updated_at())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn find(conn: &mut PgConnection, id: PlanId) -> Result<Plan, DatabaseError> {
    let row: Option<PlanRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_PLAN))
        .bind(*id.as_uuid())
        .fetch_optional(&mut *conn)
        .await?;
    row.ok_or_else(|| DatabaseError::not_found("Plan", id))?.into_plan()
}

pub async fn list(conn: &mut PgConnection) -> Result<Vec<Plan>, DatabaseError> {
    let rows: Vec<PlanRow> = sqlx::query_as(&format!("{} ORDER BY code", SELECT_PLAN))
        .fetch_all(&mut *conn)
        .await?;
    rows.into_iter().map(PlanRow::into_plan).collect()
}

pub async fn update(conn: &mut PgConnection, plan: &Plan) -> Result<(), DatabaseError> {
    let result = sqlx::query(
        r#"
        UPDATE plans
        SET code = $2, name = $3, assumptions = $4, updated_at = $5
        WHERE id = $1
        "#,
    )
    .bind(*plan.id().as_uuid())
    .bind(plan.code())
    .bind(plan.name())
    .bind(Json(plan.assumptions()))
    .bind(plan.updated_at())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Plan", plan.id()));
    }
    Ok(())
}

pub async fn delete(conn: &mut PgConnection, id: PlanId) -> Result<(), DatabaseError> {
    let result = sqlx::query("DELETE FROM plans WHERE id = $1")
        .bind(*id.as_uuid())
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Plan", id));
    }
    Ok(())
}

/// Takes a row lock on the plan for the rest of the transaction
///
/// Portfolio creation holds this lock while it checks for an existing
/// portfolio, so two concurrent runs for the same plan are serialized.
pub async fn lock(conn: &mut PgConnection, id: PlanId) -> Result<(), DatabaseError> {
    let locked: Option<Uuid> = sqlx::query_scalar("SELECT id FROM plans WHERE id = $1 FOR UPDATE")
        .bind(*id.as_uuid())
        .fetch_optional(&mut *conn)
        .await?;
    locked.map(|_| ()).ok_or_else(|| DatabaseError::not_found("Plan", id))
}
