//! Cost repository
//!
//! A cost is one `costs` row plus its `cost_allocations` rows. Allocations
//! are rewritten wholesale on update.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use core_kernel::{from_decimal, to_decimal, BaselineId, CostId, Currency};
use domain_estimation::{Cost, CostAllocation, CostRecord, CostType};

use super::invalid_row;
use crate::error::DatabaseError;

/// Database row for the `costs` table
#[derive(Debug, Clone, FromRow)]
pub struct CostRow {
    pub id: Uuid,
    pub baseline_id: Uuid,
    pub cost_type: String,
    pub description: String,
    pub comment: String,
    pub amount: Decimal,
    pub currency: String,
    pub tax: Decimal,
    pub apply_inflation: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Database row for the `cost_allocations` table
#[derive(Debug, Clone, FromRow)]
pub struct CostAllocationRow {
    pub cost_id: Uuid,
    pub allocation_date: NaiveDate,
    pub amount: Decimal,
}

impl CostRow {
    pub fn into_cost(self, allocations: Vec<CostAllocationRow>) -> Result<Cost, DatabaseError> {
        let cost_type = self
            .cost_type
            .parse::<CostType>()
            .map_err(|e| invalid_row("cost", e))?;
        let currency = self.currency.trim().parse::<Currency>()?;
        Cost::restore(CostRecord {
            id: CostId::from_uuid(self.id),
            baseline_id: BaselineId::from_uuid(self.baseline_id),
            cost_type,
            description: self.description,
            comment: self.comment,
            amount: from_decimal(self.amount),
            currency,
            tax: from_decimal(self.tax),
            apply_inflation: self.apply_inflation,
            allocations: allocations
                .into_iter()
                .map(|a| CostAllocation::from_date(a.allocation_date, from_decimal(a.amount)))
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
        .map_err(|e| invalid_row("cost", e))
    }
}

const SELECT_COST: &str = r#"
    SELECT id, baseline_id, cost_type, description, comment, amount, currency,
           tax, apply_inflation, created_at, updated_at
    FROM costs
"#;

pub async fn insert(conn: &mut PgConnection, cost: &Cost) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO costs (
            id, baseline_id, cost_type, description, comment, amount, currency,
            tax, apply_inflation, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(*cost.id().as_uuid())
    .bind(*cost.baseline_id().as_uuid())
    .bind(cost.cost_type().as_str())
    .bind(cost.description())
    .bind(cost.comment())
    .bind(to_decimal(cost.amount())?)
    .bind(cost.currency().code())
    .bind(to_decimal(cost.tax())?)
    .bind(cost.apply_inflation())
    .bind(cost.created_at())
    .bind(cost.updated_at())
    .execute(&mut *conn)
    .await?;

    insert_allocations(conn, cost).await
}

async fn insert_allocations(conn: &mut PgConnection, cost: &Cost) -> Result<(), DatabaseError> {
    for allocation in cost.allocations() {
        sqlx::query("INSERT INTO cost_allocations (cost_id, allocation_date, amount) VALUES ($1, $2, $3)")
            .bind(*cost.id().as_uuid())
            .bind(allocation.date())
            .bind(to_decimal(allocation.amount())?)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn load_allocations(
    conn: &mut PgConnection,
    cost_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<CostAllocationRow>>, DatabaseError> {
    let rows: Vec<CostAllocationRow> = sqlx::query_as(
        r#"
        SELECT cost_id, allocation_date, amount
        FROM cost_allocations
        WHERE cost_id = ANY($1)
        ORDER BY cost_id, allocation_date, id
        "#,
    )
    .bind(cost_ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<CostAllocationRow>> = HashMap::new();
    for row in rows {
        grouped.entry(row.cost_id).or_default().push(row);
    }
    Ok(grouped)
}

pub async fn find(conn: &mut PgConnection, id: CostId) -> Result<Cost, DatabaseError> {
    let row: Option<CostRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COST))
        .bind(*id.as_uuid())
        .fetch_optional(&mut *conn)
        .await?;
    let row = row.ok_or_else(|| DatabaseError::not_found("Cost", id))?;
    let mut allocations = load_allocations(conn, &[row.id]).await?;
    let allocations = allocations.remove(&row.id).unwrap_or_default();
    row.into_cost(allocations)
}

/// Costs of a baseline in creation order
pub async fn find_by_baseline(conn: &mut PgConnection, baseline_id: BaselineId) -> Result<Vec<Cost>, DatabaseError> {
    let rows: Vec<CostRow> = sqlx::query_as(&format!("{} WHERE baseline_id = $1 ORDER BY created_at, id", SELECT_COST))
        .bind(*baseline_id.as_uuid())
        .fetch_all(&mut *conn)
        .await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut allocations = load_allocations(conn, &ids).await?;
    rows.into_iter()
        .map(|row| {
            let own = allocations.remove(&row.id).unwrap_or_default();
            row.into_cost(own)
        })
        .collect()
}

pub async fn update(conn: &mut PgConnection, cost: &Cost) -> Result<(), DatabaseError> {
    let result = sqlx::query(
        r#"
        UPDATE costs
        SET cost_type = $2, description = $3, comment = $4, amount = $5, currency = $6,
            tax = $7, apply_inflation = $8, updated_at = $9
        WHERE id = $1
        "#,
    )
    .bind(*cost.id().as_uuid())
    .bind(cost.cost_type().as_str())
    .bind(cost.description())
    .bind(cost.comment())
    .bind(to_decimal(cost.amount())?)
    .bind(cost.currency().code())
    .bind(to_decimal(cost.tax())?)
    .bind(cost.apply_inflation())
    .bind(cost.updated_at())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Cost", cost.id()));
    }

    sqlx::query("DELETE FROM cost_allocations WHERE cost_id = $1")
        .bind(*cost.id().as_uuid())
        .execute(&mut *conn)
        .await?;
    insert_allocations(conn, cost).await
}

pub async fn delete(conn: &mut PgConnection, id: CostId) -> Result<(), DatabaseError> {
    let result = sqlx::query("DELETE FROM costs WHERE id = $1")
        .bind(*id.as_uuid())
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Cost", id));
    }
    Ok(())
}
