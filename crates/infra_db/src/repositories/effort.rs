//! Effort repository

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use core_kernel::{BaselineId, CompetenceId, EffortId};
use domain_estimation::{Effort, EffortAllocation, EffortRecord};

use super::invalid_row;
use crate::error::DatabaseError;

/// Database row for the `efforts` table
#[derive(Debug, Clone, FromRow)]
pub struct EffortRow {
    pub id: Uuid,
    pub baseline_id: Uuid,
    pub competence_id: Uuid,
    pub comment: String,
    pub hours: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Database row for the `effort_allocations` table
#[derive(Debug, Clone, FromRow)]
pub struct EffortAllocationRow {
    pub effort_id: Uuid,
    pub allocation_date: NaiveDate,
    pub hours: i32,
}

impl EffortRow {
    pub fn into_effort(self, allocations: Vec<EffortAllocationRow>) -> Result<Effort, DatabaseError> {
        Effort::restore(EffortRecord {
            id: EffortId::from_uuid(self.id),
            baseline_id: BaselineId::from_uuid(self.baseline_id),
            competence_id: CompetenceId::from_uuid(self.competence_id),
            comment: self.comment,
            hours: self.hours,
            allocations: allocations
                .into_iter()
                .map(|a| EffortAllocation::from_date(a.allocation_date, a.hours))
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
        .map_err(|e| invalid_row("effort", e))
    }
}

const SELECT_EFFORT: &str = r#"
    SELECT id, baseline_id, competence_id, comment, hours, created_at, updated_at
    FROM efforts
"#;

pub async fn insert(conn: &mut PgConnection, effort: &Effort) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO efforts (id, baseline_id, competence_id, comment, hours, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(*effort.id().as_uuid())
    .bind(*effort.baseline_id().as_uuid())
    .bind(*effort.competence_id().as_uuid())
    .bind(effort.comment())
    .bind(effort.hours())
    .bind(effort.created_at())
    .bind(effort.updated_at())
    .execute(&mut *conn)
    .await?;

    insert_allocations(conn, effort).await
}

async fn insert_allocations(conn: &mut PgConnection, effort: &Effort) -> Result<(), DatabaseError> {
    for allocation in effort.allocations() {
        sqlx::query("INSERT INTO effort_allocations (effort_id, allocation_date, hours) VALUES ($1, $2, $3)")
            .bind(*effort.id().as_uuid())
            .bind(allocation.date())
            .bind(allocation.hours())
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn load_allocations(
    conn: &mut PgConnection,
    effort_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<EffortAllocationRow>>, DatabaseError> {
    let rows: Vec<EffortAllocationRow> = sqlx::query_as(
        r#"
        SELECT effort_id, allocation_date, hours
        FROM effort_allocations
        WHERE effort_id = ANY($1)
        ORDER BY effort_id, allocation_date, id
        "#,
    )
    .bind(effort_ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<EffortAllocationRow>> = HashMap::new();
    for row in rows {
        grouped.entry(row.effort_id).or_default().push(row);
    }
    Ok(grouped)
}

pub async fn find(conn: &mut PgConnection, id: EffortId) -> Result<Effort, DatabaseError> {
    let row: Option<EffortRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_EFFORT))
        .bind(*id.as_uuid())
        .fetch_optional(&mut *conn)
        .await?;
    let row = row.ok_or_else(|| DatabaseError::not_found("Effort", id))?;
    let mut allocations = load_allocations(conn, &[row.id]).await?;
    let allocations = allocations.remove(&row.id).unwrap_or_default();
    row.into_effort(allocations)
}

/// Efforts of a baseline in creation order
pub async fn find_by_baseline(conn: &mut PgConnection, baseline_id: BaselineId) -> Result<Vec<Effort>, DatabaseError> {
    let rows: Vec<EffortRow> = sqlx::query_as(&format!("{} WHERE baseline_id = $1 ORDER BY created_at, id", SELECT_EFFORT))
        .bind(*baseline_id.as_uuid())
        .fetch_all(&mut *conn)
        .await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut allocations = load_allocations(conn, &ids).await?;
    rows.into_iter()
        .map(|row| {
            let own = allocations.remove(&row.id).unwrap_or_default();
            row.into_effort(own)
        })
        .collect()
}

pub async fn update(conn: &mut PgConnection, effort: &Effort) -> Result<(), DatabaseError> {
    let result = sqlx::query(
        r#"
        UPDATE efforts
        SET competence_id = $2, comment = $3, hours = $4, updated_at = $5
        WHERE id = $1
        "#,
    )
    .bind(*effort.id().as_uuid())
    .bind(*effort.competence_id().as_uuid())
    .bind(effort.comment())
    .bind(effort.hours())
    .bind(effort.updated_at())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Effort", effort.id()));
    }

    sqlx::query("DELETE FROM effort_allocations WHERE effort_id = $1")
        .bind(*effort.id().as_uuid())
        .execute(&mut *conn)
        .await?;
    insert_allocations(conn, effort).await
}

pub async fn delete(conn: &mut PgConnection, id: EffortId) -> Result<(), DatabaseError> {
    let result = sqlx::query("DELETE FROM efforts WHERE id = $1")
        .bind(*id.as_uuid())
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Effort", id));
    }
    Ok(())
}
