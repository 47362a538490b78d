//! Baseline repository

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use core_kernel::{BaselineId, UserId};
use domain_estimation::{Baseline, BaselineRecord};

use super::invalid_row;
use crate::error::DatabaseError;

/// Database row for the `baselines` table
#[derive(Debug, Clone, FromRow)]
pub struct BaselineRow {
    pub id: Uuid,
    pub code: String,
    pub review: i32,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub duration: i32,
    pub manager_id: Uuid,
    pub estimator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl BaselineRow {
    pub fn into_baseline(self) -> Result<Baseline, DatabaseError> {
        Baseline::restore(BaselineRecord {
            id: BaselineId::from_uuid(self.id),
            code: self.code,
            review: self.review,
            title: self.title,
            description: self.description,
            start_date: self.start_date,
            duration: self.duration,
            manager_id: UserId::from_uuid(self.manager_id),
            estimator_id: UserId::from_uuid(self.estimator_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
        .map_err(|e| invalid_row("baseline", e))
    }
}

const SELECT_BASELINE: &str = r#"
    SELECT id, code, review, title, description, start_date, duration,
           manager_id, estimator_id, created_at, updated_at
    FROM baselines
"#;

pub async fn insert(conn: &mut PgConnection, baseline: &Baseline) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO baselines (
            id, code, review, title, description, start_date, duration,
            manager_id, estimator_id, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(*baseline.id().as_uuid())
    .bind(baseline.code())
    .bind(baseline.review())
    .bind(baseline.title())
    .bind(baseline.description())
    .bind(baseline.start_date())
    .bind(baseline.duration())
    .bind(*baseline.manager_id().as_uuid())
    .bind(*baseline.estimator_id().as_uuid())
    .bind(baseline.created_at())
    .bind(baseline.updated_at())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn find(conn: &mut PgConnection, id: BaselineId) -> Result<Baseline, DatabaseError> {
    let row: Option<BaselineRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_BASELINE))
        .bind(*id.as_uuid())
        .fetch_optional(&mut *conn)
        .await?;
    row.ok_or_else(|| DatabaseError::not_found("Baseline", id))?
        .into_baseline()
}

pub async fn list(conn: &mut PgConnection) -> Result<Vec<Baseline>, DatabaseError> {
    let rows: Vec<BaselineRow> = sqlx::query_as(&format!("{} ORDER BY code, review", SELECT_BASELINE))
        .fetch_all(&mut *conn)
        .await?;
    rows.into_iter().map(BaselineRow::into_baseline).collect()
}

pub async fn update(conn: &mut PgConnection, baseline: &Baseline) -> Result<(), DatabaseError> {
    let result = sqlx::query(
        r#"
        UPDATE baselines
        SET code = $2, review = $3, title = $4, description = $5, start_date = $6,
            duration = $7, manager_id = $8, estimator_id = $9, updated_at = $10
        WHERE id = $1
        "#,
    )
    .bind(*baseline.id().as_uuid())
    .bind(baseline.code())
    .bind(baseline.review())
    .bind(baseline.title())
    .bind(baseline.description())
    .bind(baseline.start_date())
    .bind(baseline.duration())
    .bind(*baseline.manager_id().as_uuid())
    .bind(*baseline.estimator_id().as_uuid())
    .bind(baseline.updated_at())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Baseline", baseline.id()));
    }
    Ok(())
}

/// Deletes the baseline; its costs and efforts go with it through the foreign keys
pub async fn delete(conn: &mut PgConnection, id: BaselineId) -> Result<(), DatabaseError> {
    let result = sqlx::query("DELETE FROM baselines WHERE id = $1")
        .bind(*id.as_uuid())
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Baseline", id));
    }
    Ok(())
}
