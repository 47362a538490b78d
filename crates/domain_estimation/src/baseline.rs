//! Baseline entity
//!
//! A baseline is a recorded project: what it is, when it starts, how long it
//! runs and who is responsible for it. Costs and efforts attach to it by id.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{first_day_of_month, BaselineId, UserId};

use crate::error::EstimationError;

/// Maximum length of a baseline code
pub const MAX_CODE_LEN: usize = 20;

/// Maximum baseline duration in months
pub const MAX_DURATION_MONTHS: i32 = 60;

const ENTITY: &str = "baseline";

/// Input for creating a baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBaseline {
    pub code: String,
    pub review: i32,
    pub title: String,
    pub description: String,
    pub start_year: i32,
    pub start_month: u32,
    pub duration: i32,
    pub manager_id: UserId,
    pub estimator_id: UserId,
}

/// A fully-populated baseline as read back from storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineRecord {
    pub id: BaselineId,
    pub code: String,
    pub review: i32,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub duration: i32,
    pub manager_id: UserId,
    pub estimator_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaselineChanges {
    pub code: Option<String>,
    pub review: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_year: Option<i32>,
    pub start_month: Option<u32>,
    pub duration: Option<i32>,
    pub manager_id: Option<UserId>,
    pub estimator_id: Option<UserId>,
}

/// A project baseline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Baseline {
    id: BaselineId,
    code: String,
    review: i32,
    title: String,
    description: String,
    start_date: NaiveDate,
    duration: i32,
    manager_id: UserId,
    estimator_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Baseline {
    /// Creates a validated baseline with a fresh identity
    pub fn new(input: NewBaseline) -> Result<Self, EstimationError> {
        let baseline = Self {
            id: BaselineId::new_v7(),
            code: input.code,
            review: input.review,
            title: input.title,
            description: input.description,
            start_date: first_day_of_month(input.start_year, input.start_month)?,
            duration: input.duration,
            manager_id: input.manager_id,
            estimator_id: input.estimator_id,
            created_at: Utc::now(),
            updated_at: None,
        };
        baseline.validate()?;
        Ok(baseline)
    }

    /// Rebuilds a stored baseline, re-checking its invariants
    pub fn restore(record: BaselineRecord) -> Result<Self, EstimationError> {
        let baseline = Self {
            id: record.id,
            code: record.code,
            review: record.review,
            title: record.title,
            description: record.description,
            start_date: record.start_date,
            duration: record.duration,
            manager_id: record.manager_id,
            estimator_id: record.estimator_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        baseline.validate()?;
        Ok(baseline)
    }

    /// Applies a partial update and re-validates
    ///
    /// On failure the baseline is left as it was.
    pub fn update(&mut self, changes: BaselineChanges) -> Result<(), EstimationError> {
        let mut next = self.clone();
        if let Some(code) = changes.code {
            next.code = code;
        }
        if let Some(review) = changes.review {
            next.review = review;
        }
        if let Some(title) = changes.title {
            next.title = title;
        }
        if let Some(description) = changes.description {
            next.description = description;
        }
        if changes.start_year.is_some() || changes.start_month.is_some() {
            let year = changes.start_year.unwrap_or(next.start_date.year());
            let month = changes.start_month.unwrap_or(next.start_date.month());
            next.start_date = first_day_of_month(year, month)?;
        }
        if let Some(duration) = changes.duration {
            next.duration = duration;
        }
        if let Some(manager_id) = changes.manager_id {
            next.manager_id = manager_id;
        }
        if let Some(estimator_id) = changes.estimator_id {
            next.estimator_id = estimator_id;
        }
        next.validate()?;
        next.updated_at = Some(Utc::now());
        *self = next;
        Ok(())
    }

    /// Checks the baseline invariants
    pub fn validate(&self) -> Result<(), EstimationError> {
        if self.id.is_nil() {
            return Err(EstimationError::validation(ENTITY, "id is required"));
        }
        if self.code.trim().is_empty() {
            return Err(EstimationError::validation(ENTITY, "code is required"));
        }
        if self.code.chars().count() > MAX_CODE_LEN {
            return Err(EstimationError::validation(
                ENTITY,
                format!("code must have at most {} characters", MAX_CODE_LEN),
            ));
        }
        if self.review <= 0 {
            return Err(EstimationError::validation(ENTITY, format!("invalid review {}", self.review)));
        }
        if self.title.trim().is_empty() {
            return Err(EstimationError::validation(ENTITY, "title is required"));
        }
        if self.start_date.day() != 1 {
            return Err(EstimationError::validation(ENTITY, "start date must be the first day of a month"));
        }
        if self.duration <= 0 || self.duration > MAX_DURATION_MONTHS {
            return Err(EstimationError::validation(
                ENTITY,
                format!("duration {} must be between 1 and {} months", self.duration, MAX_DURATION_MONTHS),
            ));
        }
        if self.manager_id.is_nil() {
            return Err(EstimationError::validation(ENTITY, "manager is required"));
        }
        if self.estimator_id.is_nil() {
            return Err(EstimationError::validation(ENTITY, "estimator is required"));
        }
        Ok(())
    }

    pub fn id(&self) -> BaselineId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn review(&self) -> i32 {
        self.review
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Duration in months
    pub fn duration(&self) -> i32 {
        self.duration
    }

    pub fn manager_id(&self) -> UserId {
        self.manager_id
    }

    pub fn estimator_id(&self) -> UserId {
        self.estimator_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
