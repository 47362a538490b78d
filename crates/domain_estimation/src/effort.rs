//! Effort aggregate
//!
//! Labor hours for one competence on a baseline, spread over calendar months.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{first_day_of_month, BaselineId, CompetenceId, EffortId};

use crate::error::EstimationError;

const ENTITY: &str = "effort";

/// One month of an effort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffortAllocation {
    date: NaiveDate,
    hours: i32,
}

impl EffortAllocation {
    /// Creates an allocation pinned to the first day of (year, month)
    pub fn new(year: i32, month: u32, hours: i32) -> Result<Self, EstimationError> {
        Ok(Self {
            date: first_day_of_month(year, month)?,
            hours,
        })
    }

    /// Rebuilds a stored allocation; the date is checked by `Effort::validate`
    pub fn from_date(date: NaiveDate, hours: i32) -> Self {
        Self { date, hours }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn hours(&self) -> i32 {
        self.hours
    }
}

/// Raw (year, month, hours) allocation input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffortAllocationInput {
    pub year: i32,
    pub month: u32,
    pub hours: i32,
}

/// Builds allocations dated to the first of their month, sorted by date
pub fn create_effort_allocations(inputs: &[EffortAllocationInput]) -> Result<Vec<EffortAllocation>, EstimationError> {
    let mut allocations = inputs
        .iter()
        .map(|input| EffortAllocation::new(input.year, input.month, input.hours))
        .collect::<Result<Vec<_>, _>>()?;
    allocations.sort_by_key(|a| a.date);
    Ok(allocations)
}

/// Input for creating an effort
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEffort {
    pub baseline_id: BaselineId,
    pub competence_id: CompetenceId,
    pub comment: String,
    pub hours: i32,
    pub allocations: Vec<EffortAllocationInput>,
}

/// A fully-populated effort as read back from storage
#[derive(Debug, Clone)]
pub struct EffortRecord {
    pub id: EffortId,
    pub baseline_id: BaselineId,
    pub competence_id: CompetenceId,
    pub comment: String,
    pub hours: i32,
    pub allocations: Vec<EffortAllocation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffortChanges {
    pub competence_id: Option<CompetenceId>,
    pub comment: Option<String>,
    pub hours: Option<i32>,
    pub allocations: Option<Vec<EffortAllocationInput>>,
}

/// Labor hours estimated for a baseline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Effort {
    id: EffortId,
    baseline_id: BaselineId,
    competence_id: CompetenceId,
    comment: String,
    hours: i32,
    allocations: Vec<EffortAllocation>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Effort {
    /// Creates a validated effort with a fresh identity
    pub fn new(input: NewEffort) -> Result<Self, EstimationError> {
        let effort = Self {
            id: EffortId::new_v7(),
            baseline_id: input.baseline_id,
            competence_id: input.competence_id,
            comment: input.comment,
            hours: input.hours,
            allocations: create_effort_allocations(&input.allocations)?,
            created_at: Utc::now(),
            updated_at: None,
        };
        effort.validate()?;
        Ok(effort)
    }

    /// Rebuilds a stored effort, re-checking its invariants
    pub fn restore(record: EffortRecord) -> Result<Self, EstimationError> {
        let effort = Self {
            id: record.id,
            baseline_id: record.baseline_id,
            competence_id: record.competence_id,
            comment: record.comment,
            hours: record.hours,
            allocations: record.allocations,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        effort.validate()?;
        Ok(effort)
    }

    /// Applies a partial update and re-validates
    pub fn update(&mut self, changes: EffortChanges) -> Result<(), EstimationError> {
        let mut next = self.clone();
        if let Some(competence_id) = changes.competence_id {
            next.competence_id = competence_id;
        }
        if let Some(comment) = changes.comment {
            next.comment = comment;
        }
        if let Some(hours) = changes.hours {
            next.hours = hours;
        }
        if let Some(allocations) = changes.allocations {
            next.allocations = create_effort_allocations(&allocations)?;
        }
        next.validate()?;
        next.updated_at = Some(Utc::now());
        *self = next;
        Ok(())
    }

    /// Checks the effort invariants
    pub fn validate(&self) -> Result<(), EstimationError> {
        if self.id.is_nil() {
            return Err(EstimationError::validation(ENTITY, "id is required"));
        }
        if self.baseline_id.is_nil() {
            return Err(EstimationError::validation(ENTITY, "baseline is required"));
        }
        if self.competence_id.is_nil() {
            return Err(EstimationError::validation(ENTITY, "competence is required"));
        }
        if self.hours < 1 {
            return Err(EstimationError::validation(ENTITY, format!("invalid effort hours {}", self.hours)));
        }
        if self.allocations.is_empty() {
            return Err(EstimationError::validation(ENTITY, "effort allocations are required"));
        }
        if self.allocations.iter().any(|a| a.date.day() != 1) {
            return Err(EstimationError::validation(ENTITY, "effort allocation must be on the first day of a month"));
        }
        let total: i64 = self.allocations.iter().map(|a| i64::from(a.hours)).sum();
        if total != i64::from(self.hours) {
            return Err(EstimationError::validation(
                ENTITY,
                format!("effort allocation total {} is not equal to effort hours {}", total, self.hours),
            ));
        }
        Ok(())
    }

    /// Returns true if no allocation falls before `date`
    pub fn starts_on_or_after(&self, date: NaiveDate) -> bool {
        self.allocations.iter().all(|a| a.date >= date)
    }

    pub fn id(&self) -> EffortId {
        self.id
    }

    pub fn baseline_id(&self) -> BaselineId {
        self.baseline_id
    }

    pub fn competence_id(&self) -> CompetenceId {
        self.competence_id
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn hours(&self) -> i32 {
        self.hours
    }

    pub fn allocations(&self) -> &[EffortAllocation] {
        &self.allocations
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
