//! Plan entity
//!
//! A plan holds the macroeconomic assumptions for a run of consecutive years:
//! one inflation percent per year and one exchange rate per foreign currency
//! per year. Assumptions are always kept sorted by year.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{is_two_decimals, Currency, PlanId};

use crate::error::EstimationError;
use crate::exchange::{Exchange, ExchangeRate};
use crate::inflation::{Inflation, InflationRate};

/// Maximum length of a plan code
pub const MAX_CODE_LEN: usize = 10;

/// Maximum length of a plan name
pub const MAX_NAME_LEN: usize = 50;

const ENTITY: &str = "plan";

/// Exchange rate of one foreign currency in an assumption year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrencyAssumption {
    pub currency: Currency,
    pub exchange: f64,
}

/// Assumptions for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumption {
    pub year: i32,
    pub inflation: f64,
    pub currencies: Vec<CurrencyAssumption>,
}

/// Input for creating a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlan {
    pub code: String,
    pub name: String,
    pub assumptions: Vec<Assumption>,
}

/// A fully-populated plan as read back from storage
#[derive(Debug, Clone)]
pub struct PlanRecord {
    pub id: PlanId,
    pub code: String,
    pub name: String,
    pub assumptions: Vec<Assumption>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanChanges {
    pub code: Option<String>,
    pub name: Option<String>,
    pub assumptions: Option<Vec<Assumption>>,
}

/// A set of yearly financial assumptions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    id: PlanId,
    code: String,
    name: String,
    assumptions: Vec<Assumption>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Plan {
    /// Creates a validated plan with a fresh identity
    pub fn new(input: NewPlan) -> Result<Self, EstimationError> {
        let mut plan = Self {
            id: PlanId::new_v7(),
            code: input.code,
            name: input.name,
            assumptions: input.assumptions,
            created_at: Utc::now(),
            updated_at: None,
        };
        plan.sort_assumptions();
        plan.validate()?;
        Ok(plan)
    }

    /// Rebuilds a stored plan, re-checking its invariants
    pub fn restore(record: PlanRecord) -> Result<Self, EstimationError> {
        let mut plan = Self {
            id: record.id,
            code: record.code,
            name: record.name,
            assumptions: record.assumptions,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        plan.sort_assumptions();
        plan.validate()?;
        Ok(plan)
    }

    /// Applies a partial update and re-validates
    pub fn update(&mut self, changes: PlanChanges) -> Result<(), EstimationError> {
        let mut next = self.clone();
        if let Some(code) = changes.code {
            next.code = code;
        }
        if let Some(name) = changes.name {
            next.name = name;
        }
        if let Some(assumptions) = changes.assumptions {
            next.assumptions = assumptions;
            next.sort_assumptions();
        }
        next.validate()?;
        next.updated_at = Some(Utc::now());
        *self = next;
        Ok(())
    }

    /// Checks the plan invariants
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
        if self.name.trim().is_empty() {
            return Err(EstimationError::validation(ENTITY, "name is required"));
        }
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(EstimationError::validation(
                ENTITY,
                format!("name must have at most {} characters", MAX_NAME_LEN),
            ));
        }
        if self.assumptions.is_empty() {
            return Err(EstimationError::validation(ENTITY, "assumptions are required"));
        }
        for assumption in &self.assumptions {
            validate_assumption(assumption)?;
        }
        self.validate_years()
    }

    fn validate_years(&self) -> Result<(), EstimationError> {
        let mut previous: Option<i32> = None;
        for assumption in &self.assumptions {
            if let Some(previous) = previous {
                if assumption.year != previous + 1 {
                    return Err(EstimationError::validation(ENTITY, "assumptions must have consecutive years"));
                }
            }
            previous = Some(assumption.year);

            let count = |currency: Currency| {
                assumption
                    .currencies
                    .iter()
                    .filter(|c| c.currency == currency)
                    .count()
            };
            if count(Currency::EUR) != 1 {
                return Err(EstimationError::validation(ENTITY, "one EUR currency per year is required"));
            }
            if count(Currency::USD) != 1 {
                return Err(EstimationError::validation(ENTITY, "one USD currency per year is required"));
            }
        }
        Ok(())
    }

    fn sort_assumptions(&mut self) {
        self.assumptions.sort_by_key(|a| a.year);
    }

    /// Builds a fresh inflation accumulator from the yearly percentages
    pub fn inflation(&self) -> Inflation {
        Inflation::new(
            self.assumptions
                .iter()
                .map(|a| InflationRate {
                    year: a.year,
                    inflation: a.inflation,
                })
                .collect(),
        )
    }

    /// Builds the exchange rate table from the yearly currency assumptions
    pub fn exchange(&self) -> Exchange {
        Exchange::new(self.assumptions.iter().flat_map(|a| {
            a.currencies.iter().map(move |c| ExchangeRate {
                currency: c.currency,
                year: a.year,
                rate: c.exchange,
            })
        }))
    }

    /// Years covered by the plan, ascending
    pub fn years(&self) -> Vec<i32> {
        self.assumptions.iter().map(|a| a.year).collect()
    }

    pub fn id(&self) -> PlanId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn assumptions(&self) -> &[Assumption] {
        &self.assumptions
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

fn validate_assumption(assumption: &Assumption) -> Result<(), EstimationError> {
    if assumption.year <= 0 {
        return Err(EstimationError::validation(ENTITY, format!("invalid assumption year {}", assumption.year)));
    }
    if assumption.inflation < 0.0 || !is_two_decimals(assumption.inflation) {
        return Err(EstimationError::validation(
            ENTITY,
            format!("invalid inflation {} for year {}", assumption.inflation, assumption.year),
        ));
    }
    if assumption.currencies.is_empty() {
        return Err(EstimationError::validation(
            ENTITY,
            format!("currencies are required for year {}", assumption.year),
        ));
    }
    for currency in &assumption.currencies {
        if currency.currency.is_home() {
            return Err(EstimationError::validation(
                ENTITY,
                format!("currency {} does not take an exchange rate", currency.currency),
            ));
        }
        if currency.exchange < 0.0 || !is_two_decimals(currency.exchange) {
            return Err(EstimationError::validation(
                ENTITY,
                format!("invalid exchange {} for {} in year {}", currency.exchange, currency.currency, assumption.year),
            ));
        }
    }
    Ok(())
}
