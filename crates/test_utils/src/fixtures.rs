//! Pre-built Test Fixtures
//!
//! The reference plan "BP 2026" covers 2022-2027; the reference baseline
//! starts in January 2022. Expected values in the scenario tests are worked
//! out against these two.

use chrono::NaiveDate;
use core_kernel::{BaselineId, CompetenceId, Currency, UserId};
use domain_estimation::{
    Assumption, CostAllocationInput, CostType, CurrencyAssumption, EffortAllocationInput, NewBaseline,
    NewCost, NewEffort, NewPlan,
};

/// Yearly (inflation, USD rate, EUR rate) of the reference plan
pub const PLAN_TABLE: [(i32, f64, f64, f64); 6] = [
    (2022, 3.10, 4.15, 5.36),
    (2023, 3.50, 4.25, 5.56),
    (2024, 4.00, 4.50, 5.50),
    (2025, 5.20, 5.00, 6.00),
    (2026, 5.26, 5.55, 6.66),
    (2027, 5.30, 5.77, 6.88),
];

/// Fixture for plans
pub struct PlanFixtures;

impl PlanFixtures {
    /// One year of assumptions
    pub fn assumption(year: i32, inflation: f64, usd: f64, eur: f64) -> Assumption {
        Assumption {
            year,
            inflation,
            currencies: vec![
                CurrencyAssumption {
                    currency: Currency::USD,
                    exchange: usd,
                },
                CurrencyAssumption {
                    currency: Currency::EUR,
                    exchange: eur,
                },
            ],
        }
    }

    /// The assumptions of the reference plan
    pub fn assumptions() -> Vec<Assumption> {
        PLAN_TABLE
            .iter()
            .map(|&(year, inflation, usd, eur)| Self::assumption(year, inflation, usd, eur))
            .collect()
    }

    /// The reference plan "BP 2026"
    pub fn bp_2026() -> NewPlan {
        NewPlan {
            code: "BP 2026".to_string(),
            name: "Business Plan 2026".to_string(),
            assumptions: Self::assumptions(),
        }
    }

    /// A plan covering only `years` of the reference table
    pub fn covering(code: &str, years: std::ops::RangeInclusive<i32>) -> NewPlan {
        NewPlan {
            code: code.to_string(),
            name: format!("Plan {}", code),
            assumptions: Self::assumptions()
                .into_iter()
                .filter(|a| years.contains(&a.year))
                .collect(),
        }
    }
}

/// Fixture for baselines
pub struct BaselineFixtures;

impl BaselineFixtures {
    /// The reference baseline, starting January 2022
    pub fn data_platform() -> NewBaseline {
        NewBaseline {
            code: "DATA-PLAT".to_string(),
            review: 1,
            title: "Data platform".to_string(),
            description: "Migration to the new data platform".to_string(),
            start_year: 2022,
            start_month: 1,
            duration: 24,
            manager_id: UserId::new(),
            estimator_id: UserId::new(),
        }
    }

    /// Start date of the reference baseline
    pub fn start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
    }
}

/// Fixture for cost estimates
pub struct CostFixtures;

impl CostFixtures {
    fn allocations(pairs: &[(i32, u32, f64)]) -> Vec<CostAllocationInput> {
        pairs
            .iter()
            .map(|&(year, month, amount)| CostAllocationInput { year, month, amount })
            .collect()
    }

    /// BRL 880.30, inflation applied, no tax: Jan-22 610.15 and Aug-22 270.15
    pub fn brl_with_inflation(baseline_id: BaselineId) -> NewCost {
        NewCost {
            baseline_id,
            cost_type: CostType::OneTime,
            description: "Hardware".to_string(),
            comment: String::new(),
            amount: 880.30,
            currency: Currency::BRL,
            tax: 0.0,
            apply_inflation: true,
            allocations: Self::allocations(&[(2022, 1, 610.15), (2022, 8, 270.15)]),
        }
    }

    /// EUR 220.20 with 23% tax: Feb-23 120.15 and Dec-23 100.05
    pub fn eur_with_tax(baseline_id: BaselineId) -> NewCost {
        NewCost {
            baseline_id,
            cost_type: CostType::Running,
            description: "Licenses".to_string(),
            comment: "Yearly subscription".to_string(),
            amount: 220.20,
            currency: Currency::EUR,
            tax: 23.0,
            apply_inflation: true,
            allocations: Self::allocations(&[(2023, 2, 120.15), (2023, 12, 100.05)]),
        }
    }

    /// USD 1000.00, no tax, in a single month
    pub fn usd_single(baseline_id: BaselineId, year: i32, month: u32) -> NewCost {
        NewCost {
            baseline_id,
            cost_type: CostType::Investment,
            description: "Consulting".to_string(),
            comment: String::new(),
            amount: 1000.0,
            currency: Currency::USD,
            tax: 0.0,
            apply_inflation: false,
            allocations: Self::allocations(&[(year, month, 1000.0)]),
        }
    }
}

/// Fixture for effort estimates
pub struct EffortFixtures;

impl EffortFixtures {
    /// 300 hours: Nov-22 100 and Dec-22 200
    pub fn backend(baseline_id: BaselineId) -> NewEffort {
        NewEffort {
            baseline_id,
            competence_id: CompetenceId::new(),
            comment: "Backend development".to_string(),
            hours: 300,
            allocations: vec![
                EffortAllocationInput {
                    year: 2022,
                    month: 11,
                    hours: 100,
                },
                EffortAllocationInput {
                    year: 2022,
                    month: 12,
                    hours: 200,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_estimation::{Baseline, Cost, Plan};

    #[test]
    fn test_reference_fixtures_are_valid() {
        let plan = Plan::new(PlanFixtures::bp_2026()).unwrap();
        assert_eq!(plan.years(), vec![2022, 2023, 2024, 2025, 2026, 2027]);

        let baseline = Baseline::new(BaselineFixtures::data_platform()).unwrap();
        assert_eq!(baseline.start_date(), BaselineFixtures::start_date());

        assert!(Cost::new(CostFixtures::brl_with_inflation(baseline.id())).is_ok());
        assert!(Cost::new(CostFixtures::eur_with_tax(baseline.id())).is_ok());
    }

    #[test]
    fn test_covering_trims_years() {
        let plan = Plan::new(PlanFixtures::covering("SHORT", 2022..=2023)).unwrap();
        assert_eq!(plan.years(), vec![2022, 2023]);
    }
}
