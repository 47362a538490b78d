//! Tests for the plan entity and the tables derived from it

use core_kernel::Currency;
use domain_estimation::{Assumption, CurrencyAssumption, NewPlan, Plan, PlanChanges};

fn assumption(year: i32, inflation: f64, usd: f64, eur: f64) -> Assumption {
    Assumption {
        year,
        inflation,
        currencies: vec![
            CurrencyAssumption { currency: Currency::USD, exchange: usd },
            CurrencyAssumption { currency: Currency::EUR, exchange: eur },
        ],
    }
}

fn new_plan(assumptions: Vec<Assumption>) -> NewPlan {
    NewPlan {
        code: "BP 2026".to_string(),
        name: "Business Plan 2026".to_string(),
        assumptions,
    }
}

fn error_message(input: NewPlan) -> String {
    Plan::new(input).unwrap_err().to_string()
}

// ============================================================================
// Creation
// ============================================================================

mod plan_creation_tests {
    use super::*;

    #[test]
    fn test_assumptions_are_sorted_by_year() {
        let plan = Plan::new(new_plan(vec![
            assumption(2024, 4.00, 4.50, 5.50),
            assumption(2022, 3.10, 4.15, 5.36),
            assumption(2023, 3.50, 4.25, 5.56),
        ]))
        .unwrap();

        assert_eq!(plan.years(), vec![2022, 2023, 2024]);
    }

    #[test]
    fn test_code_and_name_limits() {
        let mut input = new_plan(vec![assumption(2022, 3.10, 4.15, 5.36)]);
        input.code = "ABCDEFGHIJK".to_string();
        assert!(error_message(input).contains("code must have at most 10 characters"));

        let mut input = new_plan(vec![assumption(2022, 3.10, 4.15, 5.36)]);
        input.name = "N".repeat(51);
        assert!(error_message(input).contains("name must have at most 50 characters"));

        let mut input = new_plan(vec![assumption(2022, 3.10, 4.15, 5.36)]);
        input.name = String::new();
        assert!(error_message(input).contains("name is required"));
    }

    #[test]
    fn test_assumptions_are_required() {
        assert!(error_message(new_plan(vec![])).contains("assumptions are required"));
    }

    #[test]
    fn test_years_must_be_consecutive() {
        let message = error_message(new_plan(vec![
            assumption(2022, 3.10, 4.15, 5.36),
            assumption(2024, 4.00, 4.50, 5.50),
        ]));
        assert_eq!(message, "plan domain validation failed: assumptions must have consecutive years");
    }

    #[test]
    fn test_inflation_must_have_two_decimals() {
        let message = error_message(new_plan(vec![assumption(2022, 3.105, 4.15, 5.36)]));
        assert!(message.contains("invalid inflation"));
    }

    #[test]
    fn test_negative_exchange_is_rejected() {
        let message = error_message(new_plan(vec![assumption(2022, 3.10, -4.15, 5.36)]));
        assert!(message.contains("invalid exchange"));
    }

    #[test]
    fn test_each_year_needs_one_eur_and_one_usd() {
        let mut only_usd = assumption(2022, 3.10, 4.15, 5.36);
        only_usd.currencies.retain(|c| c.currency == Currency::USD);
        assert!(error_message(new_plan(vec![only_usd])).contains("one EUR currency per year is required"));

        let mut two_usd = assumption(2022, 3.10, 4.15, 5.36);
        two_usd.currencies.push(CurrencyAssumption { currency: Currency::USD, exchange: 4.20 });
        assert!(error_message(new_plan(vec![two_usd])).contains("one USD currency per year is required"));
    }

    #[test]
    fn test_home_currency_is_not_an_assumption() {
        let mut with_home = assumption(2022, 3.10, 4.15, 5.36);
        with_home.currencies.push(CurrencyAssumption { currency: Currency::BRL, exchange: 1.0 });
        assert!(error_message(new_plan(vec![with_home])).contains("does not take an exchange rate"));
    }
}

// ============================================================================
// Derived tables
// ============================================================================

mod plan_tables_tests {
    use super::*;

    #[test]
    fn test_exchange_table_covers_every_year_and_currency() {
        let plan = Plan::new(new_plan(vec![
            assumption(2022, 3.10, 4.15, 5.36),
            assumption(2023, 3.50, 4.25, 5.56),
        ]))
        .unwrap();

        let exchange = plan.exchange();
        assert_eq!(exchange.len(), 4);
        assert_eq!(exchange.rate(Currency::EUR, 2023), Some(5.56));
        assert_eq!(exchange.rate(Currency::USD, 2024), None);
    }

    #[test]
    fn test_inflation_accumulator_uses_plan_years() {
        let plan = Plan::new(new_plan(vec![
            assumption(2023, 3.50, 4.25, 5.56),
            assumption(2022, 3.10, 4.15, 5.36),
        ]))
        .unwrap();

        let years: Vec<_> = plan.inflation().years().collect();
        assert_eq!(years, vec![2022, 2023]);
    }

    #[test]
    fn test_update_replaces_assumptions() {
        let mut plan = Plan::new(new_plan(vec![assumption(2022, 3.10, 4.15, 5.36)])).unwrap();

        plan.update(PlanChanges {
            assumptions: Some(vec![
                assumption(2031, 2.00, 5.00, 6.00),
                assumption(2030, 2.50, 5.10, 6.10),
            ]),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(plan.years(), vec![2030, 2031]);
        assert!(plan.updated_at().is_some());
    }

    #[test]
    fn test_invalid_update_is_discarded() {
        let mut plan = Plan::new(new_plan(vec![assumption(2022, 3.10, 4.15, 5.36)])).unwrap();
        let before = plan.clone();

        let result = plan.update(PlanChanges {
            code: Some(String::new()),
            ..Default::default()
        });

        assert!(result.is_err());
        assert_eq!(plan, before);
    }
}
