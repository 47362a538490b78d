//! Unit tests for currencies and decimal-safe rounding
//!
//! Tests cover half-away-from-zero rounding on values that binary rounding
//! gets wrong, the two-decimal predicate, and currency parsing.

use core_kernel::{Currency, MoneyError, round_to, round2, round4, is_two_decimals, to_decimal, from_decimal};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

mod rounding {
    use super::*;

    #[test]
    fn test_round2_rounds_midpoint_up() {
        assert_eq!(round2(1.235), 1.24);
        assert_eq!(round2(2.675), 2.68);
        assert_eq!(round2(1.005), 1.01);
    }

    #[test]
    fn test_round2_rounds_negative_midpoint_away_from_zero() {
        assert_eq!(round2(-1.235), -1.24);
        assert_eq!(round2(-2.675), -2.68);
    }

    #[test]
    fn test_round2_does_not_use_bankers_rounding() {
        assert_eq!(round2(4337.025), 4337.03);
        assert_eq!(round2(0.125), 0.13);
    }

    #[test]
    fn test_round2_below_midpoint_rounds_down() {
        assert_eq!(round2(3.2349999999999994), 3.23);
        assert_eq!(round2(1.12445), 1.12);
    }

    #[test]
    fn test_round2_of_products() {
        assert_eq!(round2(120.15 * (1.0 + 23.0 / 100.0) * 5.56), 821.68);
        assert_eq!(round2(100.05 * (1.0 + 23.0 / 100.0) * 5.50), 676.84);
        assert_eq!(round2(270.15 * 1.035), 279.61);
    }

    #[test]
    fn test_round4_keeps_factor_precision() {
        assert_eq!(round4(1.035 * 1.04), 1.0764);
        assert_eq!(round4(1.00005), 1.0001);
    }

    #[test]
    fn test_round_to_zero_places() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
    }

    #[test]
    fn test_integers_are_unchanged() {
        assert_eq!(round2(100000.0), 100000.0);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_non_finite_values_are_returned_unchanged() {
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round2(f64::NEG_INFINITY), f64::NEG_INFINITY);
    }
}

mod two_decimals {
    use super::*;

    #[test]
    fn test_accepts_cent_values() {
        assert!(is_two_decimals(100.05));
        assert!(is_two_decimals(880.3));
        assert!(is_two_decimals(5.0));
    }

    #[test]
    fn test_rejects_sub_cent_values() {
        assert!(!is_two_decimals(1.005));
        assert!(!is_two_decimals(0.1 + 0.2));
        assert!(!is_two_decimals(3.141));
    }
}

mod conversion {
    use super::*;

    #[test]
    fn test_to_decimal_uses_shortest_representation() {
        assert_eq!(to_decimal(4337.025).unwrap(), Decimal::from_str("4337.025").unwrap());
        assert_eq!(to_decimal(0.1).unwrap(), Decimal::from_str("0.1").unwrap());
    }

    #[test]
    fn test_numeric_column_values_read_back_exactly() {
        assert_eq!(to_decimal(880.30).unwrap(), dec!(880.30));
        assert_eq!(from_decimal(dec!(880.30)), 880.30);
        assert_eq!(from_decimal(dec!(1498.52)), 1498.52);
    }

    #[test]
    fn test_to_decimal_rejects_nan() {
        assert!(matches!(to_decimal(f64::NAN), Err(MoneyError::NotRepresentable(_))));
    }
}

mod currency {
    use super::*;

    #[test]
    fn test_home_currency() {
        assert!(Currency::BRL.is_home());
        assert!(!Currency::USD.is_home());
        assert!(!Currency::EUR.is_home());
        assert_eq!(Currency::HOME, Currency::BRL);
    }

    #[test]
    fn test_foreign_currencies() {
        assert_eq!(Currency::FOREIGN, [Currency::USD, Currency::EUR]);
    }

    #[test]
    fn test_display_uses_code() {
        assert_eq!(Currency::EUR.to_string(), "EUR");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Currency::from_str("usd").unwrap(), Currency::USD);
        assert_eq!(Currency::from_str("Brl").unwrap(), Currency::BRL);
    }

    #[test]
    fn test_parse_unknown_currency() {
        assert_eq!(
            Currency::from_str("JPY"),
            Err(MoneyError::UnknownCurrency("JPY".to_string()))
        );
    }

    #[test]
    fn test_currency_json_roundtrip() {
        let json = serde_json::to_string(&Currency::EUR).unwrap();
        assert_eq!(json, "\"EUR\"");
        let back: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Currency::EUR);
    }
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn cents_are_always_two_decimals(cents in -1_000_000_000i64..1_000_000_000i64) {
            let value = cents as f64 / 100.0;
            prop_assert!(is_two_decimals(value));
        }

        #[test]
        fn round2_is_idempotent(value in -1.0e9f64..1.0e9f64) {
            let once = round2(value);
            prop_assert_eq!(round2(once), once);
        }

        #[test]
        fn round2_moves_less_than_half_a_cent(value in -1.0e6f64..1.0e6f64) {
            prop_assert!((round2(value) - value).abs() <= 0.005 + 1e-9);
        }
    }
}
