//! Property-Based Test Generators
//!
//! Proptest strategies that produce inputs already satisfying the domain
//! invariants: amounts in whole cents, allocations that add up to their
//! total, and months inside the reference plan.

use core_kernel::Currency;
use domain_estimation::{CostAllocationInput, EffortAllocationInput};
use proptest::prelude::*;

/// Strategy for any supported currency
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![Just(Currency::BRL), Just(Currency::USD), Just(Currency::EUR)]
}

/// Strategy for a foreign currency
pub fn foreign_currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![Just(Currency::USD), Just(Currency::EUR)]
}

/// Strategy for positive amounts in minor units (cents)
pub fn cents_strategy() -> impl Strategy<Value = i64> {
    1i64..10_000_000i64
}

/// Strategy for positive two-decimal amounts
pub fn amount_strategy() -> impl Strategy<Value = f64> {
    cents_strategy().prop_map(|cents| cents as f64 / 100.0)
}

/// Strategy for tax percentages with two decimals, 0 to 50%
pub fn tax_strategy() -> impl Strategy<Value = f64> {
    (0u32..=5000u32).prop_map(|n| f64::from(n) / 100.0)
}

/// Strategy for a month of 2022
pub fn month_2022_strategy() -> impl Strategy<Value = (i32, u32)> {
    (1u32..=12u32).prop_map(|month| (2022, month))
}

/// Strategy for a shift that keeps 2022 allocations inside the reference plan
pub fn shift_strategy() -> impl Strategy<Value = u32> {
    0u32..=36u32
}

/// Strategy for cost allocations in 2022, returned with their exact sum
///
/// Allocations are in distinct months and in date order, so the sum matches
/// the one computed during validation.
pub fn cost_allocations_strategy() -> impl Strategy<Value = (Vec<CostAllocationInput>, f64)> {
    proptest::collection::btree_map(1u32..=12u32, cents_strategy(), 1..6).prop_map(|months| {
        let allocations: Vec<CostAllocationInput> = months
            .into_iter()
            .map(|(month, cents)| CostAllocationInput {
                year: 2022,
                month,
                amount: cents as f64 / 100.0,
            })
            .collect();
        let total = allocations.iter().map(|a| a.amount).sum();
        (allocations, total)
    })
}

/// Strategy for effort allocations in 2022, returned with their total hours
pub fn effort_allocations_strategy() -> impl Strategy<Value = (Vec<EffortAllocationInput>, i32)> {
    proptest::collection::btree_map(1u32..=12u32, 1i32..=8000i32, 1..6).prop_map(|months| {
        let allocations: Vec<EffortAllocationInput> = months
            .into_iter()
            .map(|(month, hours)| EffortAllocationInput {
                year: 2022,
                month,
                hours,
            })
            .collect();
        let total = allocations.iter().map(|a| a.hours).sum();
        (allocations, total)
    })
}
