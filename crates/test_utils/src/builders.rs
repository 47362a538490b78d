//! Test Data Builders
//!
//! Builders for the domain inputs with sensible defaults. Tests set only the
//! fields they care about; free text is generated with `fake`.

use core_kernel::{BaselineId, CompetenceId, Currency, UserId};
use domain_estimation::{
    Assumption, CostAllocationInput, CostType, EffortAllocationInput, NewBaseline, NewCost, NewEffort,
    NewPlan,
};
use fake::faker::company::en::CatchPhrase;
use fake::faker::lorem::en::Sentence;
use fake::Fake;

use crate::fixtures::PlanFixtures;

/// Builder for `NewBaseline`
pub struct NewBaselineBuilder {
    inner: NewBaseline,
}

impl Default for NewBaselineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NewBaselineBuilder {
    /// Starts from a valid baseline beginning January 2022
    pub fn new() -> Self {
        Self {
            inner: NewBaseline {
                code: format!("PRJ-{}", (1000..9999).fake::<u32>()),
                review: 1,
                title: CatchPhrase().fake(),
                description: Sentence(3..8).fake(),
                start_year: 2022,
                start_month: 1,
                duration: 24,
                manager_id: UserId::new(),
                estimator_id: UserId::new(),
            },
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.inner.code = code.into();
        self
    }

    pub fn with_review(mut self, review: i32) -> Self {
        self.inner.review = review;
        self
    }

    /// Sets the start month
    pub fn starting(mut self, year: i32, month: u32) -> Self {
        self.inner.start_year = year;
        self.inner.start_month = month;
        self
    }

    pub fn with_duration(mut self, duration: i32) -> Self {
        self.inner.duration = duration;
        self
    }

    pub fn build(self) -> NewBaseline {
        self.inner
    }
}

/// Builder for `NewPlan`, defaulting to the reference assumptions
pub struct NewPlanBuilder {
    inner: NewPlan,
}

impl Default for NewPlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NewPlanBuilder {
    pub fn new() -> Self {
        Self {
            inner: NewPlan {
                code: format!("BP{}", (1000..9999).fake::<u32>()),
                name: CatchPhrase().fake(),
                assumptions: PlanFixtures::assumptions(),
            },
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.inner.code = code.into();
        self
    }

    pub fn with_assumptions(mut self, assumptions: Vec<Assumption>) -> Self {
        self.inner.assumptions = assumptions;
        self
    }

    pub fn build(self) -> NewPlan {
        self.inner
    }
}

/// Builder for `NewCost`
///
/// The amount is the running sum of the allocations added so far. Add
/// allocations in date order so the sum matches the one validation computes.
pub struct NewCostBuilder {
    inner: NewCost,
}

impl NewCostBuilder {
    /// Starts a BRL running cost with no allocations
    pub fn new(baseline_id: BaselineId) -> Self {
        Self {
            inner: NewCost {
                baseline_id,
                cost_type: CostType::Running,
                description: Sentence(2..5).fake(),
                comment: String::new(),
                amount: 0.0,
                currency: Currency::BRL,
                tax: 0.0,
                apply_inflation: false,
                allocations: Vec::new(),
            },
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.inner.currency = currency;
        self
    }

    pub fn with_tax(mut self, tax: f64) -> Self {
        self.inner.tax = tax;
        self
    }

    pub fn with_inflation(mut self) -> Self {
        self.inner.apply_inflation = true;
        self
    }

    pub fn with_type(mut self, cost_type: CostType) -> Self {
        self.inner.cost_type = cost_type;
        self
    }

    /// Adds a monthly allocation
    pub fn allocate(mut self, year: i32, month: u32, amount: f64) -> Self {
        self.inner.allocations.push(CostAllocationInput { year, month, amount });
        self.inner.amount += amount;
        self
    }

    pub fn build(self) -> NewCost {
        self.inner
    }
}

/// Builder for `NewEffort`; hours track the allocations added so far
pub struct NewEffortBuilder {
    inner: NewEffort,
}

impl NewEffortBuilder {
    pub fn new(baseline_id: BaselineId) -> Self {
        Self {
            inner: NewEffort {
                baseline_id,
                competence_id: CompetenceId::new(),
                comment: Sentence(2..5).fake(),
                hours: 0,
                allocations: Vec::new(),
            },
        }
    }

    pub fn with_competence(mut self, competence_id: CompetenceId) -> Self {
        self.inner.competence_id = competence_id;
        self
    }

    pub fn allocate(mut self, year: i32, month: u32, hours: i32) -> Self {
        self.inner.allocations.push(EffortAllocationInput { year, month, hours });
        self.inner.hours += hours;
        self
    }

    pub fn build(self) -> NewEffort {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_estimation::{Baseline, Cost, Effort, Plan};

    #[test]
    fn test_default_builders_are_valid() {
        let baseline = Baseline::new(NewBaselineBuilder::new().build()).unwrap();
        assert!(Plan::new(NewPlanBuilder::new().build()).is_ok());

        let cost = NewCostBuilder::new(baseline.id())
            .allocate(2022, 1, 10.25)
            .allocate(2022, 2, 20.50)
            .build();
        assert_eq!(cost.amount, 30.75);
        assert!(Cost::new(cost).is_ok());

        let effort = NewEffortBuilder::new(baseline.id()).allocate(2022, 3, 40).build();
        assert!(Effort::new(effort).is_ok());
    }
}
