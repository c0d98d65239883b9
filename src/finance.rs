//! General functions related to finance.
use crate::cash_flow::{CashFlowSeries, CostCategory};
use crate::units::{Dimensionless, Energy, Money};
use indexmap::IndexMap;
use strum::IntoEnumIterator;

/// Calculates the factor by which a value in the given year is multiplied to get its present
/// value, i.e. `1 / (1 + r)^year`.
///
/// Year zero is the present.
pub fn discount_factor(year: u32, discount_rate: Dimensionless) -> Dimensionless {
    Dimensionless(1.0) / (Dimensionless(1.0) + discount_rate).powf(f64::from(year))
}

/// Present values of a project's cash flows
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountedTotals {
    /// Present value of all outflows
    pub cost: Money,
    /// Present value of generation
    pub generation: Energy,
    /// Present value of outflows for each category of cost
    pub costs_by_category: IndexMap<CostCategory, Money>,
}

/// Discount every year of a cash flow series back to the start of construction.
///
/// Values are accumulated in year order, so results are reproducible to the last bit.
pub fn discount(series: &CashFlowSeries, discount_rate: Dimensionless) -> DiscountedTotals {
    let mut cost = Money(0.0);
    let mut generation = Energy(0.0);
    let mut costs_by_category: IndexMap<_, _> = CostCategory::iter()
        .map(|category| (category, Money(0.0)))
        .collect();

    for year in series {
        let factor = discount_factor(year.year, discount_rate);
        for (category, total) in &mut costs_by_category {
            *total += year.cost(*category) * factor;
        }
        cost += year.total_cost() * factor;
        generation += year.generation * factor;
    }

    DiscountedTotals {
        cost,
        generation,
        costs_by_category,
    }
}
