//! Calculation of the Levelised Cost of Electricity (LCOE).
//!
//! The LCOE is the constant price per unit of energy at which the present value of a project's
//! revenue equals the present value of its costs. The methodology follows the IEA/OECD-NEA report
//! *Projected Costs of Generating Electricity* (2020 edition).
use crate::cash_flow::{CashFlowSeries, CostCategory, build_cash_flow_series};
use crate::error::LcoeError;
use crate::finance::{DiscountedTotals, discount};
use crate::parameters::{CalculationOptions, ProjectParameters, ValidatedParameters, validate};
use crate::units::{Dimensionless, Energy, Hours, Money, MoneyPerEnergy};
use indexmap::IndexMap;
use log::debug;

/// Discounted generation, in years of output at full capacity, at or below which the LCOE is
/// considered undefined.
///
/// Measuring generation relative to the plant's full output keeps the threshold independent of
/// the units chosen for capacity.
pub const MIN_DISCOUNTED_FULL_LOAD_YEARS: Dimensionless = Dimensionless(1e-9);

/// The contribution of one category of cost to the LCOE
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostComponent {
    /// Present value of this category's outflows
    pub discounted_cost: Money,
    /// This category's part of the LCOE
    pub lcoe: MoneyPerEnergy,
    /// Fraction of the total discounted cost
    pub share: Dimensionless,
}

/// The outcome of an LCOE calculation
#[derive(Debug, Clone, PartialEq)]
pub struct LcoeResult {
    /// The discount rate the cash flows were discounted with
    pub discount_rate: Dimensionless,
    /// Present value of all costs
    pub total_discounted_cost: Money,
    /// Present value of all generation
    pub total_discounted_generation: Energy,
    /// The levelised cost of electricity
    pub lcoe: MoneyPerEnergy,
    /// Contribution of each category of cost, in a fixed order
    pub breakdown: IndexMap<CostCategory, CostComponent>,
    /// The undiscounted cash flows the result was calculated from
    pub cash_flows: CashFlowSeries,
}

/// Calculate the LCOE for a project.
///
/// The parameters are validated, laid out as yearly cash flows and discounted back to the start of
/// construction. The LCOE is the ratio of total discounted cost to total discounted generation.
///
/// # Returns
///
/// The LCOE with its breakdown by category of cost, or an error if the inputs are invalid, the
/// project generates no (discounted) electricity or the costs are too large to represent.
pub fn compute_lcoe(
    params: ProjectParameters,
    options: CalculationOptions,
) -> Result<LcoeResult, LcoeError> {
    let validated = validate(params, options)?;
    let discount_rate = validated.params().discount_rate;
    let cash_flows = build_cash_flow_series(&validated);
    let totals = discount(&cash_flows, discount_rate);
    check_totals(&validated, &totals)?;

    let lcoe = totals.cost / totals.generation;
    if !lcoe.is_finite() {
        return Err(LcoeError::Overflow {
            quantity: "Levelised cost".into(),
        });
    }

    let breakdown = totals
        .costs_by_category
        .into_iter()
        .map(|(category, discounted_cost)| {
            let share = if totals.cost > Money(0.0) {
                discounted_cost / totals.cost
            } else {
                Dimensionless(0.0)
            };
            let component = CostComponent {
                discounted_cost,
                lcoe: discounted_cost / totals.generation,
                share,
            };
            (category, component)
        })
        .collect();

    debug!("LCOE at a discount rate of {discount_rate}: {lcoe}");

    Ok(LcoeResult {
        discount_rate,
        total_discounted_cost: totals.cost,
        total_discounted_generation: totals.generation,
        lcoe,
        breakdown,
        cash_flows,
    })
}

/// Check that the discounted totals can be turned into a finite LCOE
fn check_totals(
    validated: &ValidatedParameters,
    totals: &DiscountedTotals,
) -> Result<(), LcoeError> {
    if !totals.generation.is_finite() {
        return Err(LcoeError::Overflow {
            quantity: "Total discounted generation".into(),
        });
    }

    let hours_per_year = Hours(f64::from(validated.options().hours_per_year));
    let full_load_years = totals.generation / validated.params().capacity / hours_per_year;
    if full_load_years <= MIN_DISCOUNTED_FULL_LOAD_YEARS {
        return Err(LcoeError::Division {
            generation: totals.generation,
        });
    }

    for (category, cost) in &totals.costs_by_category {
        if !cost.is_finite() {
            return Err(LcoeError::Overflow {
                quantity: format!("Discounted {category} cost"),
            });
        }
    }
    if !totals.cost.is_finite() {
        return Err(LcoeError::Overflow {
            quantity: "Total discounted cost".into(),
        });
    }

    Ok(())
}

/// Calculate the LCOE for a project once for each of several discount rates.
///
/// The discount rate in `params` is ignored. This is useful for sensitivity analysis, e.g. the
/// 3%, 7% and 10% rates used in the IEA/OECD-NEA report.
pub fn compute_lcoe_for_discount_rates(
    params: &ProjectParameters,
    options: &CalculationOptions,
    discount_rates: &[Dimensionless],
) -> Result<Vec<LcoeResult>, LcoeError> {
    discount_rates
        .iter()
        .map(|&discount_rate| {
            let params = ProjectParameters {
                discount_rate,
                ..params.clone()
            };
            compute_lcoe(params, options.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{nuclear_like, options, params};
    use crate::units::{Capacity, MoneyPerCapacity, MoneyPerCapacityPerYear};
    use float_cmp::assert_approx_eq;
    use itertools::Itertools;
    use rstest::rstest;

    #[rstest]
    fn test_compute_lcoe_simple(params: ProjectParameters, options: CalculationOptions) {
        let result = compute_lcoe(params, options).unwrap();
        assert_eq!(result.total_discounted_cost, Money(110.0));
        assert_eq!(result.total_discounted_generation, Energy(8760.0));
        assert_approx_eq!(MoneyPerEnergy, result.lcoe, MoneyPerEnergy(110.0 / 8760.0));
        assert_eq!(result.cash_flows.len(), 3);

        let capital = result.breakdown[&CostCategory::Capital];
        assert_approx_eq!(Dimensionless, capital.share, Dimensionless(100.0 / 110.0));
        assert_approx_eq!(MoneyPerEnergy, capital.lcoe, MoneyPerEnergy(100.0 / 8760.0));
    }

    #[rstest]
    fn test_compute_lcoe_invalid(mut params: ProjectParameters, options: CalculationOptions) {
        params.discount_rate = Dimensionless(-0.01);
        let Err(LcoeError::Validation(error)) = compute_lcoe(params, options) else {
            panic!("Expected a validation error");
        };
        assert!(error.has_field("discount_rate"));
    }

    #[rstest]
    fn test_compute_lcoe_no_operation(mut params: ProjectParameters, options: CalculationOptions) {
        params.operating_lifetime_years = 0;
        assert_eq!(
            compute_lcoe(params, options).unwrap_err(),
            LcoeError::Division {
                generation: Energy(0.0)
            }
        );
    }

    #[rstest]
    fn test_compute_lcoe_negligible_capacity_factor(
        mut params: ProjectParameters,
        options: CalculationOptions,
    ) {
        params.capacity_factor = Dimensionless(1e-300);
        assert!(matches!(
            compute_lcoe(params, options),
            Err(LcoeError::Division { .. })
        ));
    }

    #[rstest]
    fn test_compute_lcoe_tiny_capacity_units(
        params: ProjectParameters,
        options: CalculationOptions,
    ) {
        // Discounted generation is well below 1e-9 in absolute terms, but the plant runs flat out
        let tiny = ProjectParameters {
            capacity: Capacity(1e-13),
            ..params.clone()
        };
        let result = compute_lcoe(tiny, options.clone()).unwrap();
        let expected = compute_lcoe(params, options).unwrap();
        assert_approx_eq!(MoneyPerEnergy, result.lcoe, expected.lcoe, epsilon = 1e-12);
    }

    #[rstest]
    fn test_compute_lcoe_cost_overflow(mut params: ProjectParameters, options: CalculationOptions) {
        params.overnight_capital_cost = MoneyPerCapacity(1e308);
        params.capacity = Capacity(10.0);
        assert_eq!(
            compute_lcoe(params, options).unwrap_err(),
            LcoeError::Overflow {
                quantity: "Discounted capital cost".into()
            }
        );
    }

    #[rstest]
    fn test_compute_lcoe_cost_overflow_with_spend_profile(
        mut params: ProjectParameters,
        mut options: CalculationOptions,
    ) {
        // The overflowed capital cost times a zero weight is NaN rather than infinity
        params.overnight_capital_cost = MoneyPerCapacity(1e308);
        params.capacity = Capacity(10.0);
        params.construction_period_years = 2;
        options.capital_spend_profile = Some(vec![Dimensionless(0.0), Dimensionless(1.0)]);
        let error = compute_lcoe(params, options).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Discounted capital cost is not a finite number, so a levelised cost cannot be \
            calculated"
        );
    }

    #[rstest]
    fn test_compute_lcoe_levelised_cost_overflow(
        mut params: ProjectParameters,
        options: CalculationOptions,
    ) {
        // Costs and generation are finite, but their ratio is not
        params.overnight_capital_cost = MoneyPerCapacity(1e305);
        params.capacity_factor = Dimensionless(1e-8);
        assert_eq!(
            compute_lcoe(params, options).unwrap_err(),
            LcoeError::Overflow {
                quantity: "Levelised cost".into()
            }
        );
    }

    #[rstest]
    fn test_compute_lcoe_no_costs(mut params: ProjectParameters, options: CalculationOptions) {
        params.overnight_capital_cost = MoneyPerCapacity(0.0);
        params.fixed_om_cost = MoneyPerCapacityPerYear(0.0);
        let result = compute_lcoe(params, options).unwrap();
        assert_eq!(result.lcoe, MoneyPerEnergy(0.0));
        assert!(
            result
                .breakdown
                .values()
                .all(|component| component.share == Dimensionless(0.0))
        );
    }

    #[rstest]
    fn test_breakdown_sums_to_lcoe(nuclear_like: (ProjectParameters, CalculationOptions)) {
        let (params, options) = nuclear_like;
        let result = compute_lcoe(params, options).unwrap();

        assert_eq!(
            result.breakdown.keys().copied().collect_vec(),
            [
                CostCategory::Capital,
                CostCategory::FixedOM,
                CostCategory::VariableOM,
                CostCategory::Fuel,
                CostCategory::Carbon,
                CostCategory::Decommissioning
            ]
        );

        let cost: Money = result.breakdown.values().map(|c| c.discounted_cost).sum();
        let tolerance = result.total_discounted_cost * Dimensionless(1e-9);
        assert!((cost - result.total_discounted_cost).abs() <= tolerance);

        let lcoe: MoneyPerEnergy = result.breakdown.values().map(|c| c.lcoe).sum();
        assert_approx_eq!(MoneyPerEnergy, lcoe, result.lcoe, epsilon = 1e-9);

        let share: Dimensionless = result.breakdown.values().map(|c| c.share).sum();
        assert_approx_eq!(Dimensionless, share, Dimensionless(1.0), epsilon = 1e-9);
    }

    #[rstest]
    fn test_nuclear_lcoe(nuclear_like: (ProjectParameters, CalculationOptions)) {
        // Median new nuclear plant at a 7% discount rate. The breakdown is dominated by capital.
        let (params, options) = nuclear_like;
        let result = compute_lcoe(params, options).unwrap();
        assert!(result.lcoe > MoneyPerEnergy(60.0) && result.lcoe < MoneyPerEnergy(120.0));
        assert!(result.breakdown[&CostCategory::Capital].share > Dimensionless(0.5));
    }

    #[rstest]
    fn test_compute_lcoe_for_discount_rates(params: ProjectParameters, options: CalculationOptions) {
        let rates = [Dimensionless(0.0), Dimensionless(0.03), Dimensionless(0.1)];
        let results = compute_lcoe_for_discount_rates(&params, &options, &rates).unwrap();
        assert_eq!(
            results.iter().map(|r| r.discount_rate).collect_vec(),
            rates
        );

        // Capital is spent before generation starts, so a higher rate means a higher LCOE
        assert!(
            results
                .iter()
                .tuple_windows()
                .all(|(a, b)| a.lcoe < b.lcoe)
        );
    }

    #[rstest]
    fn test_lcoe_independent_of_capacity(
        params: ProjectParameters,
        options: CalculationOptions,
    ) {
        // LCOE is a per-unit-energy figure so it shouldn't depend on plant size
        let small = compute_lcoe(params.clone(), options.clone()).unwrap();
        let large = compute_lcoe(
            ProjectParameters {
                capacity: Capacity(1000.0),
                ..params
            },
            options,
        )
        .unwrap();
        assert_approx_eq!(MoneyPerEnergy, small.lcoe, large.lcoe, epsilon = 1e-12);
    }
}
