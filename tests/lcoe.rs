//! Integration tests for the LCOE calculation through the public API.
use ele_cost::cash_flow::CostCategory;
use ele_cost::error::LcoeError;
use ele_cost::lcoe::{compute_lcoe, compute_lcoe_for_discount_rates};
use ele_cost::parameters::{
    CalculationOptions, HOURS_PER_YEAR_LEAP_AVERAGED, ProjectParameters,
};
use ele_cost::units::{
    Capacity, Dimensionless, Money, MoneyPerCapacity, MoneyPerCapacityPerYear, MoneyPerEnergy,
};
use float_cmp::assert_approx_eq;
use rstest::{fixture, rstest};
use strum::IntoEnumIterator;

/// A one-year build, one-year operation plant with only capital and fixed O&M costs
#[fixture]
fn params() -> ProjectParameters {
    ProjectParameters {
        discount_rate: Dimensionless(0.0),
        construction_period_years: 1,
        operating_lifetime_years: 1,
        overnight_capital_cost: MoneyPerCapacity(100.0),
        fixed_om_cost: MoneyPerCapacityPerYear(10.0),
        variable_om_cost: MoneyPerEnergy(0.0),
        fuel_cost: MoneyPerEnergy(0.0),
        carbon_cost: MoneyPerEnergy(0.0),
        decommissioning_cost: MoneyPerCapacity(0.0),
        capacity_factor: Dimensionless(1.0),
        capacity: Capacity(1.0),
    }
}

#[rstest]
#[case(0.0, 110.0 / 8760.0)]
// Capital in year 0 is undiscounted; O&M and generation both fall in year 1
#[case(0.1, 120.0 / 8760.0)]
fn test_simple_plant(mut params: ProjectParameters, #[case] rate: f64, #[case] expected: f64) {
    params.discount_rate = Dimensionless(rate);
    let result = compute_lcoe(params, CalculationOptions::default()).unwrap();
    assert_approx_eq!(f64, result.lcoe.value(), expected, epsilon = 1e-12);
}

#[rstest]
fn test_invalid_parameters_are_all_reported(mut params: ProjectParameters) {
    params.discount_rate = Dimensionless(-0.01);
    params.capacity = Capacity(0.0);
    let Err(LcoeError::Validation(err)) = compute_lcoe(params, CalculationOptions::default())
    else {
        panic!("Expected a validation error");
    };
    assert!(err.has_field("discount_rate"));
    assert!(err.has_field("capacity"));
    assert_eq!(err.violations.len(), 2);
}

#[rstest]
fn test_no_generation_is_a_division_error(mut params: ProjectParameters) {
    params.operating_lifetime_years = 0;
    assert!(matches!(
        compute_lcoe(params, CalculationOptions::default()),
        Err(LcoeError::Division { .. })
    ));
}

#[rstest]
fn test_breakdown_adds_up(mut params: ProjectParameters) {
    params.discount_rate = Dimensionless(0.05);
    params.construction_period_years = 3;
    params.operating_lifetime_years = 25;
    params.variable_om_cost = MoneyPerEnergy(2.0);
    params.fuel_cost = MoneyPerEnergy(20.0);
    params.carbon_cost = MoneyPerEnergy(5.0);
    params.decommissioning_cost = MoneyPerCapacity(15.0);
    params.capacity_factor = Dimensionless(0.6);

    let result = compute_lcoe(params, CalculationOptions::default()).unwrap();
    assert!(CostCategory::iter().eq(result.breakdown.keys().copied()));

    let lcoe_sum: f64 = result.breakdown.values().map(|c| c.lcoe.value()).sum();
    let share_sum: f64 = result.breakdown.values().map(|c| c.share.value()).sum();
    assert_approx_eq!(f64, lcoe_sum, result.lcoe.value(), epsilon = 1e-9);
    assert_approx_eq!(f64, share_sum, 1.0, epsilon = 1e-9);
}

#[rstest]
fn test_lcoe_rises_with_discount_rate(mut params: ProjectParameters) {
    params.construction_period_years = 5;
    params.operating_lifetime_years = 40;

    let rates = [0.0, 0.03, 0.07, 0.1].map(Dimensionless);
    let results =
        compute_lcoe_for_discount_rates(&params, &CalculationOptions::default(), &rates).unwrap();
    assert_eq!(results.len(), rates.len());
    assert!(results.windows(2).all(|w| w[0].lcoe < w[1].lcoe));
}

#[rstest]
fn test_leap_averaged_year(params: ProjectParameters) {
    let options = CalculationOptions {
        hours_per_year: HOURS_PER_YEAR_LEAP_AVERAGED,
        ..CalculationOptions::default()
    };
    let result = compute_lcoe(params, options).unwrap();
    assert_approx_eq!(f64, result.lcoe.value(), 110.0 / 8766.0, epsilon = 1e-12);
}

#[rstest]
fn test_zero_discount_rate_is_nominal_ratio(mut params: ProjectParameters) {
    params.construction_period_years = 4;
    params.operating_lifetime_years = 30;
    params.overnight_capital_cost = MoneyPerCapacity(4500.0);
    params.fixed_om_cost = MoneyPerCapacityPerYear(95.0);
    params.variable_om_cost = MoneyPerEnergy(2.3);
    params.fuel_cost = MoneyPerEnergy(9.33);
    params.carbon_cost = MoneyPerEnergy(1.7);
    params.decommissioning_cost = MoneyPerCapacity(675.0);
    params.capacity_factor = Dimensionless(0.83);
    params.capacity = Capacity(1137.0);
    let options = CalculationOptions {
        decommissioning_period_years: 7,
        capital_spend_profile: Some([0.1, 0.3, 0.4, 0.2].map(Dimensionless).to_vec()),
        operating_cost_multipliers: Some(
            (0..30)
                .map(|year| Dimensionless(1.02_f64.powi(year)))
                .collect(),
        ),
        ..CalculationOptions::default()
    };

    let result = compute_lcoe(params, options).unwrap();
    let series = &result.cash_flows;
    assert_eq!(series.len(), 41);
    assert_eq!(result.total_discounted_cost, series.nominal_cost());
    assert_eq!(result.total_discounted_generation, series.nominal_generation());
    assert_eq!(
        result.lcoe,
        series.nominal_cost() / series.nominal_generation()
    );

    for (category, component) in &result.breakdown {
        let nominal_cost: Money = series.iter().map(|year| year.cost(*category)).sum();
        assert!(nominal_cost > Money(0.0), "No {category} cost");
        assert_eq!(component.discounted_cost, nominal_cost);
        assert_eq!(component.lcoe, nominal_cost / series.nominal_generation());
    }
}
