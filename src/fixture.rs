//! Fixtures for tests
use crate::parameters::{CalculationOptions, ProjectParameters, ValidatedParameters, validate};
use crate::units::{
    Capacity, Dimensionless, MoneyPerCapacity, MoneyPerCapacityPerYear, MoneyPerEnergy,
};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// A one-year build, one-year operation plant with only capital and fixed O&M costs
#[fixture]
pub fn params() -> ProjectParameters {
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

#[fixture]
pub fn options() -> CalculationOptions {
    CalculationOptions::default()
}

#[fixture]
pub fn validated(params: ProjectParameters, options: CalculationOptions) -> ValidatedParameters {
    validate(params, options).unwrap()
}

/// Roughly the median new nuclear plant from the IEA/OECD-NEA 2020 report
#[fixture]
pub fn nuclear_like() -> (ProjectParameters, CalculationOptions) {
    let params = ProjectParameters {
        discount_rate: Dimensionless(0.07),
        construction_period_years: 7,
        operating_lifetime_years: 60,
        overnight_capital_cost: MoneyPerCapacity(3_875_500.0),
        fixed_om_cost: MoneyPerCapacityPerYear(0.0),
        variable_om_cost: MoneyPerEnergy(11.6),
        fuel_cost: MoneyPerEnergy(9.33),
        carbon_cost: MoneyPerEnergy(0.0),
        decommissioning_cost: MoneyPerCapacity(505_500.0),
        capacity_factor: Dimensionless(0.8),
        capacity: Capacity(1137.0),
    };
    let options = CalculationOptions {
        decommissioning_period_years: 10,
        ..CalculationOptions::default()
    };

    (params, options)
}
