//! Defines the inputs to an LCOE calculation and the rules for validating them.
use crate::error::{FieldViolation, ValidationError};
use crate::units::{
    Capacity, Dimensionless, MoneyPerCapacity, MoneyPerCapacityPerYear, MoneyPerEnergy,
};
use anyhow::{Result, ensure};
use log::debug;
use serde::{Deserialize, Serialize};

/// The number of hours in a (non-leap) year
pub const HOURS_PER_YEAR: u32 = 8760;

/// The average number of hours in a year, accounting for leap years
pub const HOURS_PER_YEAR_LEAP_AVERAGED: u32 = 8766;

/// The default number of years over which decommissioning costs are spread
pub const DEFAULT_DECOMMISSIONING_PERIOD_YEARS: u32 = 1;

/// The maximum number of years covered by a project's cash flows, from the start of construction
/// to the end of decommissioning
pub const MAX_MODELLED_YEARS: u32 = 1000;

/// How far the weights of a capital spend profile may sum to something other than one
const SPEND_PROFILE_TOLERANCE: f64 = 1e-9;

/// The technology and financial parameters of a generation project.
///
/// Costs are given per unit of capacity or energy. The absolute values in the cash flows are
/// obtained by scaling with [`ProjectParameters::capacity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectParameters {
    /// Annual discount rate
    pub discount_rate: Dimensionless,
    /// Years over which the overnight capital cost is spent
    pub construction_period_years: u32,
    /// Years of electricity production
    pub operating_lifetime_years: u32,
    /// Capital cost before financing
    pub overnight_capital_cost: MoneyPerCapacity,
    /// Operating cost incurred every year of operation, regardless of output
    pub fixed_om_cost: MoneyPerCapacityPerYear,
    /// Operating cost proportional to output
    pub variable_om_cost: MoneyPerEnergy,
    /// Fuel cost, zero for technologies without fuel
    pub fuel_cost: MoneyPerEnergy,
    /// Carbon cost (emissions intensity multiplied by carbon price)
    pub carbon_cost: MoneyPerEnergy,
    /// Cost of retiring and dismantling the plant
    pub decommissioning_cost: MoneyPerCapacity,
    /// Fraction of nameplate capacity generated on average over a year
    pub capacity_factor: Dimensionless,
    /// Nameplate capacity
    pub capacity: Capacity,
}

/// Tunables for how the cash flows of a project are laid out in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculationOptions {
    /// Hours in a year, used to convert capacity into annual generation
    pub hours_per_year: u32,
    /// Years over which decommissioning costs are spread, starting after the last operating year
    pub decommissioning_period_years: u32,
    /// Fraction of the overnight capital cost spent in each construction year.
    ///
    /// If absent, the capital cost is spread evenly over the construction period.
    pub capital_spend_profile: Option<Vec<Dimensionless>>,
    /// A multiplier for each operating year, applied to all operating costs.
    ///
    /// If absent, operating costs are the same every year.
    pub operating_cost_multipliers: Option<Vec<Dimensionless>>,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            hours_per_year: HOURS_PER_YEAR,
            decommissioning_period_years: DEFAULT_DECOMMISSIONING_PERIOD_YEARS,
            capital_spend_profile: None,
            operating_cost_multipliers: None,
        }
    }
}

/// Project parameters and options which have passed validation.
///
/// The only way to obtain one of these is via [`validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedParameters {
    params: ProjectParameters,
    options: CalculationOptions,
}

impl ValidatedParameters {
    /// The validated project parameters
    pub fn params(&self) -> &ProjectParameters {
        &self.params
    }

    /// The validated calculation options
    pub fn options(&self) -> &CalculationOptions {
        &self.options
    }

    /// Total number of years covered by the cash flows
    pub fn total_years(&self) -> u32 {
        self.params.construction_period_years
            + self.params.operating_lifetime_years
            + self.options.decommissioning_period_years
    }
}

/// Check that a value is a finite number no smaller than zero
fn check_non_negative(value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "must be a finite number greater than or equal to zero"
    );

    Ok(())
}

/// Check that a value is a finite number greater than zero
fn check_positive(value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        "must be a finite number greater than zero"
    );

    Ok(())
}

/// Check that a number of years (or hours) is not zero
fn check_nonzero_count(value: u32) -> Result<()> {
    ensure!(value > 0, "cannot be zero");

    Ok(())
}

/// Check that the capacity factor is within (0, 1]
fn check_capacity_factor(value: Dimensionless) -> Result<()> {
    ensure!(
        value > Dimensionless(0.0) && value <= Dimensionless(1.0),
        "must be greater than zero and no greater than one"
    );

    Ok(())
}

/// Check that a per-year sequence has one non-negative entry per year
fn check_per_year_values(values: &[Dimensionless], years: u32) -> Result<()> {
    ensure!(
        values.len() == years as usize,
        "must have one value per year ({years}), but has {}",
        values.len()
    );
    ensure!(
        values.iter().all(|value| value.is_finite() && value.0 >= 0.0),
        "values must be finite numbers greater than or equal to zero"
    );

    Ok(())
}

/// Check that the construction, operation and decommissioning periods fit in the modelled years
fn check_total_years(params: &ProjectParameters, options: &CalculationOptions) -> Result<()> {
    let total = u64::from(params.construction_period_years)
        + u64::from(params.operating_lifetime_years)
        + u64::from(options.decommissioning_period_years);
    ensure!(
        total <= u64::from(MAX_MODELLED_YEARS),
        "construction, operation and decommissioning cover {total} years, but at most \
        {MAX_MODELLED_YEARS} are supported"
    );

    Ok(())
}

/// Check that a capital spend profile matches the construction period and sums to one
fn check_capital_spend_profile(profile: &[Dimensionless], construction_years: u32) -> Result<()> {
    check_per_year_values(profile, construction_years)?;

    let total: Dimensionless = profile.iter().copied().sum();
    ensure!(
        (total.0 - 1.0).abs() <= SPEND_PROFILE_TOLERANCE,
        "weights must sum to one, but sum to {total}"
    );

    Ok(())
}

/// Validate the project parameters and calculation options.
///
/// Every field is checked, so that the returned error lists all problems with the input rather
/// than only the first one found.
pub fn validate(
    params: ProjectParameters,
    options: CalculationOptions,
) -> Result<ValidatedParameters, ValidationError> {
    let p = &params;
    let mut checks = vec![
        ("discount_rate", check_non_negative(p.discount_rate.0)),
        (
            "construction_period_years",
            check_nonzero_count(p.construction_period_years),
        ),
        (
            "overnight_capital_cost",
            check_non_negative(p.overnight_capital_cost.0),
        ),
        ("fixed_om_cost", check_non_negative(p.fixed_om_cost.0)),
        ("variable_om_cost", check_non_negative(p.variable_om_cost.0)),
        ("fuel_cost", check_non_negative(p.fuel_cost.0)),
        ("carbon_cost", check_non_negative(p.carbon_cost.0)),
        (
            "decommissioning_cost",
            check_non_negative(p.decommissioning_cost.0),
        ),
        ("capacity_factor", check_capacity_factor(p.capacity_factor)),
        ("capacity", check_positive(p.capacity.0)),
        ("hours_per_year", check_nonzero_count(options.hours_per_year)),
        (
            "decommissioning_period_years",
            check_nonzero_count(options.decommissioning_period_years),
        ),
        ("total_years", check_total_years(p, &options)),
    ];

    if let Some(profile) = &options.capital_spend_profile {
        checks.push((
            "capital_spend_profile",
            check_capital_spend_profile(profile, p.construction_period_years),
        ));
    }

    if let Some(multipliers) = &options.operating_cost_multipliers {
        checks.push((
            "operating_cost_multipliers",
            check_per_year_values(multipliers, p.operating_lifetime_years),
        ));
    }

    let violations: Vec<_> = checks
        .into_iter()
        .filter_map(|(field, result)| {
            result.err().map(|err| FieldViolation {
                field,
                reason: err.to_string(),
            })
        })
        .collect();

    if !violations.is_empty() {
        debug!("Project parameters failed validation: {violations:?}");
        return Err(ValidationError { violations });
    }

    Ok(ValidatedParameters { params, options })
}
