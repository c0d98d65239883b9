//! Construction of the year-by-year cash flows of a project.
//!
//! Year indices start at zero for the first year of construction. Construction is followed by
//! operation and then by decommissioning, with no gaps in between.
use crate::parameters::ValidatedParameters;
use crate::units::{Dimensionless, Energy, Hours, Money, Year};
use log::debug;
use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

/// The phase of a project's life that a year falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The plant is being built
    Construction,
    /// The plant is generating electricity
    Operation,
    /// The plant is being retired and dismantled
    Decommissioning,
}

/// A category of cost which contributes to the LCOE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    /// Overnight capital cost
    Capital,
    /// Fixed operation and maintenance
    #[strum(serialize = "fixed_om")]
    #[serde(rename = "fixed_om")]
    FixedOM,
    /// Variable operation and maintenance
    #[strum(serialize = "variable_om")]
    #[serde(rename = "variable_om")]
    VariableOM,
    /// Fuel
    Fuel,
    /// Carbon emissions
    Carbon,
    /// Retiring and dismantling the plant
    Decommissioning,
}

/// Outflows and generation for a single year of a project
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowYear {
    /// Years since the start of construction
    pub year: u32,
    /// Which phase of the project this year is in
    pub phase: Phase,
    /// Capital outflow
    pub capital: Money,
    /// Fixed O&M outflow
    pub fixed_om: Money,
    /// Variable O&M outflow
    pub variable_om: Money,
    /// Fuel outflow
    pub fuel: Money,
    /// Carbon outflow
    pub carbon: Money,
    /// Decommissioning outflow
    pub decommissioning: Money,
    /// Electricity generated
    pub generation: Energy,
}

impl CashFlowYear {
    /// A year with no outflows or generation
    fn empty(year: u32, phase: Phase) -> Self {
        Self {
            year,
            phase,
            capital: Money(0.0),
            fixed_om: Money(0.0),
            variable_om: Money(0.0),
            fuel: Money(0.0),
            carbon: Money(0.0),
            decommissioning: Money(0.0),
            generation: Energy(0.0),
        }
    }

    /// The outflow for one category of cost
    pub fn cost(&self, category: CostCategory) -> Money {
        match category {
            CostCategory::Capital => self.capital,
            CostCategory::FixedOM => self.fixed_om,
            CostCategory::VariableOM => self.variable_om,
            CostCategory::Fuel => self.fuel,
            CostCategory::Carbon => self.carbon,
            CostCategory::Decommissioning => self.decommissioning,
        }
    }

    /// The sum of all outflows in this year
    pub fn total_cost(&self) -> Money {
        CostCategory::iter().map(|category| self.cost(category)).sum()
    }
}

/// The cash flows of a project over its whole life, ordered by year
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowSeries {
    years: Vec<CashFlowYear>,
}

impl CashFlowSeries {
    /// Iterate over the years in order
    pub fn iter(&self) -> impl Iterator<Item = &CashFlowYear> {
        self.years.iter()
    }

    /// The number of years covered
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Whether the series covers no years
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Undiscounted sum of all outflows
    pub fn nominal_cost(&self) -> Money {
        self.iter().map(CashFlowYear::total_cost).sum()
    }

    /// Undiscounted sum of generation
    pub fn nominal_generation(&self) -> Energy {
        self.iter().map(|year| year.generation).sum()
    }
}

impl<'a> IntoIterator for &'a CashFlowSeries {
    type Item = &'a CashFlowYear;
    type IntoIter = std::slice::Iter<'a, CashFlowYear>;

    fn into_iter(self) -> Self::IntoIter {
        self.years.iter()
    }
}

/// Get the weight for each construction year, defaulting to an even spread
fn capital_weights(validated: &ValidatedParameters) -> Vec<Dimensionless> {
    let years = validated.params().construction_period_years;
    match &validated.options().capital_spend_profile {
        Some(profile) => profile.clone(),
        None => vec![Dimensionless(1.0 / f64::from(years)); years as usize],
    }
}

/// Lay out the outflows and generation of a project year by year.
pub fn build_cash_flow_series(validated: &ValidatedParameters) -> CashFlowSeries {
    let params = validated.params();
    let options = validated.options();

    let total_capital = params.overnight_capital_cost * params.capacity;
    let mut years: Vec<CashFlowYear> = Vec::with_capacity(validated.total_years() as usize);

    // Construction
    for weight in capital_weights(validated) {
        let mut year = CashFlowYear::empty(next_year(&years), Phase::Construction);
        year.capital = total_capital * weight;
        years.push(year);
    }

    // Operation
    let hours_per_year = Hours(f64::from(options.hours_per_year));
    let generation = params.capacity * params.capacity_factor * hours_per_year;
    let fixed_om = params.fixed_om_cost * params.capacity * Year(1.0);
    let variable_om = params.variable_om_cost * generation;
    let fuel = params.fuel_cost * generation;
    let carbon = params.carbon_cost * generation;
    for i in 0..params.operating_lifetime_years {
        let multiplier = options
            .operating_cost_multipliers
            .as_ref()
            .map_or(Dimensionless(1.0), |multipliers| multipliers[i as usize]);

        let mut year = CashFlowYear::empty(next_year(&years), Phase::Operation);
        year.generation = generation;
        year.fixed_om = fixed_om * multiplier;
        year.variable_om = variable_om * multiplier;
        year.fuel = fuel * multiplier;
        year.carbon = carbon * multiplier;
        years.push(year);
    }

    // Decommissioning
    let decommissioning_years = Dimensionless(f64::from(options.decommissioning_period_years));
    let decommissioning =
        params.decommissioning_cost * params.capacity / decommissioning_years;
    for _ in 0..options.decommissioning_period_years {
        let mut year = CashFlowYear::empty(next_year(&years), Phase::Decommissioning);
        year.decommissioning = decommissioning;
        years.push(year);
    }

    debug!(
        "Built cash flows covering {} years ({} construction, {} operation, {} decommissioning)",
        years.len(),
        params.construction_period_years,
        params.operating_lifetime_years,
        options.decommissioning_period_years
    );

    CashFlowSeries { years }
}

/// The index of the year following the last one in `years`
fn next_year(years: &[CashFlowYear]) -> u32 {
    years.last().map_or(0, |year| year.year + 1)
}
