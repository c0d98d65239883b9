//! Code for reading project files.
//!
//! A project file describes a generation project in the terms an analyst would usually have to
//! hand (e.g. an overnight cost plus a contingency, a carbon price and an emissions intensity).
//! These are converted into the [`ProjectParameters`] used by the LCOE engine.
use super::{input_err_msg, read_toml};
use crate::parameters::{CalculationOptions, ProjectParameters, validate};
use crate::units::{
    Capacity, Dimensionless, EmissionsPerEnergy, MoneyPerCapacity, MoneyPerCapacityPerYear,
    MoneyPerEmissions, MoneyPerEnergy,
};
use anyhow::{Context, Result, ensure};
use log::debug;
use serde::Deserialize;
use std::path::Path;

/// The name of the project file within a project directory
pub const PROJECT_FILE_NAME: &str = "project.toml";

/// Represents the contents of a `project.toml` file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectFile {
    /// Name of the project. Defaults to the name of the project directory.
    pub name: Option<String>,
    /// Free-text description of the project
    #[serde(default)]
    pub description: String,
    /// Annual discount rate
    pub discount_rate: Dimensionless,
    /// Nameplate capacity
    pub capacity: Capacity,
    /// Fraction of nameplate capacity generated on average
    pub capacity_factor: Dimensionless,
    /// Years over which the plant is built
    pub construction_period_years: u32,
    /// Years over which the plant generates electricity
    pub operating_lifetime_years: u32,
    /// Overnight capital cost, excluding contingency
    pub overnight_cost: MoneyPerCapacity,
    /// Contingency added on top of the overnight cost, as a fraction of it
    #[serde(default)]
    pub capital_cost_contingency: Dimensionless,
    /// Decommissioning cost, as a fraction of the overnight cost excluding contingency
    #[serde(default)]
    pub decommissioning_cost_factor: Dimensionless,
    /// Fixed operation and maintenance cost
    #[serde(default)]
    pub fixed_om_cost: MoneyPerCapacityPerYear,
    /// Variable operation and maintenance cost
    #[serde(default)]
    pub variable_om_cost: MoneyPerEnergy,
    /// Fuel cost
    #[serde(default)]
    pub fuel_cost: MoneyPerEnergy,
    /// Price of carbon emissions
    #[serde(default)]
    pub carbon_price: MoneyPerEmissions,
    /// Emissions per unit of electricity generated
    #[serde(default)]
    pub carbon_intensity: EmissionsPerEnergy,
    /// Options controlling how the cash flows are laid out
    #[serde(default)]
    pub options: CalculationOptions,
}

/// A project ready to be passed to the LCOE engine
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    /// Name of the project
    pub name: String,
    /// Free-text description of the project
    pub description: String,
    /// Parameters for the LCOE engine
    pub params: ProjectParameters,
    /// Options for the LCOE engine
    pub options: CalculationOptions,
}

/// Check that a fraction given in the project file is a finite, non-negative number
fn check_fraction(value: Dimensionless, name: &str) -> Result<()> {
    ensure!(
        value.is_finite() && value >= Dimensionless(0.0),
        "{name} must be a finite number greater than or equal to zero"
    );

    Ok(())
}

impl ProjectFile {
    /// Check the fields which only exist in the project file.
    ///
    /// Fields which are passed through to the engine are validated by the engine.
    fn validate(&self) -> Result<()> {
        check_fraction(self.capital_cost_contingency, "capital_cost_contingency")?;
        check_fraction(
            self.decommissioning_cost_factor,
            "decommissioning_cost_factor",
        )?;
        ensure!(
            self.carbon_price.is_finite() && self.carbon_price >= MoneyPerEmissions(0.0),
            "carbon_price must be a finite number greater than or equal to zero"
        );
        ensure!(
            self.carbon_intensity.is_finite() && self.carbon_intensity >= EmissionsPerEnergy(0.0),
            "carbon_intensity must be a finite number greater than or equal to zero"
        );

        Ok(())
    }

    /// Convert into parameters for the LCOE engine
    pub fn to_parameters(&self) -> ProjectParameters {
        let contingency = Dimensionless(1.0) + self.capital_cost_contingency;
        ProjectParameters {
            discount_rate: self.discount_rate,
            construction_period_years: self.construction_period_years,
            operating_lifetime_years: self.operating_lifetime_years,
            overnight_capital_cost: self.overnight_cost * contingency,
            fixed_om_cost: self.fixed_om_cost,
            variable_om_cost: self.variable_om_cost,
            fuel_cost: self.fuel_cost,
            carbon_cost: self.carbon_price * self.carbon_intensity,
            decommissioning_cost: self.overnight_cost * self.decommissioning_cost_factor,
            capacity_factor: self.capacity_factor,
            capacity: self.capacity,
        }
    }
}

/// Read and validate a project from the specified directory.
///
/// # Arguments
///
/// * `project_dir` - Folder containing the project file
///
/// # Returns
///
/// The project, or an error if the file is missing or any value in it is invalid
pub fn load_project<P: AsRef<Path>>(project_dir: P) -> Result<Project> {
    let project_dir = project_dir.as_ref();
    let file_path = project_dir.join(PROJECT_FILE_NAME);
    let project_file: ProjectFile = read_toml(&file_path)?;
    project_file
        .validate()
        .with_context(|| input_err_msg(&file_path))?;

    let params = project_file.to_parameters();
    let options = project_file.options.clone();
    validate(params.clone(), options.clone()).with_context(|| input_err_msg(&file_path))?;

    let name = match project_file.name {
        Some(name) => name,
        None => project_dir
            .canonicalize()
            .context("Could not resolve path to project")?
            .file_name()
            .context("Project cannot be in root folder")?
            .to_string_lossy()
            .into_owned(),
    };
    debug!("Loaded project '{name}' from {}", file_path.display());

    Ok(Project {
        name,
        description: project_file.description,
        params,
        options,
    })
}
