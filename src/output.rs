//! The module responsible for writing output data to disk.
use crate::cash_flow::{CostCategory, Phase};
use crate::finance::discount_factor;
use crate::lcoe::LcoeResult;
use crate::units::{Dimensionless, Energy, Money, MoneyPerEnergy};
use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The root folder in which project-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "ele_cost_results";

/// The output file name for the headline LCOE figures
const SUMMARY_FILE_NAME: &str = "summary.csv";

/// The output file name for the breakdown of costs by category
const COST_BREAKDOWN_FILE_NAME: &str = "cost_breakdown.csv";

/// The output file name for the yearly cash flows
const CASH_FLOWS_FILE_NAME: &str = "cash_flows.csv";

/// Get the default output directory for the project in the specified directory
pub fn get_output_dir(project_dir: &Path) -> Result<PathBuf> {
    // Get the project name from the dir path
    let project_dir = project_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to project")?;

    let project_name = project_dir
        .file_name()
        .context("Project cannot be in root folder")?
        .to_str()
        .context("Invalid chars in project dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, project_name].iter().collect())
}

/// Create a new output directory, if it doesn't already exist.
///
/// If the directory exists and is non-empty, it will only be used if `allow_overwrite` is true.
///
/// # Returns
///
/// True if existing output files may be overwritten, false otherwise.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    if output_dir.is_dir() {
        let is_empty = output_dir.read_dir()?.next().is_none();
        if is_empty {
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Use the --overwrite option to \
            overwrite its contents."
        );

        return Ok(true);
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(false)
}

/// Represents a row in the summary output CSV file
#[derive(Serialize, Debug, PartialEq)]
struct SummaryRow {
    discount_rate: Dimensionless,
    lcoe: MoneyPerEnergy,
    total_discounted_cost: Money,
    total_discounted_generation: Energy,
}

/// Represents a row in the cost breakdown output CSV file
#[derive(Serialize, Debug, PartialEq)]
struct CostBreakdownRow {
    discount_rate: Dimensionless,
    category: CostCategory,
    discounted_cost: Money,
    lcoe_component: MoneyPerEnergy,
    share: Dimensionless,
}

/// Represents a row in the cash flows output CSV file
#[derive(Serialize, Debug, PartialEq)]
struct CashFlowRow {
    discount_rate: Dimensionless,
    year: u32,
    phase: Phase,
    capital: Money,
    fixed_om: Money,
    variable_om: Money,
    fuel: Money,
    carbon: Money,
    decommissioning: Money,
    generation: Energy,
    discount_factor: Dimensionless,
}

/// An object for writing LCOE results to CSV files
pub struct DataWriter {
    summary_writer: csv::Writer<File>,
    cost_breakdown_writer: csv::Writer<File>,
    cash_flows_writer: Option<csv::Writer<File>>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `write_cash_flows` - Whether to also write the yearly cash flows
    pub fn create(output_path: &Path, write_cash_flows: bool) -> Result<Self> {
        let new_writer = |file_name: &str| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(&file_path)
                .with_context(|| format!("Failed to create file: {}", file_path.display()))
        };

        Ok(Self {
            summary_writer: new_writer(SUMMARY_FILE_NAME)?,
            cost_breakdown_writer: new_writer(COST_BREAKDOWN_FILE_NAME)?,
            cash_flows_writer: if write_cash_flows {
                Some(new_writer(CASH_FLOWS_FILE_NAME)?)
            } else {
                None
            },
        })
    }

    /// Write the results of one LCOE calculation
    pub fn write_result(&mut self, result: &LcoeResult) -> Result<()> {
        let discount_rate = result.discount_rate;
        self.summary_writer.serialize(SummaryRow {
            discount_rate,
            lcoe: result.lcoe,
            total_discounted_cost: result.total_discounted_cost,
            total_discounted_generation: result.total_discounted_generation,
        })?;

        for (category, component) in &result.breakdown {
            self.cost_breakdown_writer.serialize(CostBreakdownRow {
                discount_rate,
                category: *category,
                discounted_cost: component.discounted_cost,
                lcoe_component: component.lcoe,
                share: component.share,
            })?;
        }

        if let Some(wtr) = &mut self.cash_flows_writer {
            for year in &result.cash_flows {
                wtr.serialize(CashFlowRow {
                    discount_rate,
                    year: year.year,
                    phase: year.phase,
                    capital: year.capital,
                    fixed_om: year.fixed_om,
                    variable_om: year.variable_om,
                    fuel: year.fuel,
                    carbon: year.carbon,
                    decommissioning: year.decommissioning,
                    generation: year.generation,
                    discount_factor: discount_factor(year.year, discount_rate),
                })?;
            }
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.summary_writer.flush()?;
        self.cost_breakdown_writer.flush()?;
        if let Some(wtr) = &mut self.cash_flows_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}
