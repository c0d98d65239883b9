//! Calculation of the levelised cost of electricity (LCOE) of generation projects.
//!
//! The entry point for the calculation is [`lcoe::compute_lcoe`], which takes a project's
//! parameters and returns the LCOE along with its breakdown by category of cost.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cash_flow;
pub mod cli;
pub mod error;
pub mod finance;
pub mod input;
pub mod lcoe;
pub mod log;
pub mod output;
pub mod parameters;
pub mod settings;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the config dir for the program.
///
/// This is the directory in which the settings file is stored.
pub fn get_ele_cost_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        panic!("Could not get path to config dir");
    };
    config_dir.push("ele-cost");

    config_dir
}
