//! The command line interface for the program.
use crate::input::{Project, load_project};
use crate::lcoe::{LcoeResult, compute_lcoe, compute_lcoe_for_discount_rates};
use crate::log;
use crate::output::{DataWriter, create_output_directory, get_output_dir};
use crate::settings::Settings;
use crate::units::Dimensionless;
use ::log::{debug, info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use itertools::Itertools;
use std::fmt::Write;
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the program.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Whether to write the yearly cash flows to a CSV file
    #[arg(long)]
    pub write_cash_flows: bool,
    /// Discount rates to calculate the LCOE for, instead of the one in the project file
    #[arg(long = "discount-rate", value_delimiter = ',')]
    pub discount_rates: Vec<f64>,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Calculate the LCOE of a project.
    Run {
        /// Path to the project directory.
        project_dir: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Validate a project file.
    Validate {
        /// Path to the project directory.
        project_dir: PathBuf,
    },
    /// Compare the LCOE of several projects.
    Compare {
        /// Paths to the project directories.
        #[arg(required = true)]
        project_dirs: Vec<PathBuf>,
        /// Use this discount rate for every project, instead of the ones in the project files
        #[arg(long)]
        discount_rate: Option<f64>,
    },
    /// Manage example projects.
    Example {
        /// The available subcommands for managing example projects.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Manage program settings.
    Settings {
        /// The subcommands for managing the settings file
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { project_dir, opts } => handle_run_command(&project_dir, &opts, None),
            Self::Validate { project_dir } => handle_validate_command(&project_dir, None),
            Self::Compare {
                project_dirs,
                discount_rate,
            } => handle_compare_command(&project_dirs, discount_rate, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ ele-cost --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Handle the `run` command.
pub fn handle_run_command(
    project_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let mut settings = load_settings(settings)?;

    // These settings can be overridden by command-line arguments
    if opts.overwrite {
        settings.overwrite = true;
    }
    if opts.write_cash_flows {
        settings.write_cash_flows = true;
    }

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(project_path)?;
        &pathbuf
    };

    let overwrite =
        create_output_directory(output_path, settings.overwrite).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    log::init(Some(settings.log_level.as_str()), Some(output_path))
        .context("Failed to initialise logging.")?;

    let project = load_project(project_path).context("Failed to load project.")?;
    info!("Loaded project '{}' from {}", project.name, project_path.display());
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    let discount_rates = if opts.discount_rates.is_empty() {
        vec![project.params.discount_rate]
    } else {
        opts.discount_rates.iter().copied().map(Dimensionless).collect()
    };
    let results =
        compute_lcoe_for_discount_rates(&project.params, &project.options, &discount_rates)
            .context("Failed to calculate LCOE.")?;

    let mut writer = DataWriter::create(output_path, settings.write_cash_flows)?;
    for result in &results {
        log_result(result);
        writer.write_result(result)?;
    }
    writer.flush()?;
    info!("Calculation complete!");

    Ok(())
}

/// Describe the LCOE at one discount rate.
///
/// Project files don't fix the units of money or energy, so none are shown.
fn describe_lcoe(result: &LcoeResult) -> String {
    format!(
        "LCOE with a discount rate of {:.1}%: {:.2} per unit of energy",
        result.discount_rate.0 * 100.0,
        result.lcoe
    )
}

/// Log the LCOE and its breakdown
fn log_result(result: &LcoeResult) {
    info!("{}", describe_lcoe(result));
    for (category, component) in &result.breakdown {
        debug!(
            "  {category}: {:.2} ({:.1}%)",
            component.lcoe,
            component.share.0 * 100.0
        );
    }
}

/// Handle the `validate` command.
pub fn handle_validate_command(project_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(Some(settings.log_level.as_str()), None).context("Failed to initialise logging.")?;

    load_project(project_path).context("Failed to validate project.")?;
    info!("Project validation successful!");

    Ok(())
}

/// Handle the `compare` command.
pub fn handle_compare_command(
    project_paths: &[PathBuf],
    discount_rate: Option<f64>,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;
    log::init(Some(settings.log_level.as_str()), None).context("Failed to initialise logging.")?;

    let results = compare_projects(project_paths, discount_rate.map(Dimensionless))?;
    print!("{}", format_comparison_table(&results));

    Ok(())
}

/// Load and calculate the LCOE of each project, optionally with a common discount rate
pub fn compare_projects(
    project_paths: &[PathBuf],
    discount_rate: Option<Dimensionless>,
) -> Result<Vec<(Project, LcoeResult)>> {
    project_paths
        .iter()
        .map(|path| -> Result<_> {
            let project = load_project(path)
                .with_context(|| format!("Failed to load project: {}", path.display()))?;
            let mut params = project.params.clone();
            if let Some(discount_rate) = discount_rate {
                params.discount_rate = discount_rate;
            }

            let result = compute_lcoe(params, project.options.clone())
                .with_context(|| format!("Failed to calculate LCOE for '{}'", project.name))?;
            Ok((project, result))
        })
        .try_collect()
}

/// Format the results of several projects as a plain-text table.
///
/// Each row shows the project, its discount rate and LCOE, followed by the share of each
/// category of cost.
pub fn format_comparison_table(results: &[(Project, LcoeResult)]) -> String {
    let Some((_, first)) = results.first() else {
        return String::new();
    };

    let name_width = results
        .iter()
        .map(|(project, _)| project.name.len())
        .chain(std::iter::once("project".len()))
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    let category_headers = first
        .breakdown
        .keys()
        .map(|category| format!("{category:>16}"))
        .join("");
    writeln!(
        &mut out,
        "{:<name_width$} {:>13} {:>10}{category_headers}",
        "project", "discount_rate", "lcoe"
    )
    .unwrap();

    for (project, result) in results {
        let shares = result
            .breakdown
            .values()
            .map(|component| format!("{:>15.1}%", component.share.0 * 100.0))
            .join("");
        writeln!(
            &mut out,
            "{:<name_width$} {:>12.1}% {:>10.2}{shares}",
            project.name,
            result.discount_rate.0 * 100.0,
            result.lcoe
        )
        .unwrap();
    }

    out
}
