//! Code related to the bundled demo projects and the CLI commands for interacting with them.
use super::{RunOpts, handle_run_command};
use crate::input::PROJECT_FILE_NAME;
use crate::settings::Settings;
use anyhow::{Context, Result, bail, ensure};
use clap::Subcommand;
use include_dir::{Dir, DirEntry, include_dir};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The directory containing the demo projects.
const DEMOS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/demos");

/// The name of the file describing each demo project
const README_FILE_NAME: &str = "README.txt";

/// The available subcommands for managing example projects.
#[derive(Subcommand)]
pub enum ExampleSubcommands {
    /// List available examples.
    List,
    /// Provide information about the specified example.
    Info {
        /// The name of the example.
        name: String,
    },
    /// Extract an example project to a new directory.
    Extract {
        /// The name of the example to extract.
        name: String,
        /// The destination folder for the example.
        new_path: Option<PathBuf>,
    },
    /// Calculate the LCOE of an example project.
    Run {
        /// The name of the example to run.
        name: String,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
}

impl ExampleSubcommands {
    /// Execute the supplied example subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::List => handle_example_list_command(),
            Self::Info { name } => handle_example_info_command(&name)?,
            Self::Extract {
                name,
                new_path: dest,
            } => handle_example_extract_command(&name, dest.as_deref())?,
            Self::Run { name, opts } => handle_example_run_command(&name, &opts, None)?,
        }

        Ok(())
    }
}

/// The names of all bundled examples, in alphabetical order
pub fn example_names() -> Vec<String> {
    let mut names: Vec<_> = DEMOS_DIR
        .dirs()
        .map(|dir| dir.path().display().to_string())
        .collect();
    names.sort();

    names
}

/// Handle the `example list` command.
fn handle_example_list_command() {
    for name in example_names() {
        println!("{name}");
    }
}

/// Get the contents of an example's README file
fn example_readme(name: &str) -> Result<&'static str> {
    let path: PathBuf = [name, README_FILE_NAME].iter().collect();
    DEMOS_DIR
        .get_file(path)
        .context("Example not found.")?
        .contents_utf8()
        .context("README.txt is not UTF-8 encoded")
}

/// Handle the `example info` command.
fn handle_example_info_command(name: &str) -> Result<()> {
    println!("{}", example_readme(name)?);

    Ok(())
}

/// Handle the `example extract` command
fn handle_example_extract_command(name: &str, dest: Option<&Path>) -> Result<()> {
    let dest = dest.unwrap_or(Path::new(name));
    extract_example(name, dest)
}

/// Extract the specified example to a new directory
pub fn extract_example(name: &str, new_path: &Path) -> Result<()> {
    let sub_dir = DEMOS_DIR.get_dir(name).context("Example not found.")?;
    ensure!(
        sub_dir.get_file(sub_dir.path().join(PROJECT_FILE_NAME)).is_some(),
        "Example {name} has no {PROJECT_FILE_NAME}"
    );

    ensure!(
        !new_path.exists(),
        "Destination directory {} already exists",
        new_path.display()
    );

    // Copy the contents of the subdirectory to the destination
    fs::create_dir(new_path)?;
    for entry in sub_dir.entries() {
        match entry {
            DirEntry::Dir(d) => bail!(
                "Subdirectories in examples are not supported: {}",
                d.path().display()
            ),
            DirEntry::File(f) => {
                let file_name = f
                    .path()
                    .file_name()
                    .context("Invalid file name in example")?;
                fs::write(new_path.join(file_name), f.contents())?;
            }
        }
    }

    Ok(())
}

/// Handle the `example run` command.
///
/// The example is extracted to a temporary directory with the same name as the example, so that
/// the default output folder is named after it.
pub fn handle_example_run_command(
    name: &str,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let temp_dir = TempDir::new().context("Failed to create temporary directory.")?;
    let project_path = temp_dir.path().join(name);
    extract_example(name, &project_path)?;
    handle_run_command(&project_path, opts, settings)
}
