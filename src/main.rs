//! Provides the main entry point to the program.
use ::log::error;
use ele_cost::cli::run_cli;
use ele_cost::log::is_logger_initialised;
use human_panic::{Metadata, setup_panic};

fn main() {
    setup_panic!(
        Metadata::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
            .homepage(env!("CARGO_PKG_REPOSITORY"))
            .support("- Open an issue on GitHub with a copy of your project file")
    );

    if let Err(err) = run_cli() {
        if is_logger_initialised() {
            error!("{err:?}");
        } else {
            eprintln!("Error: {err:?}");
        }

        std::process::exit(1);
    }
}
