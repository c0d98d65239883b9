//! Integration tests for the `example run` command.
use ele_cost::cli::RunOpts;
use ele_cost::cli::example::handle_example_run_command;
use ele_cost::settings::Settings;
use tempfile::tempdir;

/// An integration test for the `example run` command.
#[test]
fn test_handle_example_run_command() {
    unsafe { std::env::set_var("ELE_COST_LOG_LEVEL", "off") };

    let tempdir = tempdir().unwrap();
    let opts = RunOpts {
        output_dir: Some(tempdir.path().to_path_buf()),
        ..RunOpts::default()
    };
    handle_example_run_command("onshore_wind", &opts, Some(Settings::default())).unwrap();
    assert!(tempdir.path().join("cost_breakdown.csv").is_file());
    assert!(!tempdir.path().join("cash_flows.csv").exists());
}
