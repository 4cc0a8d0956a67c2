//! Tests for CLI argument parsing functionality
//!
//! These tests verify that command line arguments are parsed, merged over a
//! configuration file, and converted into a run configuration.

use clap::Parser;
use std::io::Write;
use tempfile::NamedTempFile;
use trajectory_loader::types::config::{CliArgs, ConfigError, SimulationConfig};
use trajectory_loader::types::RecordSchema;

fn parse(args: &[&str]) -> CliArgs {
    let mut argv = vec!["trajectory-loader"];
    argv.extend_from_slice(args);
    CliArgs::try_parse_from(argv).unwrap()
}

/// Test the documented defaults when no flags are given
#[test]
fn test_defaults_without_flags() {
    let config = SimulationConfig::from_cli_args(parse(&[])).unwrap();

    assert_eq!(config.end_time - config.start_time, 24 * 60 * 60);
    assert!((chrono::Utc::now().timestamp() - config.end_time).abs() <= 5);
    assert_eq!(config.items_concurrent, 10);
    assert_eq!((config.item_min_time, config.item_max_time), (60, 7_200));
    assert_eq!((config.item_min_speed, config.item_max_speed), (400.0, 700.0));
    assert_eq!(config.path_resolution, 10);
    assert_eq!(config.elastic, "localhost:9200");
    assert_eq!(config.backend_url(), "http://localhost:9200");
    assert!(!config.clean);
    assert_eq!(config.index, "items");
    assert_eq!(config.schema, RecordSchema::Tagged);
    config.validate().unwrap();
}

/// Test that millisecond window bounds are floored to seconds
#[test]
fn test_window_in_milliseconds() {
    let config = SimulationConfig::from_cli_args(parse(&[
        "--start",
        "1700000000999",
        "--end",
        "1700000060000",
    ]))
    .unwrap();

    assert_eq!(config.start_time, 1_700_000_000);
    assert_eq!(config.end_time, 1_700_000_060);
    assert_eq!(config.time_steps(), 61);

    let config = SimulationConfig::from_cli_args(parse(&["--start", "-1", "--end", "0"])).unwrap();
    assert_eq!(config.start_time, -1);
    assert_eq!(config.end_time, 0);
}

/// Test every value flag, including the camelCase spellings
#[test]
fn test_item_flags_and_aliases() {
    let args = parse(&[
        "--items",
        "25",
        "--itemMinTime",
        "30",
        "--item-max-time",
        "90",
        "--itemMinSpeed",
        "100.5",
        "--itemMaxSpeed",
        "200",
        "--res",
        "5",
        "--elastic",
        "search.internal:9201",
        "--index",
        "flights",
        "--schema",
        "single-source",
        "--seed",
        "7",
        "--clean",
    ]);
    let config = SimulationConfig::from_cli_args(args).unwrap();

    assert_eq!(config.items_concurrent, 25);
    assert_eq!(config.item_lifetime(), (30, 90));
    assert_eq!(config.item_speed(), (100.5, 200.0));
    assert_eq!(config.path_resolution, 5);
    assert_eq!(config.backend_url(), "http://search.internal:9201");
    assert_eq!(config.index, "flights");
    assert_eq!(config.schema, RecordSchema::SingleSource);
    assert_eq!(config.seed, Some(7));
    assert!(config.clean);
}

/// Test help and control flags
#[test]
fn test_control_flags() {
    let args = parse(&["-h"]);
    assert!(args.help);

    let args = parse(&["--help"]);
    assert!(args.help);

    let args = parse(&["--dry-run", "--print-config", "-v", "-d"]);
    assert!(args.dry_run);
    assert!(args.print_config);
    assert!(args.verbose);
    assert!(args.debug);
}

/// Test rejected flag values
#[test]
fn test_invalid_flag_values() {
    assert!(CliArgs::try_parse_from(["t", "--items", "-3"]).is_err());
    assert!(CliArgs::try_parse_from(["t", "--res", "ten"]).is_err());
    assert!(CliArgs::try_parse_from(["t", "--schema", "nested"]).is_err());
    assert!(CliArgs::try_parse_from(["t", "--unknown"]).is_err());
}

/// Test configuration validation after parsing
#[test]
fn test_parsed_values_are_validated() {
    let config = SimulationConfig::from_cli_args(parse(&["--res", "0"])).unwrap();
    assert!(config.validate().is_err());

    let config =
        SimulationConfig::from_cli_args(parse(&["--itemMinTime", "100", "--itemMaxTime", "10"]))
            .unwrap();
    assert!(config.validate().is_err());

    let config = SimulationConfig::from_cli_args(parse(&["--index", "_hidden"])).unwrap();
    assert!(config.validate().is_err());

    // Zero items is a valid, empty run
    let config = SimulationConfig::from_cli_args(parse(&["--items", "0"])).unwrap();
    config.validate().unwrap();
}

/// Test that CLI flags override a configuration file
#[test]
fn test_config_file_merging() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    writeln!(
        file,
        r#"{{
            "start_time": 100,
            "end_time": 200,
            "items_concurrent": 4,
            "index": "from-file",
            "schema": "untagged",
            "request_timeout_ms": 1500
        }}"#
    )
    .unwrap();
    let path = file.path().to_str().unwrap();

    let config = SimulationConfig::from_cli_args(parse(&["--config", path])).unwrap();
    assert_eq!(config.start_time, 100);
    assert_eq!(config.end_time, 200);
    assert_eq!(config.items_concurrent, 4);
    assert_eq!(config.index, "from-file");
    assert_eq!(config.schema, RecordSchema::Untagged);
    assert_eq!(config.request_timeout_ms, 1_500);
    // Not in the file
    assert_eq!(config.path_resolution, 10);

    let config =
        SimulationConfig::from_cli_args(parse(&["--config", path, "--items", "9", "--end", "300000"]))
            .unwrap();
    assert_eq!(config.items_concurrent, 9);
    assert_eq!(config.end_time, 300);
    assert_eq!(config.index, "from-file");
}

/// Test configuration file errors
#[test]
fn test_config_file_errors() {
    let result = SimulationConfig::from_cli_args(parse(&["--config", "/nonexistent/loader.json"]));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));

    let file = NamedTempFile::new().unwrap();
    let result = SimulationConfig::from_file(file.path());
    assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));

    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, "{{ not json").unwrap();
    let result = SimulationConfig::from_file(file.path());
    assert!(matches!(result, Err(ConfigError::JsonError(_))));
}

/// Test that a saved configuration loads back unchanged
#[test]
fn test_saved_configuration_loads_back() {
    let config = SimulationConfig {
        start_time: 10,
        end_time: 20,
        seed: Some(3),
        schema: RecordSchema::SingleSource,
        ..SimulationConfig::default()
    };

    let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    config.save_to_file(file.path()).unwrap();
    assert_eq!(SimulationConfig::from_file(file.path()).unwrap(), config);
}
