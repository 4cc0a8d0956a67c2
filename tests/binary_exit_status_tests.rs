//! Exit status and output of the `trajectory-loader` binary
//!
//! Only flags that return before any backend request are exercised here.

use std::process::{Command, Output};

fn run_binary(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_trajectory-loader"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_help_prints_usage_and_exits_with_failure() {
    for flag in ["--help", "-h"] {
        let output = run_binary(&[flag]);

        assert_eq!(output.status.code(), Some(1), "{} should exit with 1", flag);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Usage"), "stderr: {}", stderr);
        assert!(stderr.contains("--item-min-time"));
        assert!(output.stdout.is_empty());
    }
}

#[test]
fn test_print_config_writes_defaults_as_json() {
    let output = run_binary(&["--print-config"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["items_concurrent"], 10);
    assert_eq!(config["index"], "items");
}

#[test]
fn test_dry_run_accepts_valid_configuration() {
    let output = run_binary(&["--dry-run", "--elastic", "127.0.0.1:1", "--items", "3"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Dry run mode"));
}

#[test]
fn test_dry_run_rejects_invalid_configuration() {
    let output = run_binary(&["--dry-run", "--res", "0"]);
    assert_eq!(output.status.code(), Some(1));

    let max = i64::MAX.to_string();
    let output = run_binary(&["--dry-run", "--itemMinTime", "0", "--itemMaxTime", &max]);
    assert_eq!(output.status.code(), Some(1));
}
