//! Binary exit behaviour for configuration and credential failures
//!
//! None of these cases reach the network.

use assert_cmd::Command;
use std::process::Output;
use tempfile::TempDir;

fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("historical-data").unwrap();
    cmd.env("BINANCE_API_KEY", "test-key")
        .env("BINANCE_API_SECRET", "test-secret")
        .env_remove("LOG_FORMAT")
        .args(["--dir", dir.path().to_str().unwrap()]);
    cmd
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_missing_api_key_exits_with_error() {
    let temp_dir = TempDir::new().unwrap();
    let output = cli(&temp_dir)
        .env_remove("BINANCE_API_KEY")
        .args(["-s", "BTCUSDT"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("BINANCE_API_KEY"));
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_empty_api_secret_exits_with_error() {
    let temp_dir = TempDir::new().unwrap();
    let output = cli(&temp_dir)
        .env("BINANCE_API_SECRET", "")
        .args(["-s", "BTCUSDT"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("BINANCE_API_SECRET"));
}

#[test]
fn test_reversed_range_exits_with_error() {
    let temp_dir = TempDir::new().unwrap();
    let output = cli(&temp_dir)
        .args([
            "-s",
            "BTCUSDT",
            "--from-date",
            "05/01/2021 00:00:00",
            "--to-date",
            "01/01/2021 00:00:00",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("is after to-date"));
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_unsupported_provider_exits_with_error() {
    let temp_dir = TempDir::new().unwrap();
    let output = cli(&temp_dir)
        .args(["--source", "kraken", "-s", "BTCUSDT"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unsupported data provider 'kraken'"));
}

#[test]
fn test_unknown_format_exits_with_error() {
    let temp_dir = TempDir::new().unwrap();
    let output = cli(&temp_dir)
        .args(["-s", "BTCUSDT", "--format", "wide"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unknown format 'wide'"));
}

#[test]
fn test_missing_symbol_is_a_usage_error() {
    let temp_dir = TempDir::new().unwrap();
    cli(&temp_dir).assert().failure();
}

#[test]
fn test_non_boolean_timestamp_is_a_usage_error() {
    let temp_dir = TempDir::new().unwrap();
    cli(&temp_dir)
        .args(["-s", "BTCUSDT", "--timestamp", "maybe"])
        .assert()
        .failure();
}

#[test]
fn test_help_succeeds() {
    Command::cargo_bin("historical-data")
        .unwrap()
        .arg("--help")
        .assert()
        .success();
}
