// statlab/tests/cli_integration_tests.rs
//! Command-line tests for the `statlab` binary.
//!
//! Each run gets a scratch working directory and HOME so no user config file
//! leaks into the results.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn statlab(scratch: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("statlab").unwrap();
    cmd.current_dir(scratch.path())
        .env("HOME", scratch.path())
        .env("XDG_CONFIG_HOME", scratch.path())
        .env("RUST_LOG", "warn")
        .env_remove("STATLAB_HOST")
        .env_remove("STATLAB_PORT");
    cmd
}

const PERFECT_LINE: &str = r#"{"tables": {"data-table": [
    {"X Values": 1, "Y Values": 3},
    {"X Values": 2, "Y Values": 5},
    {"X Values": 3, "Y Values": 7},
    {"X Values": 4, "Y Values": 9}
]}}"#;

#[test]
fn test_help_lists_commands() {
    let scratch = TempDir::new().unwrap();
    statlab(&scratch)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve").and(predicate::str::contains("compute")));
}

#[test]
fn test_compute_regression_from_stdin() {
    let scratch = TempDir::new().unwrap();
    statlab(&scratch)
        .args(["compute", "--page", "regression"])
        .write_stdin(PERFECT_LINE)
        .assert()
        .success()
        .stdout(predicate::str::contains("y = 2.00x + 1.00"))
        .stdout(predicate::str::contains("R²: 1.0000"));
}

#[test]
fn test_compute_ttest_seed_tables() {
    let scratch = TempDir::new().unwrap();
    statlab(&scratch)
        .args(["compute", "--page", "ttest"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("T-Statistic: -0.09, P-Value: 0.9338"));
}

#[test]
fn test_compute_json_output() -> Result<()> {
    let scratch = TempDir::new()?;
    let mut input = NamedTempFile::new()?;
    input.write_all(PERFECT_LINE.as_bytes())?;

    let output = statlab(&scratch)
        .args(["--quiet", "compute", "--page", "regression", "--json", "--input"])
        .arg(input.path())
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["outcome"]["status"], "analysis");
    assert_eq!(value["outcome"]["stats"]["slope"], 2.0);
    assert_eq!(value["tables"]["data-table"].as_array().unwrap().len(), 4);
    Ok(())
}

#[test]
fn test_distribution_with_text_fails() {
    let scratch = TempDir::new().unwrap();
    statlab(&scratch)
        .args(["compute", "--page", "distribution"])
        .write_stdin(r#"{"tables": {"data-table": [{"Values": "a"}, {"Values": 2}]}}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Values"));
}

#[test]
fn test_malformed_payload_fails() {
    let scratch = TempDir::new().unwrap();
    statlab(&scratch)
        .args(["compute", "--page", "anova"])
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse the request payload"));
}

#[test]
fn test_invalid_alpha_flag_is_rejected() {
    let scratch = TempDir::new().unwrap();
    statlab(&scratch)
        .args(["compute", "--page", "anova", "--alpha", "2"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("significance_level"));
}

#[test]
fn test_config_file_is_applied() -> Result<()> {
    let scratch = TempDir::new()?;
    let mut config = NamedTempFile::new()?;
    config.write_all(b"analysis:\n  significance_level: 0.5\n")?;

    statlab(&scratch)
        .args(["compute", "--page", "anova", "--seed", "3", "--config"])
        .arg(config.path())
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("than 0.5,"));
    Ok(())
}

#[test]
fn test_dotenv_log_level_is_honored() -> Result<()> {
    let scratch = TempDir::new()?;
    std::fs::write(scratch.path().join(".env"), "RUST_LOG=debug\n")?;

    statlab(&scratch)
        .env_remove("RUST_LOG")
        .args(["compute", "--page", "ttest"])
        .write_stdin("")
        .assert()
        .success()
        .stderr(predicate::str::contains("Effective configuration"));
    Ok(())
}
