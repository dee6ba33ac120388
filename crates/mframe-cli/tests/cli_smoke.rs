//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `mframe` binary to verify that
//! argument parsing, help text, and error handling work end-to-end.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("mframe").unwrap()
}

fn write_linear_table(path: &Path, rows: usize) {
    let mut contents = String::from("width,length\n");
    for i in 0..rows {
        let width = 1.0 + i as f64 * 0.5;
        contents.push_str(&format!("{},{}\n", width, 2.0 * width + 1.0));
    }
    fs::write(path, contents).unwrap();
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("train"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mframe"));
}

// ---------------------------------------------------------------------------
// Train subcommand
// ---------------------------------------------------------------------------

#[test]
fn train_no_config_prints_template() {
    cmd()
        .arg("train")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"train_data\""))
        .stdout(predicate::str::contains("\"LinearRegression\""))
        .stderr(predicate::str::contains("No config file provided"));
}

#[test]
fn train_nonexistent_config_errors() {
    cmd()
        .args(["train", "/nonexistent/config.json"])
        .assert()
        .failure();
}

#[test]
fn train_end_to_end_writes_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let train = dir.path().join("train.csv");
    let test = dir.path().join("test.csv");
    write_linear_table(&train, 12);
    write_linear_table(&test, 4);

    let config = dir.path().join("config.json");
    fs::write(
        &config,
        r#"{ "model": { "learning_rate": 0.02, "LinearRegression": { "n_epochs": 5 } } }"#,
    )
    .unwrap();

    let predictions = dir.path().join("predictions.csv");
    let model = dir.path().join("model.json");

    cmd()
        .arg("train")
        .arg(&config)
        .arg("-d")
        .arg(&train)
        .arg("-t")
        .arg(&test)
        .arg("-o")
        .arg(&predictions)
        .arg("-m")
        .arg(&model)
        .args(["--epochs", "3000", "--learning-rate", "0.02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mean absolute error: 0.00"));

    let written = fs::read_to_string(&predictions).unwrap();
    assert!(written.starts_with("actual,predicted\n"));
    assert_eq!(written.lines().count(), 5);

    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&model).unwrap()).unwrap();
    assert_eq!(saved["n_epochs"], 3000);
    assert!(saved["fitted"]["weights"].is_array());
}

#[test]
fn train_holds_out_rows_without_test_data() {
    let dir = tempfile::tempdir().unwrap();
    let train = dir.path().join("train.txt");
    write_linear_table(&train, 10);
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{ "test_fraction": 0.3, "seed": 3 }"#).unwrap();

    cmd()
        .arg("train")
        .arg(&config)
        .arg("-d")
        .arg(&train)
        .assert()
        .success()
        .stdout(predicate::str::contains("Mean absolute error"));
}

#[test]
fn train_unknown_feature_fails() {
    let dir = tempfile::tempdir().unwrap();
    let train = dir.path().join("train.csv");
    write_linear_table(&train, 6);
    let config = dir.path().join("config.json");
    fs::write(&config, "{}").unwrap();

    cmd()
        .arg("train")
        .arg(&config)
        .arg("-d")
        .arg(&train)
        .args(["--features", "height"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// Inspect subcommand
// ---------------------------------------------------------------------------

#[test]
fn inspect_prints_table() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.csv");
    fs::write(&data, "width,length\n1,3\nbad,row\n2,5\n").unwrap();

    cmd()
        .arg("inspect")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("width"))
        .stdout(predicate::str::contains("size: 2 rows x 2 columns"))
        .stdout(predicate::str::contains("skipped: 1 malformed rows"));
}

#[test]
fn inspect_missing_file_fails() {
    cmd()
        .args(["inspect", "/nonexistent/data.csv"])
        .assert()
        .failure();
}
