//! Binary-level tests

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::{load_fixture, run_wlr, temp_fixture};

fn wlr(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("wlr").unwrap();
    cmd.env("WLR_CONFIG", config_dir.path().join("config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Help Output Tests
// ============================================================================

#[test]
fn help_lists_subcommands() {
    let temp_dir = TempDir::new().unwrap();
    wlr(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("rewrite"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn rewrite_without_file_is_usage_error() {
    let temp_dir = TempDir::new().unwrap();
    let (_stdout, stderr, exit_code) = run_wlr(&temp_dir, &["rewrite"]);

    assert_eq!(exit_code, 2);
    assert!(stderr.contains("<FILE>"));
}

// ============================================================================
// Rewrite Command Tests
// ============================================================================

#[test]
fn rewrite_to_explicit_output() {
    let (temp_dir, input) = temp_fixture("dbBuilder.log");
    let output = temp_dir.path().join("result.log");

    wlr(&temp_dir)
        .args(["rewrite", input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rewritten log:"));

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        load_fixture("dbBuilder.rewritten.log")
    );
}

#[test]
fn rewrite_default_output_carries_timestamp_suffix() {
    let (temp_dir, input) = temp_fixture("dbBuilder.log");

    wlr(&temp_dir)
        .args(["rewrite", "--stats-only", input.to_str().unwrap()])
        .assert()
        .success();

    let produced: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("dbBuilder_") && name.ends_with(".log"))
        .collect();
    assert_eq!(produced.len(), 1, "produced: {:?}", produced);

    let content = fs::read_to_string(temp_dir.path().join(&produced[0])).unwrap();
    assert_eq!(content, load_fixture("dbBuilder.report.txt"));
}

#[test]
fn rewrite_directory_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    wlr(&temp_dir)
        .args(["rewrite", temp_dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a regular file"));
}

#[test]
fn unbalanced_log_fails_and_names_component() {
    let (temp_dir, input) = temp_fixture("unbalanced.log");
    let output = temp_dir.path().join("result.log");

    wlr(&temp_dir)
        .args(["rewrite", input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("almanach3"));
    assert!(!output.exists());
}

#[test]
fn rewrite_refuses_to_overwrite_its_input() {
    let (temp_dir, input) = temp_fixture("dbBuilder.log");

    wlr(&temp_dir)
        .args(["rewrite", input.to_str().unwrap(), "-o", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overwrite"));

    assert_eq!(fs::read_to_string(&input).unwrap(), load_fixture("dbBuilder.log"));
}

#[test]
fn invalid_default_language_is_rejected() {
    let (temp_dir, input) = temp_fixture("dbBuilder.log");
    wlr(&temp_dir)
        .args(["stats", "--default-language", "french", input.to_str().unwrap()])
        .assert()
        .failure();
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn config_init_then_show() {
    let temp_dir = TempDir::new().unwrap();

    wlr(&temp_dir).args(["config", "init"]).assert().success();
    assert!(temp_dir.path().join("config.toml").exists());

    wlr(&temp_dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_language = \"fr\""))
        .stdout(predicate::str::contains("profile = \"adjustment\""));
}

#[test]
fn config_path_honors_env() {
    let temp_dir = TempDir::new().unwrap();
    let (stdout, _stderr, exit_code) = run_wlr(&temp_dir, &["config", "path"]);

    assert_eq!(exit_code, 0);
    assert_eq!(
        stdout.trim(),
        temp_dir.path().join("config.toml").display().to_string()
    );
}

#[test]
fn config_profile_applies_to_stats() {
    let (temp_dir, input) = temp_fixture("purge.log");
    fs::write(
        temp_dir.path().join("config.toml"),
        "[engine]\nprofile = \"purge\"\n",
    )
    .unwrap();

    let (stdout, _stderr, exit_code) =
        run_wlr(&temp_dir, &["stats", "--json", input.to_str().unwrap()]);
    assert_eq!(exit_code, 0);
    assert!(stdout.contains("\"components\": 1"));
}

#[test]
fn completions_generate_for_bash() {
    let temp_dir = TempDir::new().unwrap();
    wlr(&temp_dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wlr"));
}
