//! Shared fixture helpers

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

pub fn load_fixture(name: &str) -> String {
    fs::read_to_string(fixtures_dir().join(name))
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e))
}

/// Copies a fixture into a fresh temp dir so outputs land next to it.
pub fn temp_fixture(name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    fs::copy(fixtures_dir().join(name), &path).unwrap();
    (temp_dir, path)
}

/// Runs the wlr binary with an isolated, nonexistent config file.
pub fn run_wlr(config_dir: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_wlr"))
        .args(args)
        .env("WLR_CONFIG", config_dir.path().join("config.toml"))
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute wlr");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}
