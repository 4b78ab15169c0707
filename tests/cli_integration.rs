//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Get the binary to test.
fn nexver() -> Command {
    Command::cargo_bin("nexver").unwrap()
}

/// Binary running inside an empty directory so no local config is picked up.
fn nexver_in(dir: &assert_fs::TempDir) -> Command {
    let mut cmd = nexver();
    cmd.current_dir(dir.path());
    cmd
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    nexver()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hardware verification project workspace"));
}

#[test]
fn test_version_flag() {
    nexver()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_subcommand_fails() {
    nexver().assert().failure().stderr(predicate::str::contains("Usage:"));
}

// ============================================================================
// Projects Command Tests
// ============================================================================

#[test]
fn test_projects_text() {
    let temp = assert_fs::TempDir::new().unwrap();
    nexver_in(&temp)
        .arg("projects")
        .assert()
        .success()
        .stdout(predicate::str::contains("RISC-V_Core_Verification"))
        .stdout(predicate::str::contains("AXI_Bus_Interconnect_Test"));
}

#[test]
fn test_projects_json() {
    let temp = assert_fs::TempDir::new().unwrap();
    let output = nexver_in(&temp).args(["projects", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let projects = value.as_array().unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0]["name"], "RISC-V_Core_Verification");
    assert_eq!(projects[0]["has_plan"], true);
    assert_eq!(projects[1]["has_plan"], false);
}

#[test]
fn test_projects_unknown_format() {
    nexver()
        .args(["projects", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format"));
}

// ============================================================================
// Columns Command Tests
// ============================================================================

#[test]
fn test_columns_all_sheets() {
    nexver()
        .arg("columns")
        .assert()
        .success()
        .stdout(predicate::str::contains("Verification Plan"))
        .stdout(predicate::str::contains("Register Coverage Information"));
}

#[test]
fn test_columns_single_sheet_case_insensitive() {
    nexver()
        .args(["columns", "test cases"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TestCaseName"))
        .stdout(predicate::str::contains("Port Information").not());
}

#[test]
fn test_columns_unknown_sheet() {
    nexver()
        .args(["columns", "Timing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_path() {
    nexver()
        .args(["config", "--path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nexver"));
}

#[test]
fn test_config_reads_local_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".nexver.toml")
        .write_str("[general]\nsimulator = \"QuestaSim\"\n\n[simulation]\nseed = 3\n")
        .unwrap();

    nexver_in(&temp)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("simulator = \"QuestaSim\""))
        .stdout(predicate::str::contains("seed = 3"));
}

#[test]
fn test_config_rejects_invalid_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".nexver.toml").write_str("[simulation\n").unwrap();

    nexver_in(&temp).arg("config").assert().failure();
}

// ============================================================================
// Demo Command Tests
// ============================================================================

#[test]
fn test_demo_full_session() {
    let temp = assert_fs::TempDir::new().unwrap();
    nexver_in(&temp)
        .args(["demo", "--fast", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created project PicoCPU [project created]"))
        .stdout(predicate::str::contains("Verification plan ready [verification plan generated]"))
        .stdout(predicate::str::contains("Report ready [report ready]"))
        .stdout(predicate::str::contains("Simulation complete. 1253 passed, 12 failed."))
        .stdout(predicate::str::contains("Project saved successfully."));
}

#[test]
fn test_demo_cancel_first() {
    let temp = assert_fs::TempDir::new().unwrap();
    nexver_in(&temp)
        .args(["demo", "--fast", "--cancel-first", "--project", "Uart"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan generation cancelled [files uploaded]"))
        .stdout(predicate::str::contains("Verification Plan generation cancelled by user."));
}

#[test]
fn test_demo_with_edit_and_simulator() {
    let temp = assert_fs::TempDir::new().unwrap();
    nexver_in(&temp)
        .args(["demo", "--fast", "--simulator", "questasim", "--rename-feature", "UART TX"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan edits saved"))
        .stdout(predicate::str::contains("Simulation started with QuestaSim."));
}

#[test]
fn test_demo_rejects_sample_project_name() {
    let temp = assert_fs::TempDir::new().unwrap();
    nexver_in(&temp)
        .args(["demo", "--fast", "--project", "RISC-V_Core_Verification"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// ============================================================================
// Completions Tests
// ============================================================================

#[test]
fn test_completions_bash() {
    nexver()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nexver"));
}
