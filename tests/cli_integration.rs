//! Integration tests for the tally CLI
//!
//! These tests exercise the full CLI workflow using a temporary database.
//! They verify that commands work end-to-end without mocking.

use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Helper to run tally with a specific database path
fn run_tally(args: &[&str], db_path: &PathBuf) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_tally"))
        .args(args)
        .env("TALLY_DB_PATH", db_path)
        .output()
        .expect("Failed to execute tally")
}

/// Helper to get stdout as string
fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Helper to get stderr as string
fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn temp_db() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("tally.db");
    (dir, path)
}

// =============================================================================
// Basic Command Tests
// =============================================================================

#[test]
fn test_help_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_tally"))
        .arg("--help")
        .output()
        .expect("Failed to execute");

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("tally"));
    assert!(out.contains("productivity"));
}

#[test]
fn test_version_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_tally"))
        .arg("--version")
        .output()
        .expect("Failed to execute");

    assert!(output.status.success());
    assert!(stdout(&output).contains("tally"));
}

// =============================================================================
// Task Workflow Tests
// =============================================================================

#[test]
fn test_add_and_list_tasks() {
    let (_dir, db) = temp_db();

    let output = run_tally(&["add", "Write report", "--priority", "deep"], &db);
    assert!(output.status.success(), "add failed: {}", stderr(&output));
    assert!(stdout(&output).contains("Task added"));

    let output = run_tally(&["tasks"], &db);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Deep Work Forging"));
    assert!(out.contains("Write report"));
}

#[test]
fn test_add_rejects_bad_priority() {
    let (_dir, db) = temp_db();

    let output = run_tally(&["add", "Write report", "--priority", "urgent"], &db);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid priority"));
}

#[test]
fn test_complete_task_once_only() {
    let (_dir, db) = temp_db();
    run_tally(&["add", "Write report"], &db);

    let output = run_tally(&["done", "write report"], &db);
    assert!(output.status.success(), "done failed: {}", stderr(&output));
    assert!(stdout(&output).contains("Completed"));

    // Completing again is rejected, not a no-op
    let output = run_tally(&["done", "write report"], &db);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("already completed"));
}

#[test]
fn test_roll_until_avoided() {
    let (_dir, db) = temp_db();
    run_tally(&["add", "Write report", "--priority", "deep"], &db);

    for _ in 0..2 {
        let output = run_tally(&["roll", "Write report"], &db);
        assert!(stdout(&output).contains("Rolled forward"));
    }

    // No pattern at two rolls
    let output = run_tally(&["avoided"], &db);
    assert!(stdout(&output).contains("No avoidance patterns"));

    // The third roll crosses the threshold
    let output = run_tally(&["roll", "Write report"], &db);
    assert!(stdout(&output).contains("AVOIDANCE PATTERN"));

    let output = run_tally(&["avoided"], &db);
    let out = stdout(&output);
    assert!(out.contains("Write report"));
    assert!(out.contains("rolled 3x"));
}

#[test]
fn test_unknown_task_fails() {
    let (_dir, db) = temp_db();
    let output = run_tally(&["roll", "nothing here"], &db);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("not found"));
}

// =============================================================================
// Energy / Sprint / Journal Tests
// =============================================================================

#[test]
fn test_energy_logging() {
    let (_dir, db) = temp_db();

    let output = run_tally(&["energy", "high", "--context", "after coffee"], &db);
    assert!(output.status.success(), "energy failed: {}", stderr(&output));
    assert!(stdout(&output).contains("Energy logged: high"));

    let output = run_tally(&["energy", "caffeinated"], &db);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid energy level"));
}

#[test]
fn test_sprint_status_and_rest() {
    let (_dir, db) = temp_db();

    let output = run_tally(&["status"], &db);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Sprint Day 1"));
    assert!(stdout(&output).contains("healthy"));

    let output = run_tally(&["rest"], &db);
    assert!(stdout(&output).contains("Rest day recorded"));

    let output = run_tally(&["status"], &db);
    assert!(stdout(&output).contains("Sprint Day 0"));
    assert!(stdout(&output).contains("Last rest day"));
}

#[test]
fn test_field_report() {
    let (_dir, db) = temp_db();
    let output = run_tally(&["report", "cleared the inbox"], &db);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Field report logged"));
}

#[test]
fn test_patterns_and_summary() {
    let (_dir, db) = temp_db();
    run_tally(&["add", "Write report"], &db);
    run_tally(&["energy", "medium"], &db);
    run_tally(&["done", "Write report"], &db);

    let output = run_tally(&["patterns"], &db);
    assert!(output.status.success(), "patterns failed: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Energy trends"));
    assert!(out.contains("Completion rate: 100%"));

    let output = run_tally(&["summary"], &db);
    let out = stdout(&output);
    assert!(out.contains("Sprint: Day 1"));
    assert!(out.contains("Completed today: 1"));
}

// =============================================================================
// Session Tests
// =============================================================================

#[test]
fn test_session_lifecycle() {
    let (_dir, db) = temp_db();

    let output = run_tally(&["session", "start", "briefing"], &db);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Session started: briefing"));

    let output = run_tally(&["session", "show"], &db);
    assert!(stdout(&output).contains("Current session: briefing"));

    let output = run_tally(&["session", "end"], &db);
    assert!(stdout(&output).contains("Session ended"));

    let output = run_tally(&["session", "show"], &db);
    assert!(stdout(&output).contains("No active session"));
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_set_sprint_and_reset() {
    let (_dir, db) = temp_db();

    let output = run_tally(
        &["config", "set-sprint", "--warning", "10", "--danger", "15"],
        &db,
    );
    assert!(output.status.success(), "set-sprint failed: {}", stderr(&output));
    assert!(stdout(&output).contains("warning day 10"));

    let output = run_tally(&["config", "show"], &db);
    assert!(stdout(&output).contains("warning day 10, danger day 15"));

    // Invalid ordering is rejected
    let output = run_tally(
        &["config", "set-sprint", "--warning", "20", "--danger", "5"],
        &db,
    );
    assert_eq!(output.status.code(), Some(1));

    let output = run_tally(&["config", "reset"], &db);
    assert!(output.status.success());
    let output = run_tally(&["config", "show"], &db);
    assert!(stdout(&output).contains("warning day 14, danger day 21"));
}

// =============================================================================
// JSON Output Tests
// =============================================================================

#[test]
fn test_json_envelope() {
    let (_dir, db) = temp_db();
    run_tally(&["add", "Write report"], &db);

    let output = run_tally(&["summary", "--json"], &db);
    assert!(output.status.success());
    let envelope: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("valid JSON envelope");
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["data"]["total_tasks"], 1);
    assert!(envelope["message"].is_string());
}

// =============================================================================
// Shell Completion Tests
// =============================================================================

#[test]
fn test_completion_bash() {
    let output = Command::new(env!("CARGO_BIN_EXE_tally"))
        .args(["completion", "bash"])
        .output()
        .expect("Failed to execute");

    assert!(
        output.status.success(),
        "completion bash failed: {}",
        stderr(&output)
    );
    assert!(
        stdout(&output).contains("_tally"),
        "bash completion should contain _tally function"
    );
}

#[test]
fn test_completion_zsh() {
    let output = Command::new(env!("CARGO_BIN_EXE_tally"))
        .args(["completion", "zsh"])
        .output()
        .expect("Failed to execute");

    assert!(
        output.status.success(),
        "completion zsh failed: {}",
        stderr(&output)
    );
    assert!(
        stdout(&output).contains("#compdef tally"),
        "zsh completion should contain #compdef"
    );
}
