//! Basic CLI E2E tests.
//!
//! Tests invoke the built CLI binary and verify outputs. Each call gets its
//! own HOME so config files never leak between tests.

use std::path::Path;
use std::process::Command;

/// Run a CLI command with `home` as HOME and return (stdout, stderr, code).
fn run_cli_in(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_healthdash-cli"))
        .args(args)
        .env("HOME", home)
        .env_remove("GEMINI_API_KEY")
        .env_remove("HEALTHDASH_ENV")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli(args: &[&str]) -> (String, String, i32) {
    let home = tempfile::tempdir().unwrap();
    run_cli_in(home.path(), args)
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_breathe_patterns() {
    let (stdout, _, code) = run_cli(&["breathe", "patterns"]);
    assert_eq!(code, 0, "breathe patterns failed");
    let patterns = json(&stdout);
    assert_eq!(patterns.as_array().unwrap().len(), 3);
    assert_eq!(patterns[0]["name"], "Box Breathing");
    assert_eq!(patterns[0]["cycle_secs"], 16);
}

#[test]
fn test_breathe_run_one_cycle() {
    let (stdout, _, code) = run_cli(&["breathe", "run", "--pattern", "calm", "--period-ms", "1"]);
    assert_eq!(code, 0, "breathe run failed");
    let phase_lines: Vec<_> = stdout.lines().filter(|l| l.contains("PhaseChanged")).collect();
    assert_eq!(phase_lines.len(), 2);
    assert!(phase_lines[0].contains("Breathe out"));
}

#[test]
fn test_breathe_unknown_pattern() {
    let (_, stderr, code) = run_cli(&["breathe", "run", "--pattern", "square"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown pattern"));
}

#[test]
fn test_focus_completes() {
    let (stdout, _, code) = run_cli(&["focus", "--minutes", "1", "--period-ms", "1"]);
    assert_eq!(code, 0, "focus failed");
    assert!(stdout.contains("FocusStarted"));
    assert!(stdout.contains("FocusCompleted"));
}

#[test]
fn test_profile_bmi() {
    let (stdout, _, code) = run_cli(&["profile", "bmi", "--height", "180", "--weight", "100"]);
    assert_eq!(code, 0, "profile bmi failed");
    let out = json(&stdout);
    assert_eq!(out["bmi"], 30.9);
    assert_eq!(out["category"], "Obese");
}

#[test]
fn test_streak_with_logged_activity() {
    let (stdout, _, code) = run_cli(&["streak", "--log", "walking:30"]);
    assert_eq!(code, 0, "streak failed");
    let out = json(&stdout);
    assert_eq!(out["streak"], 1);
    assert_eq!(out["steps"], 8_420 + 2_000);
    assert_eq!(out["calendar"].as_array().unwrap().len(), 7);
    assert_eq!(out["report"]["flame_size"], 28);
}

#[test]
fn test_sync_writes_activity_file() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("activities.json");
    std::fs::write(&file, "[]").unwrap();
    let file_arg = file.to_str().unwrap();

    let (stdout, _, code) = run_cli_in(
        home.path(),
        &["sync", "--file", file_arg, "--seed", "3", "--delay-ms", "0"],
    );
    assert_eq!(code, 0, "sync failed");
    let out = json(&stdout);
    let synced = out["synced"].as_array().unwrap().len();
    assert!((1..=2).contains(&synced));

    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(saved.as_array().unwrap().len(), synced);
}

#[test]
fn test_sync_missing_file_fails_before_device_wait() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("missing.json");
    let started = std::time::Instant::now();
    let (_, stderr, code) = run_cli_in(
        home.path(),
        &["sync", "--file", file.to_str().unwrap(), "--delay-ms", "60000"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
    assert!(started.elapsed() < std::time::Duration::from_secs(30));
    assert!(!file.exists());
}

#[test]
fn test_focus_minutes_override() {
    let (stdout, _, code) = run_cli(&["focus", "--minutes", "1", "--period-ms", "1"]);
    assert_eq!(code, 0, "focus failed");
    let first = json(stdout.lines().next().unwrap());
    assert_eq!(first["type"], "FocusStarted");
    assert_eq!(first["remaining_secs"], 60);
}

#[test]
fn test_config_set_get() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli_in(home.path(), &["config", "set", "wellness.focus_minutes", "50"]);
    assert_eq!(code, 0, "config set failed");
    let (stdout, _, code) = run_cli_in(home.path(), &["config", "get", "wellness.focus_minutes"]);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "50");
}

#[test]
fn test_config_unknown_key() {
    let (_, stderr, code) = run_cli(&["config", "get", "nope.nothing"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown"));
}

#[test]
fn test_ai_command_without_key_fails_cleanly() {
    let (_, stderr, code) = run_cli(&["news"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("GEMINI_API_KEY"));
}

#[test]
fn test_completions() {
    let (stdout, _, code) = run_cli(&["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("healthdash-cli"));
}
