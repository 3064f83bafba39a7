//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against an isolated HOME so
//! nothing touches the developer's real data directory.

use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;

fn test_home() -> &'static PathBuf {
    static HOME: OnceLock<PathBuf> = OnceLock::new();
    HOME.get_or_init(|| {
        let dir = std::env::temp_dir().join(format!("commitly-cli-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("Failed to create test home");
        dir
    })
}

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "commitly-cli", "--"])
        .args(args)
        .env("HOME", test_home())
        .env("COMMITLY_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\nstderr: {stderr}");
    stdout
}

/// Create a goal and return its id.
fn create_goal(title: &str, extra: &[&str]) -> String {
    let mut args = vec!["goal", "add", title];
    args.extend_from_slice(extra);
    let stdout = run_cli_success(&args);
    let event: serde_json::Value =
        serde_json::from_str(&stdout).expect("Failed to parse GoalCreated event");
    assert_eq!(event["type"], "GoalCreated");
    event["goal_id"].as_str().expect("missing goal_id").to_string()
}

#[test]
fn test_goal_add_and_show() {
    let id = create_goal("Read every day", &[]);
    let stdout = run_cli_success(&["goal", "show", &id]);
    let detail: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(detail["goal"]["title"], "Read every day");
    assert!(detail["schedule"].is_object());
}

#[test]
fn test_goal_list_json() {
    create_goal("List me", &[]);
    let stdout = run_cli_success(&["goal", "list", "--json"]);
    let goals: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(goals.as_array().is_some_and(|g| !g.is_empty()));
}

#[test]
fn test_checkin_extends_streak() {
    let id = create_goal("Daily pushups", &["--start", "2025-06-01"]);
    let stdout = run_cli_success(&["checkin", &id, "--date", "2025-06-02"]);
    assert!(stdout.contains("CheckinRecorded"));
    assert!(stdout.contains("StreakExtended"));

    let stdout = run_cli_success(&["streak", "status", &id]);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["state"]["current_streak"], 1);
}

#[test]
fn test_pause_and_resume() {
    let id = create_goal("Pause me", &[]);
    let stdout = run_cli_success(&["pause", "start", &id, "--reason", "vacation"]);
    assert!(stdout.contains("GoalPaused"));

    let stdout = run_cli_success(&["pause", "status", &id]);
    let status: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["can_resume"], true);

    let stdout = run_cli_success(&["pause", "stop", &id]);
    assert!(stdout.contains("GoalResumed"));
}

#[test]
fn test_resume_without_pause_fails() {
    let id = create_goal("Never paused", &[]);
    let (_, stderr, code) = run_cli(&["pause", "stop", &id]);
    assert_ne!(code, 0);
    assert!(stderr.contains("not paused"));
}

#[test]
fn test_multi_goal_activities() {
    let id = create_goal(
        "Morning routine",
        &["--goal-type", "multi", "--policy", "percentage", "--percent", "50"],
    );
    run_cli_success(&["activity", "add", &id, "Stretch"]);
    run_cli_success(&["activity", "add", &id, "Journal"]);

    let stdout = run_cli_success(&["activity", "list", &id]);
    let listing: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(listing["activities"].as_array().unwrap().len(), 2);
}

#[test]
fn test_goal_archive() {
    let id = create_goal("Throwaway", &[]);
    let stdout = run_cli_success(&["goal", "archive", &id]);
    assert!(stdout.contains("GoalArchived"));

    let (_, stderr, code) = run_cli(&["goal", "show", &id]);
    assert_ne!(code, 0);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_stats_all() {
    create_goal("Stat fodder", &[]);
    let stdout = run_cli_success(&["stats", "all"]);
    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(stats["total_goals"].as_u64().is_some_and(|n| n >= 1));
}

#[test]
fn test_config_get_and_set() {
    let stdout = run_cli_success(&["config", "get", "recovery.mode"]);
    assert_eq!(stdout.trim(), "strict");

    run_cli_success(&["config", "set", "notifications.check_interval_min", "30"]);
    let stdout = run_cli_success(&["config", "get", "notifications.check_interval_min"]);
    assert_eq!(stdout.trim(), "30");
}
