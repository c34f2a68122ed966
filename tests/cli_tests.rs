use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn triage() -> Command {
    let mut cmd = Command::cargo_bin("triage").expect("binary builds");
    cmd.env_remove("OPENAI_API_KEY")
        .env_remove("OPENAI_BASE_URL")
        .env_remove("MAX_CONCURRENCY")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_commands() {
    triage()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("classify"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn check_config_warns_when_key_is_missing() {
    triage()
        .args(["check", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OPENAI_API_KEY is not set"));
}

#[test]
fn check_config_json_reports_key_presence() {
    triage()
        .args(["--json", "check", "config"])
        .env("OPENAI_API_KEY", "sk-test")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"api_key_present\":true"));
}

#[test]
fn invalid_config_file_exits_with_config_code() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("triage.toml");
    fs::write(&path, "[retry]\nmax_attempts = 0\n").unwrap();

    triage()
        .args(["check", "config", "--config"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("max_attempts"));
}

#[test]
fn malformed_config_file_points_at_the_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("triage.toml");
    fs::write(&path, "[batch]\nmax_rows = \n").unwrap();

    triage()
        .args(["check", "config", "--config"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("max_rows"));
}

#[test]
fn classify_without_key_exits_with_config_code() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tickets.csv");
    fs::write(&path, "id,text\n1,hello\n").unwrap();

    triage()
        .arg("classify")
        .arg(&path)
        .args(["-t", "text", "-c", "Billing"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn classify_missing_dataset_fails() {
    let dir = TempDir::new().unwrap();

    triage()
        .arg("classify")
        .arg(dir.path().join("absent.csv"))
        .args(["-t", "text", "-c", "Billing"])
        .env("OPENAI_API_KEY", "sk-test")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn classify_requires_a_category() {
    triage()
        .args(["classify", "tickets.csv", "-t", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--category"));
}
