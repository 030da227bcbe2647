use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn stride() -> (TempDir, Command) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let mut cmd = Command::cargo_bin("stride").expect("binary exists");
    cmd.arg("--database-file").arg(&db_path);
    (temp_dir, cmd)
}

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("stride")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("reset"));
}

#[test]
fn plan_reports_absence_for_new_client() {
    let (_temp_dir, mut cmd) = stride();
    cmd.args(["plan", "nobody"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plan yet"));
}

#[test]
fn history_reports_absence_for_new_client() {
    let (_temp_dir, mut cmd) = stride();
    cmd.args(["history", "nobody"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No conversation history"));
}

#[test]
fn reset_is_idempotent_and_reports_counts() {
    let (_temp_dir, mut cmd) = stride();
    cmd.args(["reset", "nobody"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 messages and 0 plan versions deleted"));
}

#[test]
fn chat_without_api_key_fails_with_guidance() {
    let (_temp_dir, mut cmd) = stride();
    cmd.env_remove("OPENAI_API_KEY")
        .env_remove("STRIDE_OPENAI_API_KEY")
        .args(["chat", "nobody", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}
