//! End-to-end checks of the login bootstrap and the message of the day.

use std::fs;
use std::time::Duration;

use assert_cmd::Command;
use tempfile::TempDir;

fn console_cmd(root: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("opsh").expect("binary under test");
    cmd.arg("-C")
        .arg(root.path())
        .env("RUST_LOG", "warn")
        .timeout(Duration::from_secs(5));
    cmd
}

#[test]
fn first_run_prompts_for_and_persists_the_login() {
    let root = tempfile::tempdir().unwrap();

    let assert = console_cmd(&root).write_stdin("alice\nquit\n").assert().success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("login: "), "{stdout:?}");
    assert!(stdout.contains("Logged in as: alice"), "{stdout:?}");
    assert_eq!(fs::read_to_string(root.path().join("std/login")).unwrap(), "alice");
}

#[test]
fn later_runs_reuse_the_stored_login() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("std")).unwrap();
    fs::write(root.path().join("std/login"), "bob\n").unwrap();

    let assert = console_cmd(&root).write_stdin("quit\n").assert().success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(!stdout.contains("login: "), "{stdout:?}");
    assert!(stdout.contains("Logged in as: bob"), "{stdout:?}");
}

#[test]
fn motd_prints_between_greeting_and_first_prompt() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("std")).unwrap();
    fs::write(root.path().join("std/login"), "operator\n").unwrap();
    fs::create_dir_all(root.path().join("etc")).unwrap();
    fs::write(root.path().join("etc/motd"), "Maintenance window tonight.\n").unwrap();

    let assert = console_cmd(&root).write_stdin("quit\n").assert().success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let greeting = stdout.find("Logged in as: operator").expect("greeting");
    let motd = stdout.find("Maintenance window tonight.").expect("motd");
    let prompt = stdout.find("$ ").expect("prompt");
    assert!(greeting < motd && motd < prompt, "out of order: {stdout:?}");
}
