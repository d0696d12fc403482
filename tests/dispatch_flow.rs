//! End-to-end dispatch checks against a scripted handler program.
//!
//! The stub below stands in for the external dispatch program. It logs
//! every invocation to `calls.log` and, when called as the resolve
//! handler, answers a small fixed grammar by writing action codes into
//! the slot record, exactly the way the real handlers talk back.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::time::Duration;

use assert_cmd::Command;
use tempfile::TempDir;

const HANDLER_SCRIPT: &str = r#"#!/bin/sh
echo "$1 $2" >> calls.log
if [ "$2" = "g=resolve" ]; then
    mkdir -p vfs/proc/2
    line=$(cat std/s_input)
    case "$line" in
        stat)   echo 1    > vfs/proc/2/action; echo 0    > vfs/proc/2/ext_action ;;
        sync*)  echo 48   > vfs/proc/2/action; echo 512  > vfs/proc/2/ext_action ;;
        acct)   echo 0    > vfs/proc/2/action; echo 2056 > vfs/proc/2/ext_action ;;
        bogus)  echo 1024 > vfs/proc/2/action; echo 0    > vfs/proc/2/ext_action ;;
    esac
fi
"#;

fn scripted_root() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("std")).unwrap();
    fs::write(root.path().join("std/login"), "operator\n").unwrap();

    let script = root.path().join("handlers.sh");
    fs::write(&script, HANDLER_SCRIPT).unwrap();
    let mut perms = fs::metadata(&script).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).unwrap();
    root
}

fn console_cmd(root: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("opsh").expect("binary under test");
    cmd.arg("-C")
        .arg(root.path())
        .arg("--handler-program")
        .arg("./handlers.sh")
        .env("RUST_LOG", "warn")
        .timeout(Duration::from_secs(10));
    cmd
}

fn calls(root: &TempDir) -> String {
    fs::read_to_string(root.path().join("calls.log")).unwrap_or_default()
}

#[test]
fn a_status_command_resolves_then_reports() {
    let root = scripted_root();

    console_cmd(&root).write_stdin("stat\nquit\n").assert().success();

    assert_eq!(calls(&root), "run g=resolve\nrun g=status_report\n");
    let input = fs::read_to_string(root.path().join("std/s_input")).unwrap();
    assert_eq!(input, "stat");
}

#[test]
fn commit_flags_fire_in_contract_order_with_write_files_last() {
    let root = scripted_root();

    console_cmd(&root).write_stdin("sync all\nquit\n").assert().success();

    // action 48 = update-nodes | update-devices, ext 512 = write-files.
    assert_eq!(
        calls(&root),
        "run g=resolve\n\
         commit g=device_admin\n\
         commit g=update_nodes\n\
         commit g=write_to_file\n"
    );
    let input = fs::read_to_string(root.path().join("std/s_input")).unwrap();
    assert_eq!(input, "sync all");
}

#[test]
fn extension_flags_run_their_handler_chains() {
    let root = scripted_root();

    console_cmd(&root).write_stdin("acct\nquit\n").assert().success();

    // ext 2056 = open-file | account.
    assert_eq!(
        calls(&root),
        "run g=resolve\n\
         run g=process_file_list\n\
         run g=account_info\n\
         commit g=account_commit\n"
    );
}

#[test]
fn the_print_errors_flag_routes_to_the_error_report() {
    let root = scripted_root();

    console_cmd(&root).write_stdin("bogus\nquit\n").assert().success();

    assert_eq!(calls(&root), "run g=resolve\nrun g=error_report\n");
}

#[test]
fn a_silent_resolve_is_reported_and_the_session_continues() {
    let root = scripted_root();

    let assert = console_cmd(&root).write_stdin("mystery\nquit\n").assert().success();

    // The stub wrote no codes for this line, so the read-back fails loudly.
    assert_eq!(calls(&root), "run g=resolve\n");
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("never written"), "{stdout:?}");
    assert!(stdout.contains("Bye."), "session should survive: {stdout:?}");
}
