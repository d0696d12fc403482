//! Host command execution, kept behind one explicit capability.
//!
//! Exactly two call sites exist: the `sh` built-in and the production
//! handler runner. Nothing else in the crate spawns processes.

use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};

/// Conventional process exit code.
pub type ExitCode = i32;

/// Capability for running a raw command line on the host.
pub trait HostExec {
    /// Run `command_line` through the platform shell, inheriting the
    /// console's standard streams, and wait for it to finish.
    fn run(&mut self, command_line: &str) -> Result<ExitCode>;
}

/// Platform-shell implementation of [`HostExec`].
///
/// Commands run with the session root as working directory so handler
/// programs and `sh` escapes both see the tree they expect.
#[derive(Debug, Clone)]
pub struct SystemShell {
    cwd: PathBuf,
}

impl SystemShell {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

impl HostExec for SystemShell {
    fn run(&mut self, command_line: &str) -> Result<ExitCode> {
        let status = shell_command(command_line)
            .current_dir(&self.cwd)
            .status()
            .with_context(|| format!("failed to run {command_line:?}"))?;
        match status.code() {
            Some(code) => Ok(code),
            None => Ok(terminated_by_signal(status)),
        }
    }
}

#[cfg(unix)]
fn shell_command(command_line: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(command_line);
    command
}

#[cfg(not(unix))]
fn shell_command(command_line: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(command_line);
    command
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;

    if let Some(signal) = exit_status.signal() {
        128 + signal
    } else if exit_status.core_dumped() {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> ExitCode {
    -1
}
