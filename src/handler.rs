//! The catalog of external handlers and the capability that invokes them.
//!
//! Handlers are separate programs. The console never implements their
//! work; it only names which one runs next. [`ExecRunner`] delegates each
//! invocation to one dispatch program on the host, [`RecordingRunner`]
//! swallows them for tests and embedding.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use anyhow::Result;
use log::{debug, warn};

use crate::host::HostExec;

/// Phase a handler belongs to; selects the verb the dispatch program is
/// called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeKind {
    Run,
    Commit,
}

impl InvokeKind {
    fn verb(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Commit => "commit",
        }
    }
}

/// Every external operation the dispatch engine can call on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    /// Turns the persisted input line into action codes.
    Resolve,
    /// Reports accumulated errors; the only thing run after an abort.
    ErrorReport,
    StatusReport,
    FileOperation,
    CommandProcessor,
    DeviceStatusReport,
    ReadIndices,
    FormatText,
    TextFileProcessor,
    UserAdmin,
    UserStats,
    UserAccess,
    PageReader,
    ProcessFileList,
    AccountInfo,
    AccountCommit,
    DeviceAdmin,
    WriteToFile,
    NodeUpdater,
    UserUpdater,
    LoginUpdater,
}

impl Handler {
    /// Name the dispatch program knows this handler by.
    pub fn name(self) -> &'static str {
        match self {
            Self::Resolve => "resolve",
            Self::ErrorReport => "error_report",
            Self::StatusReport => "status_report",
            Self::FileOperation => "file_operation",
            Self::CommandProcessor => "process_command",
            Self::DeviceStatusReport => "device_status",
            Self::ReadIndices => "read_indices",
            Self::FormatText => "format_text",
            Self::TextFileProcessor => "process_text_files",
            Self::UserAdmin => "user_admin",
            Self::UserStats => "user_stats",
            Self::UserAccess => "user_access",
            Self::PageReader => "read_page",
            Self::ProcessFileList => "process_file_list",
            Self::AccountInfo => "account_info",
            Self::AccountCommit => "account_commit",
            Self::DeviceAdmin => "device_admin",
            Self::WriteToFile => "write_to_file",
            Self::NodeUpdater => "update_nodes",
            Self::UserUpdater => "update_users",
            Self::LoginUpdater => "update_logins",
        }
    }

    pub fn kind(self) -> InvokeKind {
        match self {
            Self::AccountCommit
            | Self::DeviceAdmin
            | Self::WriteToFile
            | Self::NodeUpdater
            | Self::UserUpdater
            | Self::LoginUpdater => InvokeKind::Commit,
            _ => InvokeKind::Run,
        }
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability the dispatch engine drives handlers through.
pub trait HandlerRunner {
    /// Invoke one handler and block until it finishes. An error means the
    /// handler could not be started at all; handlers signal their own
    /// failures through the slot record, not through exit codes.
    fn invoke(&mut self, handler: Handler) -> Result<()>;
}

/// Production runner: every handler goes through one external dispatch
/// program (`make` unless configured otherwise), called as
/// `<program> <run|commit> g=<name>` in the session root.
pub struct ExecRunner<X: HostExec> {
    host: X,
    program: String,
}

impl<X: HostExec> ExecRunner<X> {
    pub fn new(host: X, program: impl Into<String>) -> Self {
        Self { host, program: program.into() }
    }

    fn command_line(&self, handler: Handler) -> String {
        format!("{} {} g={}", self.program, handler.kind().verb(), handler.name())
    }
}

impl<X: HostExec> HandlerRunner for ExecRunner<X> {
    fn invoke(&mut self, handler: Handler) -> Result<()> {
        let command_line = self.command_line(handler);
        debug!("handler {handler}: {command_line}");
        let code = self.host.run(&command_line)?;
        if code != 0 {
            // Not an error here; the handler contract reports through the
            // slot record.
            warn!("handler {handler} exited with status {code}");
        }
        Ok(())
    }
}

/// Runner that does nothing but remember the invocation order.
///
/// Clones share the same log, so callers can keep one and hand the other
/// to a console.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    calls: Rc<RefCell<Vec<Handler>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the handlers invoked so far, in order.
    pub fn calls(&self) -> Vec<Handler> {
        self.calls.borrow().clone()
    }
}

impl HandlerRunner for RecordingRunner {
    fn invoke(&mut self, handler: Handler) -> Result<()> {
        self.calls.borrow_mut().push(handler);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ExitCode;

    #[derive(Default)]
    struct FakeHost {
        commands: Vec<String>,
        exit_code: ExitCode,
    }

    impl HostExec for FakeHost {
        fn run(&mut self, command_line: &str) -> Result<ExitCode> {
            self.commands.push(command_line.to_owned());
            Ok(self.exit_code)
        }
    }

    #[test]
    fn run_handlers_use_the_run_verb() {
        let mut runner = ExecRunner::new(FakeHost::default(), "make");
        runner.invoke(Handler::Resolve).unwrap();
        runner.invoke(Handler::StatusReport).unwrap();
        assert_eq!(runner.host.commands, ["make run g=resolve", "make run g=status_report"]);
    }

    #[test]
    fn commit_handlers_use_the_commit_verb() {
        let mut runner = ExecRunner::new(FakeHost::default(), "./handlers.sh");
        runner.invoke(Handler::LoginUpdater).unwrap();
        assert_eq!(runner.host.commands, ["./handlers.sh commit g=update_logins"]);
    }

    #[test]
    fn nonzero_handler_exits_are_not_invocation_errors() {
        let mut runner = ExecRunner::new(FakeHost { exit_code: 2, ..FakeHost::default() }, "make");
        runner.invoke(Handler::AccountCommit).unwrap();
    }

    #[test]
    fn recording_runner_clones_share_the_log() {
        let observer = RecordingRunner::new();
        let mut runner = observer.clone();
        runner.invoke(Handler::Resolve).unwrap();
        runner.invoke(Handler::ErrorReport).unwrap();
        assert_eq!(observer.calls(), vec![Handler::Resolve, Handler::ErrorReport]);
    }
}
