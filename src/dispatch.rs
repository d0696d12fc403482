//! The action-flag dispatch engine.
//!
//! One command line flows through a fixed sequence: persist the line,
//! run the resolve handler, read the action codes back, then PRIMARY,
//! EXTENSION and COMMIT phases in that order. The print-errors flag is
//! checked twice, on the value resolve produced and again on a re-read
//! before COMMIT; either hit aborts everything that remains and routes to
//! the error-report handler instead.

use anyhow::{Context, Result};
use log::{debug, trace};

use crate::action::{ActionCode, CommitFlags, ExtFlags, PRIMARY_MASK};
use crate::handler::{Handler, HandlerRunner};
use crate::store::{Field, StateStore};

/// Extension flags that select handlers, walked in ascending bit order.
const EXTENSION_DISPATCH: &[(ExtFlags, &[Handler])] = &[
    (ExtFlags::OPEN_FILE, &[Handler::ProcessFileList]),
    (ExtFlags::ACCOUNT, &[Handler::AccountInfo, Handler::AccountCommit]),
];

/// Commit flags and their handlers, walked in exactly this order. The
/// order is part of the dispatch contract and is not the numeric bit
/// order.
const COMMIT_DISPATCH: &[(CommitFlags, Handler)] = &[
    (CommitFlags::UPDATE_DEVICES, Handler::DeviceAdmin),
    (CommitFlags::PIPE_TO_FILE, Handler::WriteToFile),
    (CommitFlags::UPDATE_NODES, Handler::NodeUpdater),
    (CommitFlags::UPDATE_USERS, Handler::UserUpdater),
    (CommitFlags::UPDATE_LOGINS, Handler::LoginUpdater),
];

/// How one dispatched line finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every phase the codes selected ran.
    Completed,
    /// A print-errors flag cut the sequence short; past that point only
    /// the error-report handler ran.
    Aborted,
}

/// Drives one command line through the phase sequence against an injected
/// state store and handler runner.
pub struct Dispatcher<'a> {
    store: &'a mut dyn StateStore,
    handlers: &'a mut dyn HandlerRunner,
}

impl<'a> Dispatcher<'a> {
    pub fn new(store: &'a mut dyn StateStore, handlers: &'a mut dyn HandlerRunner) -> Self {
        Self { store, handlers }
    }

    /// Run the full sequence for one raw command line.
    ///
    /// `action` is read twice: handlers answer through the slot record, so
    /// the run phases may have rewritten it. COMMIT acts on the re-read
    /// value, while the write-files extension check keeps using the
    /// `ext_action` captured right after resolve.
    pub fn dispatch(&mut self, line: &str) -> Result<Outcome> {
        self.store.write_input(line).context("persisting command input")?;
        self.handlers.invoke(Handler::Resolve)?;

        let action = ActionCode::from_raw(
            self.store
                .read_field(Field::Action)
                .context("reading action after resolve")?,
        );
        let ext_raw = self
            .store
            .read_field(Field::ExtAction)
            .context("reading ext_action after resolve")?;
        let ext = ExtFlags::from_bits_truncate(ext_raw);
        trace!("resolved action={:#x} ext_action={ext_raw:#x}", action.raw());

        if action.has(CommitFlags::PRINT_ERRORS) {
            self.handlers.invoke(Handler::ErrorReport)?;
            return Ok(Outcome::Aborted);
        }

        self.run_primary(action)?;
        self.run_extensions(ext_raw, ext)?;

        let action_after_run = ActionCode::from_raw(
            self.store
                .read_field(Field::Action)
                .context("re-reading action before commit")?,
        );
        if action_after_run.has(CommitFlags::PRINT_ERRORS) {
            self.handlers.invoke(Handler::ErrorReport)?;
            return Ok(Outcome::Aborted);
        }

        self.run_commits(action_after_run, ext)?;
        Ok(Outcome::Completed)
    }

    fn run_primary(&mut self, action: ActionCode) -> Result<()> {
        let Some(primary) = action.primary() else {
            debug!("primary action {} has no enumerated case, skipping", action.raw() & PRIMARY_MASK);
            return Ok(());
        };
        for &handler in primary.handlers() {
            self.handlers.invoke(handler)?;
        }
        Ok(())
    }

    fn run_extensions(&mut self, ext_raw: u32, ext: ExtFlags) -> Result<()> {
        for &(flag, handlers) in EXTENSION_DISPATCH {
            if ext.contains(flag) {
                for &handler in handlers {
                    self.handlers.invoke(handler)?;
                }
            }
        }
        let handled = ExtFlags::OPEN_FILE | ExtFlags::ACCOUNT | ExtFlags::WRITE_FILES;
        let unmatched = ext_raw & !handled.bits();
        if unmatched != 0 {
            debug!("extension bits {unmatched:#x} select no handler, ignored");
        }
        Ok(())
    }

    fn run_commits(&mut self, action: ActionCode, ext: ExtFlags) -> Result<()> {
        let commits = action.commits();
        for &(flag, handler) in COMMIT_DISPATCH {
            if commits.contains(flag) {
                self.handlers.invoke(handler)?;
            }
        }
        // Last of all, and keyed off the original ext_action rather than
        // the re-read action.
        if ext.contains(ExtFlags::WRITE_FILES) {
            self.handlers.invoke(Handler::WriteToFile)?;
        }
        Ok(())
    }
}
