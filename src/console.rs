//! The interactive front end: prompt, built-ins, dispatch.
//!
//! Two commands are handled in-process. `quit` ends the session and `sh`
//! hands its remainder to the host shell untouched. Every other line goes
//! through the dispatch engine. Dispatch failures are printed and the
//! session keeps going; only I/O on our own output ends it.

use std::io::{BufRead, Write};

use anyhow::Result;
use log::debug;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::dispatch::Dispatcher;
use crate::handler::HandlerRunner;
use crate::host::HostExec;
use crate::parser::{ParsedLine, parse_line};
use crate::store::StateStore;

/// Prompt written before every read.
pub const PROMPT: &str = "$ ";

/// Farewell printed by the `quit` built-in.
pub const FAREWELL: &str = "Bye.";

/// Result of evaluating a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Continue,
    Quit,
}

/// The prompt loop. Owns the collaborators one session needs and feeds
/// lines through the built-in check and the dispatcher.
pub struct Console<W: Write> {
    store: Box<dyn StateStore>,
    handlers: Box<dyn HandlerRunner>,
    host: Box<dyn HostExec>,
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(
        store: Box<dyn StateStore>,
        handlers: Box<dyn HandlerRunner>,
        host: Box<dyn HostExec>,
        out: W,
    ) -> Self {
        Self { store, handlers, host, out }
    }

    /// Evaluate one raw input line (no trailing newline).
    pub fn eval(&mut self, line: &str) -> Result<Status> {
        match parse_line(line) {
            ParsedLine::Empty => Ok(Status::Continue),
            ParsedLine::Quit => {
                writeln!(self.out, "{FAREWELL}")?;
                Ok(Status::Quit)
            }
            ParsedLine::HostCommand(command) => {
                // Raw passthrough; the child owns the terminal. Only a
                // spawn failure is ours to report.
                if let Err(e) = self.host.run(command) {
                    writeln!(self.out, "sh: {e:#}")?;
                }
                Ok(Status::Continue)
            }
            ParsedLine::Dispatch => {
                match Dispatcher::new(self.store.as_mut(), self.handlers.as_mut()).dispatch(line) {
                    Ok(outcome) => debug!("dispatch finished: {outcome:?}"),
                    Err(e) => writeln!(self.out, "opsh: {e:#}")?,
                }
                Ok(Status::Continue)
            }
        }
    }

    /// Consume lines from a reader until EOF or `quit`. Used when input is
    /// piped in; the prompt is still written so a transcript reads like an
    /// interactive session.
    pub fn run_script<R: BufRead>(&mut self, mut input: R) -> Result<()> {
        let mut line = String::new();
        loop {
            write!(self.out, "{PROMPT}")?;
            self.out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(self.out)?;
                return Ok(());
            }
            if self.eval(line.trim_end_matches(['\r', '\n']))? == Status::Quit {
                return Ok(());
            }
        }
    }

    /// Interactive loop with line editing and history.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    if self.eval(&line)? == Status::Quit {
                        return Ok(());
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    return Ok(());
                }
                Err(e) => {
                    return Err(e.into());
                }
            }
        }
    }

    /// Consume the console and hand back its output writer.
    pub fn into_out(self) -> W {
        self.out
    }
}
