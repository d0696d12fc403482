//! An operator console that turns typed commands into flag-dispatched
//! actions carried out by external handler programs.
//!
//! One line of input either hits a built-in (`quit`, `sh`) or goes to the
//! dispatch engine: the line is persisted into a per-slot state record, an
//! external resolve handler turns it into numeric action codes, and the
//! [`Dispatcher`] walks the fixed phase sequence those codes select. The
//! record is also the handlers' answer channel, so `action` is re-read
//! between the run and commit phases.
//!
//! The crate is a library plus a thin binary. Everything the dispatcher
//! touches sits behind a trait (state store, handler runner, host
//! execution), so the engine runs against in-memory stand-ins in tests and
//! against the real slot directory and dispatch program in production.

pub mod action;
pub mod console;
pub mod dispatch;
pub mod handler;
pub mod host;
pub mod parser;
pub mod session;
pub mod store;

pub use console::{Console, Status};
pub use dispatch::{Dispatcher, Outcome};
