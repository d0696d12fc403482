//! The per-slot state record the console and the external handlers share.
//!
//! The dispatcher persists each raw command line, the resolve handler
//! answers by writing numeric action codes into the slot record, and the
//! dispatcher reads them back. The record doubles as a side channel: any
//! handler may rewrite `action` mid-sequence, and the dispatcher re-reads
//! it between phases.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::trace;
use thiserror::Error;

/// Slot the console claims when none is configured.
pub const DEFAULT_SLOT: u32 = 2;

/// Numeric fields of the slot record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Action,
    ExtAction,
}

impl Field {
    /// File name of the field inside the slot directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::ExtAction => "ext_action",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Failures surfaced by a state store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The field was never written for this slot. Never defaulted to zero;
    /// a resolve handler that failed to publish must surface here.
    #[error("slot field `{0}` was never written")]
    MissingField(Field),
    /// The field exists but does not start with a decimal integer.
    #[error("slot field `{field}` holds non-numeric data {text:?}")]
    MalformedField { field: Field, text: String },
    #[error("state store i/o: {0}")]
    Io(#[from] io::Error),
}

/// The record one command line is dispatched through.
///
/// Writes replace the whole value. `write_input` persists the raw command
/// line for the resolve handler; the numeric fields carry its answer back.
pub trait StateStore {
    /// Persist the raw command line for the resolve handler to consume.
    fn write_input(&mut self, line: &str) -> Result<(), StoreError>;

    /// Overwrite one numeric field of the slot record.
    fn write_field(&mut self, field: Field, value: u32) -> Result<(), StoreError>;

    /// Read one numeric field of the slot record.
    fn read_field(&self, field: Field) -> Result<u32, StoreError>;
}

/// File-backed store over the record layout the handler programs expect:
/// `vfs/proc/<slot>/<field>` for the numeric fields and `std/s_input` for
/// the raw command line, all relative to the session root.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
    slot: u32,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>, slot: u32) -> Self {
        Self { root: root.into(), slot }
    }

    fn field_path(&self, field: Field) -> PathBuf {
        self.root
            .join("vfs")
            .join("proc")
            .join(self.slot.to_string())
            .join(field.file_name())
    }

    fn input_path(&self) -> PathBuf {
        self.root.join("std").join("s_input")
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

impl StateStore for FsStore {
    fn write_input(&mut self, line: &str) -> Result<(), StoreError> {
        trace!("slot {}: input <- {line:?}", self.slot);
        write_file(&self.input_path(), line)
    }

    fn write_field(&mut self, field: Field, value: u32) -> Result<(), StoreError> {
        trace!("slot {}: {field} <- {value}", self.slot);
        write_file(&self.field_path(field), &value.to_string())
    }

    fn read_field(&self, field: Field) -> Result<u32, StoreError> {
        let text = match fs::read_to_string(self.field_path(field)) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::MissingField(field));
            }
            Err(e) => return Err(e.into()),
        };
        parse_field(field, &text)
    }
}

/// Fields hold ASCII decimal. Only the first token counts, so a trailing
/// newline from a handler's `echo` is accepted.
fn parse_field(field: Field, text: &str) -> Result<u32, StoreError> {
    text.split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| StoreError::MalformedField {
            field,
            text: text.trim_end().to_owned(),
        })
}

/// In-memory store for tests and embedding.
///
/// Clones share one underlying record, the way separate processes share
/// one slot directory: keep a clone around to observe or rewrite what the
/// dispatcher sees mid-sequence.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    inner: Rc<RefCell<SlotRecord>>,
}

#[derive(Debug, Default)]
struct SlotRecord {
    fields: HashMap<Field, u32>,
    input: Option<String>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last command line persisted through `write_input`, if any.
    pub fn input(&self) -> Option<String> {
        self.inner.borrow().input.clone()
    }

    /// True while nothing has been written at all.
    pub fn is_untouched(&self) -> bool {
        let record = self.inner.borrow();
        record.fields.is_empty() && record.input.is_none()
    }
}

impl StateStore for MemStore {
    fn write_input(&mut self, line: &str) -> Result<(), StoreError> {
        self.inner.borrow_mut().input = Some(line.to_owned());
        Ok(())
    }

    fn write_field(&mut self, field: Field, value: u32) -> Result<(), StoreError> {
        self.inner.borrow_mut().fields.insert(field, value);
        Ok(())
    }

    fn read_field(&self, field: Field) -> Result<u32, StoreError> {
        self.inner
            .borrow()
            .fields
            .get(&field)
            .copied()
            .ok_or(StoreError::MissingField(field))
    }
}
