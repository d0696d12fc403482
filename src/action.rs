//! Typed views over the raw action codes the resolve handler publishes.
//!
//! An `action` value packs two things into one integer: a mutually
//! exclusive primary action in the low nibble, decoded by exact equality,
//! and independent commit flags in the higher bits. `ext_action` is a
//! separate flag mask. Unassigned bits are dropped by every decoder.

use bitflags::bitflags;

use crate::handler::Handler;

/// Mask selecting the primary-action nibble of an `action` value.
pub const PRIMARY_MASK: u32 = 0x0f;

/// The mutually exclusive primary action carried in the low nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    None,
    PrintStatus,
    FileOp,
    WriteFiles,
    ProcessCommand,
    FormatText,
    DeviceStatus,
    ReadIndex,
    UserAdminOp,
    UserStatsOp,
    UserAccessOp,
    ReadPage,
}

impl PrimaryAction {
    /// Decode the low nibble of a raw `action` value. Nibble values past
    /// the enumeration (12..=15) decode to `Option::None`.
    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code & PRIMARY_MASK {
            0 => Self::None,
            1 => Self::PrintStatus,
            2 => Self::FileOp,
            3 => Self::WriteFiles,
            4 => Self::ProcessCommand,
            5 => Self::FormatText,
            6 => Self::DeviceStatus,
            7 => Self::ReadIndex,
            8 => Self::UserAdminOp,
            9 => Self::UserStatsOp,
            10 => Self::UserAccessOp,
            11 => Self::ReadPage,
            _ => return None,
        })
    }

    /// Handlers the PRIMARY phase runs for this action, in order.
    ///
    /// `None` and `WriteFiles` carry no mapping; `ReadIndex` is the one
    /// action that chains two handlers.
    pub fn handlers(self) -> &'static [Handler] {
        match self {
            Self::PrintStatus => &[Handler::StatusReport],
            Self::FileOp => &[Handler::FileOperation],
            Self::ProcessCommand => &[Handler::CommandProcessor],
            Self::FormatText => &[Handler::TextFileProcessor],
            Self::DeviceStatus => &[Handler::DeviceStatusReport],
            Self::ReadIndex => &[Handler::ReadIndices, Handler::FormatText],
            Self::UserAdminOp => &[Handler::UserAdmin],
            Self::UserStatsOp => &[Handler::UserStats],
            Self::UserAccessOp => &[Handler::UserAccess],
            Self::ReadPage => &[Handler::PageReader],
            Self::None | Self::WriteFiles => &[],
        }
    }
}

bitflags! {
    /// Commit flags packed above the primary nibble of `action`.
    ///
    /// Each set flag is honored independently of the others and of the
    /// primary action. Bits 8 and 13+ are unassigned and dropped on decode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CommitFlags: u32 {
        const UPDATE_NODES = 1 << 4;
        const UPDATE_DEVICES = 1 << 5;
        const UPDATE_USERS = 1 << 6;
        const UPDATE_LOGINS = 1 << 7;
        const PIPE_TO_FILE = 1 << 9;
        const PRINT_ERRORS = 1 << 10;
        const IO_EVENT = 1 << 11;
        const UA_EVENT = 1 << 12;
    }
}

bitflags! {
    /// Extension flags carried in `ext_action`, independent of `action`.
    ///
    /// Only `OPEN_FILE`, `ACCOUNT` and `WRITE_FILES` select handlers today;
    /// the rest are read by the external side and ignored here. Bit 10 is
    /// unassigned.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ExtFlags: u32 {
        const READ_IN = 1 << 0;
        const WRITE_IN = 1 << 1;
        const MAP_FILE = 1 << 2;
        const OPEN_FILE = 1 << 3;
        const READ_DIR = 1 << 4;
        const PIPE_TO = 1 << 5;
        const OPEN_DIR = 1 << 6;
        const READ_TREE = 1 << 7;
        const OPEN_TREE = 1 << 8;
        const WRITE_FILES = 1 << 9;
        const ACCOUNT = 1 << 11;
        const CHANGE_DIR = 1 << 12;
        const MOUNT_FS = 1 << 13;
        const SPAWN = 1 << 14;
    }
}

/// One raw `action` value with typed accessors for both of its halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionCode(u32);

impl ActionCode {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    /// The primary action, unless the nibble is out of range.
    pub fn primary(self) -> Option<PrimaryAction> {
        PrimaryAction::from_code(self.0)
    }

    /// The commit flags, with the primary nibble and unassigned bits dropped.
    pub fn commits(self) -> CommitFlags {
        CommitFlags::from_bits_truncate(self.0 & !PRIMARY_MASK)
    }

    pub fn has(self, flag: CommitFlags) -> bool {
        self.commits().contains(flag)
    }
}
