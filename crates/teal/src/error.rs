//! Error types for program construction and assembly.

use thiserror::Error;

/// Errors raised while building, assembling or optimizing a program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TealError {
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error("Duplicate label: {0}")]
    DuplicateLabel(String),

    #[error("Unsupported program version {version} (supported {min}..={max})")]
    UnsupportedVersion { version: u8, min: u8, max: u8 },

    #[error("{name} requires program version {required}, program is version {version}")]
    OpcodeUnavailable {
        name: String,
        required: u8,
        version: u8,
    },

    #[error("Backward branch to {label} requires program version 4, program is version {version}")]
    BackwardBranch { label: String, version: u8 },

    #[error("Branch to {label} is out of range: offset {offset}")]
    BranchOutOfRange { label: String, offset: i64 },

    #[error("Byte constant too long: {len} bytes (max {max})")]
    BytesTooLong { len: usize, max: usize },

    #[error("Opcode {0} is not a branch")]
    NotBranch(String),

    #[error("Opcode {0} takes immediate arguments")]
    MissingImmediate(String),

    #[error("Program too long: {len} bytes (max {max})")]
    ProgramTooLong { len: usize, max: usize },
}

pub type TealResult<T> = std::result::Result<T, TealError>;

impl TealError {
    pub fn opcode_unavailable(name: impl Into<String>, required: u8, version: u8) -> Self {
        Self::OpcodeUnavailable {
            name: name.into(),
            required,
            version,
        }
    }
}
