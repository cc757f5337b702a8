//! Error types for decoding and evaluation.

use thiserror::Error;

/// Errors raised while decoding bytecode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("decode: empty program")]
    EmptyProgram,

    #[error("decode: unsupported program version {0}")]
    UnsupportedVersion(u64),

    #[error("decode: invalid opcode 0x{byte:02x} at {pc}")]
    InvalidOpCode { pc: usize, byte: u8 },

    #[error("decode: immediate of {name} truncated at {pc}")]
    Truncated { pc: usize, name: &'static str },

    #[error("decode: uvarint overflow at {pc}")]
    VarintOverflow { pc: usize },

    #[error("decode: {name} at {pc} requires version {required}, program is version {version}")]
    OpcodeUnavailable {
        pc: usize,
        name: &'static str,
        required: u8,
        version: u8,
    },
}

/// Faults raised during evaluation. Any fault aborts the program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("stack underflow")]
    StackUnderflow,

    #[error("stack overflow: depth exceeds {max}")]
    StackOverflow { max: usize },

    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{op} overflowed")]
    Overflow { op: &'static str },

    #[error("{op} went negative")]
    Underflow { op: &'static str },

    #[error("{op} by zero")]
    DivisionByZero { op: &'static str },

    #[error("err opcode executed")]
    ErrOpcode,

    #[error("assert failed at {pc}")]
    AssertFailed { pc: usize },

    #[error("dynamic cost budget exceeded: {cost} > {budget}")]
    BudgetExceeded { cost: u64, budget: u64 },

    #[error("branch from {pc} to {target} is not an instruction boundary")]
    InvalidBranch { pc: usize, target: i64 },

    #[error("backward branch at {pc} is not allowed before version 4")]
    BackwardBranch { pc: usize },

    #[error("call stack overflow: depth exceeds {max}")]
    CallStackOverflow { max: usize },

    #[error("retsub with empty call stack")]
    CallStackUnderflow,

    #[error("log limit exceeded: {reason}")]
    LogLimit { reason: String },

    #[error("byte slice too long: {len} > {max}")]
    ByteSliceTooLong { len: usize, max: usize },

    #[error("btoi input too long: {len} bytes")]
    BtoiTooLong { len: usize },

    #[error("invalid {opcode} field {field}")]
    InvalidField { opcode: &'static str, field: u8 },

    #[error("{field} index {index} out of range (len {len})")]
    IndexOutOfRange {
        field: &'static str,
        index: usize,
        len: usize,
    },

    #[error("program ended with invalid stack: {0}")]
    InvalidFinalStack(String),

    #[error("unsupported opcode {0}")]
    UnsupportedOpcode(String),
}

pub type VmResult<T> = std::result::Result<T, VmError>;

impl VmError {
    pub fn type_mismatch(expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch { expected, actual }
    }

    pub fn log_limit(reason: impl Into<String>) -> Self {
        Self::LogLimit {
            reason: reason.into(),
        }
    }
}
