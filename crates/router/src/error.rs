//! Error types for router construction and compilation.

use avm_abi::AbiError;
use avm_teal::TealError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Duplicate method: {0}")]
    DuplicateMethod(String),

    #[error("Unsupported ABI type {kind} in {context}")]
    UnsupportedType { kind: String, context: String },

    #[error("Type mismatch in {context}: expected {expected}, got {actual}")]
    TypeMismatch {
        context: String,
        expected: String,
        actual: String,
    },

    #[error("Argument {index} out of range: {count} arguments available")]
    ArgumentOutOfRange { index: usize, count: usize },

    #[error("Method {method} takes {count} arguments (max {max})")]
    TooManyArguments {
        method: String,
        count: usize,
        max: usize,
    },

    #[error("Invalid call config for {action}: {reason}")]
    InvalidCallConfig { action: String, reason: String },

    #[error("Scratch space exhausted")]
    ScratchExhausted,

    #[error(transparent)]
    Teal(#[from] TealError),

    #[error(transparent)]
    Abi(#[from] AbiError),
}

pub type RouterResult<T> = std::result::Result<T, RouterError>;

impl RouterError {
    pub fn type_mismatch(
        context: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Self::TypeMismatch {
            context: context.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
