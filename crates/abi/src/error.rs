//! Error types for ABI operations.

use thiserror::Error;

/// Errors raised while parsing, encoding or decoding ARC-4 data.
#[derive(Error, Debug)]
pub enum AbiError {
    /// Type string is not a supported ARC-4 type.
    #[error("Invalid ABI type: {0}")]
    InvalidType(String),

    /// Method signature cannot be parsed.
    #[error("Invalid method signature: {0}")]
    InvalidSignature(String),

    /// Encoded value has the wrong length for its type.
    #[error("Invalid encoded length for {kind}: expected {expected}, got {actual}")]
    InvalidLength {
        /// ABI type name.
        kind: String,
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        actual: usize,
    },

    /// Value does not fit the declared type.
    #[error("Value {value} does not fit {kind}")]
    OutOfRange {
        /// ABI type name.
        kind: String,
        /// Offending value.
        value: String,
    },

    /// Value variant does not match the declared type.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Declared type.
        expected: String,
        /// Supplied value kind.
        actual: String,
    },

    /// Contract descriptor is inconsistent.
    #[error("Invalid contract: {0}")]
    InvalidContract(String),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for ABI operations.
pub type AbiResult<T> = std::result::Result<T, AbiError>;
