//! Error types for the calculator package.

use avm_abi::AbiError;
use avm_config::ConfigError;
use avm_router::RouterError;
use avm_vm::LedgerError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("compilation failed: {0}")]
    Router(#[from] RouterError),

    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),

    #[error("call failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("{method} takes {expected} arguments, got {actual}")]
    ArgumentCount {
        method: String,
        expected: usize,
        actual: usize,
    },

    #[error("{0} returned no value")]
    MissingReturn(String),
}

pub type CalculatorResult<T> = std::result::Result<T, CalculatorError>;
