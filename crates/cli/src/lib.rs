//! Calculator CLI Library
//!
//! Argument parsing and command implementations for the `calculator` binary.

pub mod args;
pub mod commands;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
