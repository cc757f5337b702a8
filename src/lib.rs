//! # Calculator
//!
//! An ARC-4 calculator application for the Algorand Virtual Machine.
//!
//! The contract exposes four `uint64` methods (`add`, `sub`, `mul`, `div`)
//! and creator-gated lifecycle handlers. This crate declares the contract,
//! compiles it to `approval.teal`, `clear.teal` and `contract.json`, and
//! provides a client that exercises the compiled programs on an in-memory
//! ledger.
//!
//! ## Quick Start
//!
//! ```rust
//! use calculator::prelude::*;
//!
//! let compiled = calculator::compile(&CompileConfig::default()).unwrap();
//! let mut client = CalculatorClient::deploy(&compiled, [1; 32]).unwrap();
//! assert_eq!(client.add(2, 3).unwrap(), 5);
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - protocol constants and the TOML compile configuration
//! - [`abi`] - ARC-4 types, selectors and the `contract.json` model
//! - [`teal`] - TEAL program model, assembler and optimizer
//! - [`vm`] - bytecode evaluator and in-memory ledger
//! - [`router`] - declarative ABI router compiler

#![warn(rustdoc::missing_crate_level_docs)]

pub use avm_abi as abi;
pub use avm_config as config;
pub use avm_router as router;
pub use avm_teal as teal;
pub use avm_vm as vm;

pub mod artifacts;
pub mod client;
pub mod contract;
pub mod error;

pub use error::{CalculatorError, CalculatorResult};

use avm_config::CompileConfig;
use avm_router::{CompiledContract, OptimizeOptions};
use tracing::info;

/// Common imports for calculator users
pub mod prelude {
    pub use crate::artifacts::write_artifacts;
    pub use crate::client::{AppClient, CalculatorClient};
    pub use crate::config::{CompileConfig, OutputConfig};
    pub use crate::error::{CalculatorError, CalculatorResult};
    pub use crate::router::CompiledContract;
    pub use crate::vm::{Address, Ledger};
}

/// Compiles the calculator with the version and optimizations in `config`.
pub fn compile(config: &CompileConfig) -> CalculatorResult<CompiledContract> {
    config.validate()?;

    let compiled = contract::router()?
        .compile_program(config.version, OptimizeOptions::from(&config.optimize))?;

    info!(
        version = config.version,
        scratch_slots = config.optimize.scratch_slots,
        approval_bytes = compiled.approval_bytecode.len(),
        clear_bytes = compiled.clear_bytecode.len(),
        "compiled calculator"
    );

    Ok(compiled)
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use avm_config::OptimizeConfig;

    #[test]
    fn test_compile_defaults() {
        let compiled = compile(&CompileConfig::default()).unwrap();
        assert!(compiled.approval.to_teal().starts_with("#pragma version 6\n"));
        assert_eq!(compiled.clear.to_teal(), "#pragma version 6\nint 0\nreturn");
        assert_eq!(compiled.contract.name, "calculator");
    }

    #[test]
    fn test_optimization_shrinks_approval() {
        let optimized = compile(&CompileConfig::default()).unwrap();
        let plain = compile(&CompileConfig {
            optimize: OptimizeConfig {
                scratch_slots: false,
            },
            ..Default::default()
        })
        .unwrap();
        assert!(optimized.approval_bytecode.len() < plain.approval_bytecode.len());
        assert_eq!(optimized.clear_bytecode, plain.clear_bytecode);
    }

    #[test]
    fn test_invalid_version_rejected() {
        let config = CompileConfig {
            version: 1,
            ..Default::default()
        };
        assert!(matches!(compile(&config), Err(CalculatorError::Config(_))));
    }
}
