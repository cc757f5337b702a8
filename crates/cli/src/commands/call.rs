//! Call - deploy on an in-memory ledger and invoke one method

use super::CommandResult;
use crate::args::Operation;
use anyhow::Context;
use avm_config::{CompileConfig, ADDRESS_SIZE};
use avm_vm::Address;
use calculator::client::CalculatorClient;
use tracing::info;

/// Account that deploys and calls the simulated application
pub const SIMULATION_SENDER: Address = [1; ADDRESS_SIZE];

pub fn call(config: &CompileConfig, operation: Operation, a: u64, b: u64) -> CommandResult {
    let compiled = calculator::compile(config).context("compiling calculator")?;
    let mut client = CalculatorClient::deploy(&compiled, SIMULATION_SENDER)
        .context("deploying calculator")?;
    info!(app_id = client.app().app_id(), "deployed calculator");

    let method = operation.method_name();
    let result = client
        .binary(method, a, b)
        .with_context(|| format!("{}({}, {}) aborted", method, a, b))?;

    Ok(format!("{}({}, {}) = {}", method, a, b, result))
}
