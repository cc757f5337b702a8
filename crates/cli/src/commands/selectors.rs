//! Selectors - list method signatures and their selectors

use super::CommandResult;
use anyhow::Context;

pub fn selectors() -> CommandResult {
    let contract = calculator::contract::router()
        .context("building calculator")?
        .contract();

    let mut output = String::new();
    for method in &contract.methods {
        output.push_str(&format!(
            "0x{}  {}\n",
            hex::encode(method.selector()),
            method.signature()
        ));
    }
    Ok(output.trim_end().to_string())
}
