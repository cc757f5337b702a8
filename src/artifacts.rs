//! Writes compiled programs and the interface descriptor to disk.

use crate::error::{CalculatorError, CalculatorResult};
use avm_config::OutputConfig;
use avm_router::CompiledContract;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes `contract.json`, `approval.teal` and `clear.teal`, plus
/// `approval.bin` and `clear.bin` when bytecode output is enabled.
///
/// The output directory is created if missing. Returns the written paths in
/// write order.
pub fn write_artifacts(
    compiled: &CompiledContract,
    output: &OutputConfig,
) -> CalculatorResult<Vec<PathBuf>> {
    fs::create_dir_all(&output.dir).map_err(|source| CalculatorError::Io {
        path: output.dir.clone(),
        source,
    })?;

    let mut written = Vec::new();

    let json = compiled.contract.to_json_pretty()?;
    written.push(write_file(&output.contract_path(), json.as_bytes())?);
    written.push(write_file(
        &output.approval_path(),
        compiled.approval.to_teal().as_bytes(),
    )?);
    written.push(write_file(
        &output.clear_path(),
        compiled.clear.to_teal().as_bytes(),
    )?);

    if output.emit_bytecode {
        let approval = output.approval_path().with_extension("bin");
        let clear = output.clear_path().with_extension("bin");
        written.push(write_file(&approval, &compiled.approval_bytecode)?);
        written.push(write_file(&clear, &compiled.clear_bytecode)?);
    }

    Ok(written)
}

fn write_file(path: &Path, contents: &[u8]) -> CalculatorResult<PathBuf> {
    fs::write(path, contents).map_err(|source| CalculatorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(path.to_path_buf())
}
