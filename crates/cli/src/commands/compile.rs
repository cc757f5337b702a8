//! Compile - write the calculator artifacts

use super::CommandResult;
use crate::args::CompileArgs;
use anyhow::Context;
use avm_config::CompileConfig;
use calculator::artifacts::write_artifacts;
use std::path::Path;

/// Config file read when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "calculator.toml";

/// Loads the compile configuration and applies the command-line overrides.
pub fn load_config(args: &CompileArgs) -> anyhow::Result<CompileConfig> {
    let path = args
        .config
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    let mut config = CompileConfig::load(path)
        .with_context(|| format!("loading config {}", path.display()))?;

    if let Some(dir) = &args.out_dir {
        config.output.dir = dir.clone();
    }
    if let Some(version) = args.version {
        config.version = version;
    }
    if args.no_optimize {
        config.optimize.scratch_slots = false;
    }
    if args.bytecode {
        config.output.emit_bytecode = true;
    }

    config.validate().context("invalid command-line overrides")?;
    Ok(config)
}

pub fn compile(config: &CompileConfig) -> CommandResult {
    let compiled = calculator::compile(config).context("compiling calculator")?;
    let written = write_artifacts(&compiled, &config.output).with_context(|| {
        format!("writing artifacts to {}", config.output.dir.display())
    })?;

    let mut output = String::new();
    for path in written {
        output.push_str(&format!("wrote {}\n", path.display()));
    }
    Ok(output.trim_end().to_string())
}
