//! AVM Configuration Module
//!
//! This module provides the protocol constants shared by the assembler and the
//! evaluator, plus the TOML-backed configuration used when compiling contracts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Program version used when none is configured
pub const DEFAULT_TEAL_VERSION: u8 = 6;
/// Oldest program version the assembler will emit (first version with application calls)
pub const MIN_TEAL_VERSION: u8 = 2;
/// Newest program version the assembler and evaluator understand
pub const MAX_TEAL_VERSION: u8 = 8;

/// Evaluation limits
pub const MAX_STACK_DEPTH: usize = 1000;
pub const MAX_SCRATCH_SLOTS: usize = 256;
pub const MAX_CALLSTACK_DEPTH: usize = 1024;
pub const MAX_BYTE_SLICE_LEN: usize = 4096;
/// Opcode budget of a single application call
pub const MAX_APP_PROGRAM_COST: u64 = 700;
pub const MAX_LOG_CALLS: usize = 32;
pub const MAX_LOG_SIZE: usize = 1024;

/// Transaction limits
pub const MAX_APP_ARGS: usize = 16;
pub const MAX_APP_TOTAL_ARG_LEN: usize = 2048;
pub const MAX_APP_PROGRAM_LEN: usize = 2048;

/// Size of an account address (ed25519 public key) in bytes
pub const ADDRESS_SIZE: usize = 32;

/// Prefix of the log entry carrying an ARC-4 method return value
/// (first four bytes of SHA-512/256 of "return").
pub const ARC4_RETURN_PREFIX: [u8; 4] = [0x15, 0x1f, 0x7c, 0x75];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Log level accepted by the `logging.level` setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

/// Compiler optimisation switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeConfig {
    /// Drop scratch slots that are stored and immediately loaded exactly once
    pub scratch_slots: bool,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self { scratch_slots: true }
    }
}

/// Where compiled artifacts are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub contract_file: String,
    pub approval_file: String,
    pub clear_file: String,
    /// Also write assembled bytecode next to the TEAL sources
    pub emit_bytecode: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            contract_file: "contract.json".to_string(),
            approval_file: "approval.teal".to_string(),
            clear_file: "clear.teal".to_string(),
            emit_bytecode: false,
        }
    }
}

impl OutputConfig {
    pub fn contract_path(&self) -> PathBuf {
        self.dir.join(&self.contract_file)
    }

    pub fn approval_path(&self) -> PathBuf {
        self.dir.join(&self.approval_file)
    }

    pub fn clear_path(&self) -> PathBuf {
        self.dir.join(&self.clear_file)
    }
}

/// Logger configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

/// Compile configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Program version written in the `#pragma version` header
    pub version: u8,
    pub optimize: OptimizeConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_TEAL_VERSION,
            optimize: OptimizeConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl CompileConfig {
    /// Loads and validates a configuration file. A missing file yields the defaults.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: CompileConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(MIN_TEAL_VERSION..=MAX_TEAL_VERSION).contains(&self.version) {
            return Err(ConfigError::Invalid(format!(
                "version {} outside supported range {}..={}",
                self.version, MIN_TEAL_VERSION, MAX_TEAL_VERSION
            )));
        }

        let files = [
            ("output.contract_file", &self.output.contract_file),
            ("output.approval_file", &self.output.approval_file),
            ("output.clear_file", &self.output.clear_file),
        ];
        for (key, value) in files {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", key)));
            }
        }

        Ok(())
    }
}
