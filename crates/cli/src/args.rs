use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for the calculator CLI
#[derive(Parser, Debug, Clone)]
#[command(
    name = "calculator",
    version = env!("CARGO_PKG_VERSION"),
    about = "Compile the ARC-4 calculator contract and simulate calls against it"
)]
pub struct CliArgs {
    /// Overrides `logging.level` from the config file
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write approval.teal, clear.teal and contract.json
    Compile(CompileArgs),

    /// Deploy on a fresh in-memory ledger and call one method
    Call {
        #[arg(value_enum)]
        method: Operation,
        a: u64,
        b: u64,
    },

    /// Print every method signature with its selector
    Selectors,
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileArgs {
    /// TOML compile configuration; a missing file yields the defaults
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Overrides `output.dir`
    #[arg(short = 'o', long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Overrides the program version
    #[arg(long = "version", value_name = "N")]
    pub version: Option<u8>,

    /// Disables scratch slot optimization
    #[arg(long = "no-optimize")]
    pub no_optimize: bool,

    /// Also writes assembled bytecode
    #[arg(long = "bytecode")]
    pub bytecode: bool,
}

/// Calculator methods callable from the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operation {
    pub fn method_name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Sub => "sub",
            Operation::Mul => "mul",
            Operation::Div => "div",
        }
    }
}

/// Log level enumeration
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for avm_config::LogLevel {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => avm_config::LogLevel::Trace,
            LogLevel::Debug => avm_config::LogLevel::Debug,
            LogLevel::Info => avm_config::LogLevel::Info,
            LogLevel::Warn => avm_config::LogLevel::Warn,
            LogLevel::Error => avm_config::LogLevel::Error,
        }
    }
}
