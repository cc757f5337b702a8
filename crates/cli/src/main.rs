use anyhow::Result;
use avm_config::{CompileConfig, LogLevel};
use calculator_cli::args::{CliArgs, Command};
use calculator_cli::commands;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let cli = CliArgs::parse();
    let override_level = cli.log_level.map(LogLevel::from);

    let output = match &cli.command {
        Command::Compile(args) => {
            let config = commands::load_config(args)?;
            init_tracing(override_level.unwrap_or(config.logging.level));
            debug!(?config, "resolved compile configuration");
            commands::compile(&config)?
        }
        Command::Call { method, a, b } => {
            init_tracing(override_level.unwrap_or_default());
            commands::call(&CompileConfig::default(), *method, *a, *b)?
        }
        Command::Selectors => {
            init_tracing(override_level.unwrap_or_default());
            commands::selectors()?
        }
    };

    println!("{}", output);
    Ok(())
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(level: LogLevel) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
