//! Argument parsing and command behaviour of the calculator CLI.

use avm_config::{CompileConfig, LogLevel as ConfigLogLevel};
use calculator_cli::args::*;
use calculator_cli::commands;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn compile_args(argv: &[&str]) -> CompileArgs {
    let mut full = vec!["calculator", "compile"];
    full.extend_from_slice(argv);
    match CliArgs::try_parse_from(full).unwrap().command {
        Command::Compile(args) => args,
        other => panic!("expected compile, got {:?}", other),
    }
}

#[test]
fn test_parse_compile_flags() {
    let args = compile_args(&[
        "--config",
        "build.toml",
        "--out-dir",
        "out",
        "--version",
        "8",
        "--no-optimize",
        "--bytecode",
    ]);
    assert_eq!(args.config, Some(PathBuf::from("build.toml")));
    assert_eq!(args.out_dir, Some(PathBuf::from("out")));
    assert_eq!(args.version, Some(8));
    assert!(args.no_optimize);
    assert!(args.bytecode);

    assert_eq!(compile_args(&[]), CompileArgs::default());
}

#[test]
fn test_parse_call_and_log_level() {
    let cli =
        CliArgs::try_parse_from(["calculator", "call", "div", "7", "2", "--log-level", "debug"])
            .unwrap();
    assert_eq!(cli.log_level, Some(LogLevel::Debug));
    assert_eq!(
        cli.command,
        Command::Call {
            method: Operation::Div,
            a: 7,
            b: 2
        }
    );
    assert_eq!(ConfigLogLevel::from(LogLevel::Debug), ConfigLogLevel::Debug);

    assert!(CliArgs::try_parse_from(["calculator", "call", "pow", "1", "2"]).is_err());
    assert!(CliArgs::try_parse_from(["calculator", "call", "add", "-1", "2"]).is_err());
}

#[test]
fn test_load_config_applies_overrides() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("calculator.toml");
    fs::write(
        &path,
        "version = 7\n[output]\ndir = \"from-file\"\n[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();

    let path_arg = path.to_string_lossy().to_string();
    let config = commands::load_config(&compile_args(&["--config", &path_arg])).unwrap();
    assert_eq!(config.version, 7);
    assert_eq!(config.output.dir, PathBuf::from("from-file"));
    assert_eq!(config.logging.level, ConfigLogLevel::Warn);
    assert!(config.optimize.scratch_slots);

    let config = commands::load_config(&compile_args(&[
        "--config",
        &path_arg,
        "--out-dir",
        "elsewhere",
        "--no-optimize",
    ]))
    .unwrap();
    assert_eq!(config.output.dir, PathBuf::from("elsewhere"));
    assert!(!config.optimize.scratch_slots);

    assert!(commands::load_config(&compile_args(&["--config", &path_arg, "--version", "1"])).is_err());
}

#[test]
fn test_compile_command_writes_files() {
    let dir = TempDir::new().unwrap();
    let config = CompileConfig {
        output: avm_config::OutputConfig {
            dir: dir.path().to_path_buf(),
            emit_bytecode: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let output = commands::compile(&config).unwrap();
    assert_eq!(output.lines().count(), 5);
    for file in ["contract.json", "approval.teal", "clear.teal", "approval.bin", "clear.bin"] {
        assert!(dir.path().join(file).exists(), "{} missing", file);
    }
}

#[test]
fn test_call_command() {
    let config = CompileConfig::default();
    assert_eq!(
        commands::call(&config, Operation::Add, 2, 3).unwrap(),
        "add(2, 3) = 5"
    );
    assert_eq!(
        commands::call(&config, Operation::Div, 7, 2).unwrap(),
        "div(7, 2) = 3"
    );

    let err = commands::call(&config, Operation::Sub, 4, 10).unwrap_err();
    assert!(err.to_string().contains("sub(4, 10) aborted"));
}

#[test]
fn test_selectors_command() {
    let output = commands::selectors().unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("  add(uint64,uint64)uint64"));
    assert!(lines[3].ends_with("  div(uint64,uint64)uint64"));
    for line in lines {
        assert!(line.starts_with("0x"));
        assert_eq!(line.split("  ").next().unwrap().len(), 10);
    }
}
