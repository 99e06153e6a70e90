// crates/slipway-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Argument Tests
// Description: Verifies argument parsing and the publish arity contract.
// ============================================================================
//! ## Overview
//! The publish subcommand takes exactly six positional arguments; anything
//! else is a usage error. These tests pin the parsing contract without
//! touching any backend.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Panic-based assertions are permitted in tests."
)]

use clap::Parser;
use clap::error::ErrorKind;

use crate::Cli;
use crate::Commands;

#[test]
fn publish_accepts_exactly_six_positionals() {
    let cli = Cli::try_parse_from([
        "slipway",
        "publish",
        "client",
        "win32",
        "x64",
        "archive",
        "product.zip",
        "/tmp/product.zip",
    ])
    .expect("parse");
    let Commands::Publish(command) = cli.command else {
        panic!("expected publish command");
    };
    assert_eq!(command.product, "client");
    assert_eq!(command.os, "win32");
    assert_eq!(command.arch, "x64");
    assert_eq!(command.kind, "archive");
    assert_eq!(command.name, "product.zip");
    assert_eq!(command.file, std::path::PathBuf::from("/tmp/product.zip"));
}

#[test]
fn publish_with_too_few_arguments_is_a_usage_error() {
    let err = Cli::try_parse_from(["slipway", "publish", "client", "win32", "x64"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
}

#[test]
fn publish_with_extra_arguments_is_a_usage_error() {
    let err = Cli::try_parse_from([
        "slipway",
        "publish",
        "client",
        "win32",
        "x64",
        "archive",
        "product.zip",
        "/tmp/product.zip",
        "surplus",
    ])
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownArgument);
}

#[test]
fn sync_flags_parse() {
    let cli = Cli::try_parse_from(["slipway", "sync", "--config", "ops/slipway.toml", "--pseudo"])
        .expect("parse");
    let Commands::Sync(command) = cli.command else {
        panic!("expected sync command");
    };
    assert_eq!(command.config, Some(std::path::PathBuf::from("ops/slipway.toml")));
    assert!(command.pseudo);
}

#[test]
fn config_validate_parses() {
    let cli = Cli::try_parse_from(["slipway", "config", "validate"]).expect("parse");
    assert!(matches!(
        cli.command,
        Commands::Config {
            command: crate::ConfigCommand::Validate {
                config: None,
            },
        }
    ));
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    let err = Cli::try_parse_from(["slipway"]).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    ));
}
