// crates/slipway-cli/src/main.rs
// ============================================================================
// Module: Slipway CLI Entry Point
// Description: Command dispatcher for synchronization and publishing runs.
// Purpose: Provide a strict, scriptable CLI for release tooling batches.
// Dependencies: clap, slipway-config, slipway-core, slipway-store, tokio
// ============================================================================

//! ## Overview
//! The Slipway CLI drives the two batch pipelines. `sync` reconciles XLIFF
//! bundles into language packages from `slipway.toml`; `publish` uploads one
//! build artifact and records its metadata from environment-provided
//! settings; `config validate` preflights the configuration. Usage errors
//! exit with status 255; operational failures exit with status 1.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::error::ErrorKind;
use slipway_config::DEFAULT_CONFIG_NAME;
use slipway_config::PublishEnv;
use slipway_config::SlipwayConfig;
use slipway_core::PublishOutcome;
use slipway_core::PublishRequest;
use slipway_core::PublishStores;
use slipway_core::Publisher;
use slipway_core::Synchronizer;
use slipway_store::HttpReleaseStore;
use slipway_store::ReleaseDbConfig;
use slipway_store::S3ObjectStore;
use slipway_store::S3StoreConfig;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Exit Codes
// ============================================================================

/// Exit status for usage errors (wrong arity, unknown flags).
const USAGE_EXIT: u8 = 255;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "slipway", version, about = "Langpack synchronization and release publishing")]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Synchronize XLIFF bundles into language packages.
    Sync(SyncCommand),
    /// Publish one build artifact to the release stores.
    Publish(PublishCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for the synchronization run.
#[derive(Args, Debug)]
struct SyncCommand {
    /// Config file path (defaults to slipway.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Parse XLIFF sources in pseudo-localization mode.
    #[arg(long)]
    pseudo: bool,
}

/// Arguments for publishing one artifact.
#[derive(Args, Debug)]
struct PublishCommand {
    /// Product flavor (client, server, or web).
    #[arg(value_name = "PRODUCT")]
    product: String,
    /// Operating system of the build.
    #[arg(value_name = "OS")]
    os: String,
    /// Architecture of the build.
    #[arg(value_name = "ARCH")]
    arch: String,
    /// Artifact subtype (archive, setup, user-setup, deb-package, ...).
    #[arg(value_name = "TYPE")]
    kind: String,
    /// Published file name.
    #[arg(value_name = "NAME")]
    name: String,
    /// Local path of the built artifact.
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the configuration file and exit.
    Validate {
        /// Config file path (defaults to slipway.toml).
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => USAGE_EXIT,
            };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    init_tracing();
    match cli.command {
        Commands::Sync(command) => command_sync(command).await,
        Commands::Publish(command) => command_publish(command).await,
        Commands::Config {
            command: ConfigCommand::Validate {
                config,
            },
        } => command_config_validate(config.as_deref()),
    }
}

/// Initializes the tracing subscriber for CLI output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves the config path, falling back to the default file name.
fn config_path(config: Option<&std::path::Path>) -> PathBuf {
    config.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME), std::path::Path::to_path_buf)
}

// ============================================================================
// SECTION: Sync Command
// ============================================================================

/// Runs the langpack synchronization pipeline.
async fn command_sync(command: SyncCommand) -> ExitCode {
    let path = config_path(command.config.as_deref());
    let config = match SlipwayConfig::load(&path) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "failed to load config");
            return ExitCode::from(1);
        }
    };

    let synchronizer = Synchronizer::new(config.sync_options(command.pseudo));
    match synchronizer.run().await {
        Ok(summary) => {
            for report in &summary.reports {
                tracing::info!(
                    language = %report.language,
                    catalogs = report.catalogs_written,
                    "language synchronized"
                );
            }
            if summary.failures.is_empty() {
                return ExitCode::SUCCESS;
            }
            for failure in &summary.failures {
                tracing::error!(
                    language = %failure.language,
                    error = %failure.error,
                    "language batch failed"
                );
            }
            ExitCode::from(1)
        }
        Err(err) => {
            tracing::error!(error = %err, "synchronization failed");
            ExitCode::from(1)
        }
    }
}

// ============================================================================
// SECTION: Publish Command
// ============================================================================

/// Runs the asset publishing pipeline for one artifact.
async fn command_publish(command: PublishCommand) -> ExitCode {
    let env = match PublishEnv::from_env() {
        Ok(env) => env,
        Err(err) => {
            tracing::error!(error = %err, "publish environment is incomplete");
            return ExitCode::from(1);
        }
    };

    match publish(env, command).await {
        Ok(outcome) => {
            match outcome {
                PublishOutcome::AlreadyPublished {
                    blob_name,
                } => tracing::info!(blob = %blob_name, "already published; nothing to do"),
                PublishOutcome::Published {
                    record,
                } => tracing::info!(platform = %record.platform, url = %record.url, "published"),
            }
            ExitCode::SUCCESS
        }
        Err(message) => {
            tracing::error!(error = %message, "publish failed");
            ExitCode::from(1)
        }
    }
}

/// Connects the backends and publishes one artifact.
async fn publish(env: PublishEnv, command: PublishCommand) -> Result<PublishOutcome, String> {
    let primary = S3ObjectStore::connect(&S3StoreConfig {
        bucket: env.primary.bucket,
        region: env.primary.region,
        endpoint: env.primary.endpoint,
        access_key_id: env.primary.access_key_id,
        secret_access_key: env.primary.secret_access_key,
        force_path_style: false,
    })
    .await
    .map_err(|err| err.to_string())?;

    let mirror = S3ObjectStore::connect(&S3StoreConfig {
        bucket: env.mirror.bucket,
        region: env.mirror.region,
        endpoint: env.mirror.endpoint,
        access_key_id: env.mirror.access_key_id,
        secret_access_key: env.mirror.secret_access_key,
        force_path_style: false,
    })
    .await
    .map_err(|err| err.to_string())?;

    let records = HttpReleaseStore::new(ReleaseDbConfig {
        endpoint: env.release_db_endpoint,
        key: env.release_db_key,
    })
    .map_err(|err| err.to_string())?;

    let publisher = Publisher {
        quality: env.quality,
        commit: env.commit,
        primary_base_url: env.cdn_primary_url,
        mirror_base_url: env.cdn_mirror_url,
        retry: env.retry,
    };
    let request = PublishRequest {
        product: command.product,
        os: command.os,
        arch: command.arch,
        kind: command.kind,
        file_name: command.name,
        source: command.file,
    };
    let stores = PublishStores {
        primary: &primary,
        mirror: &mirror,
        records: &records,
    };
    publisher.publish(&stores, &request).await.map_err(|err| err.to_string())
}

// ============================================================================
// SECTION: Config Command
// ============================================================================

/// Validates the configuration file.
fn command_config_validate(config: Option<&std::path::Path>) -> ExitCode {
    let path = config_path(config);
    match SlipwayConfig::load(&path) {
        Ok(_) => {
            tracing::info!(path = %path.display(), "config valid");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "config invalid");
            ExitCode::from(1)
        }
    }
}
