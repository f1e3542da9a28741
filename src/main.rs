//! otacheck - ROM and kernel update checker
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use otacheck::cli::{Cli, Commands};
use otacheck::config::{Config, ConfigManager};
use otacheck::device::IdentityCache;
use otacheck::error::OtaResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> OtaResult<()> {
    let cli = Cli::parse();

    // Completions don't need config loading
    if let Commands::Completions(args) = cli.command {
        return otacheck::cli::commands::completions(args);
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config);
    debug!("Using config {}", config_manager.path().display());

    // One cache per process; installed state is read at most once
    let cache = IdentityCache::from_config(&config);

    match cli.command {
        Commands::Completions(_) => unreachable!("Completions handled above"),
        Commands::Status(args) => otacheck::cli::commands::status(args, &cache).await,
        Commands::Check(args) => otacheck::cli::commands::check(args, &config, &cache).await,
        Commands::Hash(args) => otacheck::cli::commands::hash(args).await,
        Commands::Config(args) => {
            otacheck::cli::commands::config(args, &config_manager, &config).await
        }
    }
}

/// 0 = warn, 1 = info, 2+ = debug; RUST_LOG overrides
fn init_logging(verbose: u8, config: &Config) {
    let level = match verbose {
        0 => "otacheck=warn",
        1 => "otacheck=info",
        _ => "otacheck=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
