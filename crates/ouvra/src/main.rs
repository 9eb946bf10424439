// SPDX-FileCopyrightText: 2026 Ouvra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ouvra - field-operations sync agent for construction-site management.
//!
//! This is the binary entry point for the device-side agent: it owns the
//! offline action queue and replays it against the backend whenever
//! connectivity returns.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Ouvra - field-operations sync agent.
#[derive(Parser, Debug)]
#[command(name = "ouvra", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show queue counts and backend reachability.
    Status,
    /// Replay pending offline actions once and exit.
    Drain,
    /// Run the connectivity probe and sync driver until interrupted.
    Watch,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match ouvra_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            ouvra_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    // RUST_LOG takes precedence over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.app.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Some(Commands::Drain) => commands::drain(&config).await,
        Some(Commands::Watch) => commands::watch(&config).await,
        Some(Commands::Config) => commands::show_config(&config),
        Some(Commands::Status) | None => commands::status(&config).await,
    };

    if let Err(e) = result {
        eprintln!("ouvra: {e}");
        std::process::exit(1);
    }
}
