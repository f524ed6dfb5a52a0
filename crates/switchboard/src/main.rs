// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Switchboard - tool surface for a customer-service messaging platform.
//!
//! This is the binary entry point. Structured logs go to stderr so stdout
//! carries only tool output.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;

/// Switchboard - messaging platform tools over RPC and the web app.
#[derive(Parser, Debug)]
#[command(name = "switchboard", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the tool definitions as JSON.
    Tools,
    /// Invoke one tool and print its output.
    Call {
        /// Tool name (see `switchboard tools`).
        tool: String,
        /// JSON input object.
        #[arg(long)]
        input: Option<String>,
    },
    /// Inspect the saved browser session.
    Session,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => switchboard_config::load_and_validate_path(path),
        None => switchboard_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            switchboard_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.log.level);
    debug!(command = ?cli.command, "config loaded");

    match cli.command {
        Commands::Tools => match commands::build_registry(&config) {
            Ok(registry) => {
                println!("{}", commands::run_tools(&registry));
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        },
        Commands::Call { tool, input } => {
            let registry = match commands::build_registry(&config) {
                Ok(registry) => registry,
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::FAILURE;
                }
            };
            let output = commands::run_call(&registry, &tool, input.as_deref()).await;
            println!("{}", output.content);
            if output.is_error {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Commands::Session => match commands::run_session(&config).await {
            Ok(report) => {
                match serde_json::to_string_pretty(&report) {
                    Ok(rendered) => println!("{rendered}"),
                    Err(e) => eprintln!("error: {e}"),
                }
                if report.is_usable() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                }
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        },
    }
}

/// Initialize the tracing subscriber with an env-filter.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("switchboard={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
