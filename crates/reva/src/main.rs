// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reva - a natural-language chatbot over a real-estate listings database.
//!
//! Binary entry point: loads and validates configuration, initializes
//! tracing, and dispatches to the selected front end.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod serve;
mod shell;
mod status;

/// Reva - ask questions about real-estate listings in plain language.
#[derive(Parser, Debug)]
#[command(name = "reva", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive REPL session.
    Shell {
        /// Model registry key to chat with (defaults to llm.default_model).
        #[arg(long)]
        model: Option<String>,
    },
    /// Start the HTTP chat API.
    Serve {
        /// Bind address for the HTTP server.
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: String,
    },
    /// Show configuration and database health.
    Status,
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match reva_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            reva_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Commands::Shell { model } => shell::run_shell(config, model.as_deref()).await,
        Commands::Serve { bind } => serve::run_serve(config, &bind).await,
        Commands::Status => status::run_status(&config).await,
    };

    if let Err(e) = result {
        eprintln!("reva: {e}");
        std::process::exit(1);
    }
}
