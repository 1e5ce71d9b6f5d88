// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `reva shell` command implementation.
//!
//! Launches an interactive REPL with a colored prompt and readline history.
//! Data answers print the executed SQL below the reply; `clear` resets the
//! conversation log and `quit`/`exit` leave the session.

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use reva_agent::{ChatSession, SessionConfig};
use reva_config::RevaConfig;
use reva_core::types::QueryCategory;
use reva_core::{CompletionProvider, RevaError, SqlExecutor};
use reva_llm::OpenRouterClient;
use reva_storage::SqliteStore;

/// Resolves the API key or explains where to put it.
pub fn resolve_api_key(config: &RevaConfig) -> Result<String, RevaError> {
    config.llm.api_key.clone().ok_or_else(|| {
        RevaError::Config(
            "LLM API key required. Set llm.api_key in reva.toml or the REVA_LLM_API_KEY \
             environment variable."
                .to_string(),
        )
    })
}

/// Runs the `reva shell` interactive REPL.
pub async fn run_shell(config: RevaConfig, model_key: Option<&str>) -> Result<(), RevaError> {
    let api_key = resolve_api_key(&config)?;
    let provider: Arc<dyn CompletionProvider> = Arc::new(OpenRouterClient::new(
        &api_key,
        config.llm.base_url.clone(),
        Duration::from_secs(config.llm.timeout_secs),
    )?);

    let store = SqliteStore::open(&config.storage.database_path).await?;
    let (projects, units) = store.table_counts().await?;
    let executor: Arc<dyn SqlExecutor> = Arc::new(store);

    let session_config = SessionConfig::from_config(&config, model_key)?;
    let model_id = session_config.model_id.clone();
    let mut session = ChatSession::new(provider, executor, session_config);

    println!(
        "{} listings database connected: {projects} projects, {units} units",
        "reva".bold().cyan()
    );
    println!("model: {model_id}");
    println!("type 'quit' or 'exit' to stop, 'clear' to reset history\n");

    let mut rl = DefaultEditor::new()
        .map_err(|e| RevaError::Internal(format!("failed to initialize readline: {e}")))?;

    loop {
        match rl.readline(&"you> ".green().bold().to_string()) {
            Ok(line) => {
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(question);

                match question {
                    "quit" | "exit" => break,
                    "clear" => {
                        session.reset_history();
                        println!("{}", "history cleared".dimmed());
                        continue;
                    }
                    _ => {}
                }

                let outcome = session.ask(question, true).await;
                println!("\n{} {}\n", "reva>".cyan().bold(), outcome.answer);
                if outcome.category == QueryCategory::Data
                    && let Some(sql) = &outcome.sql
                {
                    println!("{} {}\n", "sql:".dimmed(), sql.dimmed());
                }
                if let Some(error) = &outcome.error {
                    debug!(error = %error, "turn degraded");
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                return Err(RevaError::Internal(format!("readline error: {e}")));
            }
        }
    }

    println!("{}", "bye".dimmed());
    Ok(())
}
