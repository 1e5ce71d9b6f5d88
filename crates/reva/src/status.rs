// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `reva status` command implementation.
//!
//! Prints the effective configuration summary and checks the listings
//! database: connectivity plus row counts for both domain tables.

use colored::Colorize;

use reva_config::RevaConfig;
use reva_core::RevaError;
use reva_storage::SqliteStore;

/// Runs the `reva status` command.
pub async fn run_status(config: &RevaConfig) -> Result<(), RevaError> {
    println!("{}", "reva status".bold());
    println!("  agent:          {}", config.agent.name);
    println!("  default model:  {}", config.llm.default_model);
    println!(
        "  models:         {}",
        config.models.keys().cloned().collect::<Vec<_>>().join(", ")
    );
    println!(
        "  tenants:        {}",
        config.tenants.keys().cloned().collect::<Vec<_>>().join(", ")
    );
    println!("  database:       {}", config.storage.database_path);
    println!(
        "  api key:        {}",
        if config.llm.api_key.is_some() {
            "configured".green().to_string()
        } else {
            "missing".red().to_string()
        }
    );

    match SqliteStore::open(&config.storage.database_path).await {
        Ok(store) => {
            store.ping().await?;
            let (projects, units) = store.table_counts().await?;
            println!("  storage:        {}", "reachable".green());
            println!("  projects:       {projects}");
            println!("  units:          {units}");
        }
        Err(e) => {
            println!("  storage:        {} ({e})", "unreachable".red());
        }
    }

    Ok(())
}
