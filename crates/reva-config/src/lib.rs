// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Reva chatbot.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides via the `REVA_` prefix.
//!
//! # Usage
//!
//! ```no_run
//! let config = reva_config::load_and_validate().expect("config errors");
//! println!("agent: {}", config.agent.name);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::RevaConfig;
pub use validation::{ConfigError, validate_config};

/// Load configuration from the XDG hierarchy and validate it.
///
/// On figment failure the parse error is converted into the same
/// `ConfigError` list shape as validation failures, so front ends have one
/// rendering path.
pub fn load_and_validate() -> Result<RevaConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(figment_errors(err)),
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<RevaConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(figment_errors(err)),
    }
}

/// Render a list of config errors to stderr, one per line.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("reva: {error}");
    }
}

fn figment_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| ConfigError::Parse {
            message: e.to_string(),
        })
        .collect()
}
