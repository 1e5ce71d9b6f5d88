// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as registry cross-references and positive bounds.

use thiserror::Error;

use crate::model::RevaConfig;

/// A configuration problem found during loading or validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML/env layer failed to parse or merge.
    #[error("config parse error: {message}")]
    Parse { message: String },

    /// A semantic constraint was violated.
    #[error("config validation error: {message}")]
    Validation { message: String },
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &RevaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.models.is_empty() {
        errors.push(ConfigError::Validation {
            message: "models registry must not be empty".to_string(),
        });
    }

    if !config.models.contains_key(&config.llm.default_model) {
        errors.push(ConfigError::Validation {
            message: format!(
                "llm.default_model `{}` is not in the models registry (available: {})",
                config.llm.default_model,
                config
                    .models
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        });
    }

    if !config.tenants.contains_key(&config.chat.default_tenant) {
        errors.push(ConfigError::Validation {
            message: format!(
                "chat.default_tenant `{}` is not in the tenants registry (available: {})",
                config.chat.default_tenant,
                config
                    .tenants
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        });
    }

    if config.chat.max_history == 0 {
        errors.push(ConfigError::Validation {
            message: "chat.max_history must be at least 1".to_string(),
        });
    }

    if config.llm.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "llm.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    for (key, model) in &config.models {
        if model.id.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("models.{key}.id must not be empty"),
            });
        }
        if !(0.0..=2.0).contains(&model.temperature) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "models.{key}.temperature must be in 0.0..=2.0, got {}",
                    model.temperature
                ),
            });
        }
    }

    for (key, tenant) in &config.tenants {
        if let Some(id) = &tenant.id
            && id.trim().is_empty()
        {
            errors.push(ConfigError::Validation {
                message: format!(
                    "tenants.{key}.id must be omitted rather than empty to disable filtering"
                ),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
