// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./reva.toml` > `~/.config/reva/reva.toml`
//! > `/etc/reva/reva.toml`, with environment variable overrides via the
//! `REVA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RevaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/reva/reva.toml` (system-wide)
/// 3. `~/.config/reva/reva.toml` (user XDG config)
/// 4. `./reva.toml` (local directory)
/// 5. `REVA_*` environment variables
pub fn load_config() -> Result<RevaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RevaConfig::default()))
        .merge(Toml::file("/etc/reva/reva.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("reva/reva.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("reva.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and for callers that supply their own config text.
pub fn load_config_from_str(toml_content: &str) -> Result<RevaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RevaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RevaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RevaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `REVA_LLM_API_KEY` must map to
/// `llm.api_key`, not `llm.api.key`.
fn env_provider() -> Env {
    Env::prefixed("REVA_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped,
        // e.g. REVA_LLM_API_KEY -> "llm_api_key".
        let mapped = key
            .as_str()
            .replacen("agent_", "agent.", 1)
            .replacen("llm_", "llm.", 1)
            .replacen("chat_", "chat.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_load_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [chat]
            max_retries = 5
            max_history = 8

            [llm]
            default_model = "deepseek"
            "#,
        )
        .unwrap();
        assert_eq!(config.chat.max_retries, 5);
        assert_eq!(config.chat.max_history, 8);
        assert_eq!(config.llm.default_model, "deepseek");
        // Untouched sections keep their defaults.
        assert_eq!(config.chat.router_history, 3);
        assert_eq!(config.storage.database_path, "reva.db");
    }

    #[test]
    fn str_load_extends_registries() {
        let config = load_config_from_str(
            r#"
            [models.mistral]
            id = "mistralai/mistral-large"
            display_name = "Mistral Large"
            temperature = 0.1

            [tenants.brigade]
            id = "BRG_007"
            display_name = "Brigade"
            "#,
        )
        .unwrap();
        assert_eq!(config.models["mistral"].id, "mistralai/mistral-large");
        assert_eq!(config.tenants["brigade"].id.as_deref(), Some("BRG_007"));
        // Compiled-in entries survive the merge.
        assert!(config.models.contains_key("qwen"));
        assert!(config.tenants.contains_key("all"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = load_config_from_str(
            r#"
            [chat]
            max_retriez = 5
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    #[serial_test::serial]
    fn env_override_maps_section_prefix() {
        // SAFETY: test is serialized; no other thread reads the environment.
        unsafe { std::env::set_var("REVA_LLM_API_KEY", "sk-test") };
        let config = Figment::new()
            .merge(Serialized::defaults(RevaConfig::default()))
            .merge(env_provider())
            .extract::<RevaConfig>()
            .unwrap();
        unsafe { std::env::remove_var("REVA_LLM_API_KEY") };
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
    }
}
