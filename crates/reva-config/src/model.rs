// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Reva chatbot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup. The compiled-in defaults describe the proof-of-
//! concept deployment: four OpenRouter models and two named tenants plus an
//! unfiltered "all" view.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level Reva configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RevaConfig {
    /// Agent identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// LLM endpoint settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Pipeline knobs: retries, history caps, default tenant.
    #[serde(default)]
    pub chat: ChatConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Model registry: key -> model spec.
    #[serde(default = "default_models")]
    pub models: BTreeMap<String, ModelConfig>,

    /// Tenant registry: key -> tenant spec.
    #[serde(default = "default_tenants")]
    pub tenants: BTreeMap<String, TenantConfig>,
}

impl Default for RevaConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            llm: LlmConfig::default(),
            chat: ChatConfig::default(),
            storage: StorageConfig::default(),
            models: default_models(),
            tenants: default_tenants(),
        }
    }
}

impl RevaConfig {
    /// Looks up a model spec by registry key, falling back to the default model.
    pub fn model(&self, key: Option<&str>) -> Option<(&str, &ModelConfig)> {
        let key = key.unwrap_or(&self.llm.default_model);
        self.models
            .get_key_value(key)
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Looks up a tenant spec by registry key, falling back to the default tenant.
    pub fn tenant(&self, key: Option<&str>) -> Option<(&str, &TenantConfig)> {
        let key = key.unwrap_or(&self.chat.default_tenant);
        self.tenants
            .get_key_value(key)
            .map(|(k, v)| (k.as_str(), v))
    }
}

/// Agent identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

/// LLM endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// API key for the completion endpoint. `None` requires the
    /// `REVA_LLM_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat-completions endpoint URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Registry key of the model used when the caller does not pick one.
    #[serde(default = "default_model_key")]
    pub default_model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            default_model: default_model_key(),
        }
    }
}

/// Pipeline behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Maximum LLM-assisted SQL correction attempts per turn.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Maximum retained conversation turns; oldest dropped first.
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Trailing turns shown to the query router for classification.
    #[serde(default = "default_router_history")]
    pub router_history: usize,

    /// Registry key of the tenant bound to new sessions.
    #[serde(default = "default_tenant_key")]
    pub default_tenant: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            max_history: default_max_history(),
            router_history: default_router_history(),
            default_tenant: default_tenant_key(),
        }
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// One entry in the model registry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Model identifier as understood by the endpoint.
    pub id: String,

    /// Human-readable name shown in front ends.
    pub display_name: String,

    /// Sampling temperature for this model.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// One entry in the tenant registry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TenantConfig {
    /// Tenant column value used for filtering. `None` disables filtering.
    #[serde(default)]
    pub id: Option<String>,

    /// Human-readable name shown in front ends.
    pub display_name: String,

    /// Short description of what this tenant scope covers.
    #[serde(default)]
    pub description: String,
}

fn default_agent_name() -> String {
    "reva".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_model_key() -> String {
    "qwen".to_string()
}

fn default_max_retries() -> u32 {
    2
}

fn default_max_history() -> usize {
    20
}

fn default_router_history() -> usize {
    3
}

fn default_tenant_key() -> String {
    "all".to_string()
}

fn default_database_path() -> String {
    "reva.db".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_models() -> BTreeMap<String, ModelConfig> {
    let mut models = BTreeMap::new();
    models.insert(
        "qwen".to_string(),
        ModelConfig {
            id: "qwen/qwen-2.5-72b-instruct".to_string(),
            display_name: "Qwen 2.5 (72B)".to_string(),
            temperature: 0.3,
        },
    );
    models.insert(
        "deepseek".to_string(),
        ModelConfig {
            id: "deepseek/deepseek-chat".to_string(),
            display_name: "DeepSeek V3".to_string(),
            temperature: 0.3,
        },
    );
    models.insert(
        "deepseek-r1".to_string(),
        ModelConfig {
            id: "deepseek/deepseek-r1".to_string(),
            display_name: "DeepSeek R1".to_string(),
            temperature: 0.3,
        },
    );
    models.insert(
        "glm4".to_string(),
        ModelConfig {
            id: "zhipuai/glm-4-9b-chat".to_string(),
            display_name: "GLM-4 (9B)".to_string(),
            temperature: 0.3,
        },
    );
    models
}

fn default_tenants() -> BTreeMap<String, TenantConfig> {
    let mut tenants = BTreeMap::new();
    tenants.insert(
        "all".to_string(),
        TenantConfig {
            id: None,
            display_name: "All Clients".to_string(),
            description: "View all projects across all clients".to_string(),
        },
    );
    tenants.insert(
        "casagrand".to_string(),
        TenantConfig {
            id: Some("TM_TEAM_001".to_string()),
            display_name: "Casagrand".to_string(),
            description: "Casagrand projects".to_string(),
        },
    );
    tenants.insert(
        "purvankara".to_string(),
        TenantConfig {
            id: Some("PURVA_001".to_string()),
            display_name: "Purvankara".to_string(),
            description: "Purva/Purvankara projects".to_string(),
        },
    );
    tenants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_poc_registry() {
        let config = RevaConfig::default();
        assert_eq!(config.llm.default_model, "qwen");
        assert_eq!(config.chat.max_retries, 2);
        assert_eq!(config.chat.max_history, 20);
        assert_eq!(config.chat.router_history, 3);
        assert_eq!(config.models.len(), 4);
        assert_eq!(config.tenants.len(), 3);
        assert!(config.tenants["all"].id.is_none());
        assert_eq!(
            config.tenants["casagrand"].id.as_deref(),
            Some("TM_TEAM_001")
        );
    }

    #[test]
    fn model_lookup_falls_back_to_default() {
        let config = RevaConfig::default();
        let (key, model) = config.model(None).unwrap();
        assert_eq!(key, "qwen");
        assert_eq!(model.id, "qwen/qwen-2.5-72b-instruct");

        let (key, _) = config.model(Some("deepseek")).unwrap();
        assert_eq!(key, "deepseek");

        assert!(config.model(Some("missing")).is_none());
    }

    #[test]
    fn tenant_lookup_falls_back_to_default() {
        let config = RevaConfig::default();
        let (key, tenant) = config.tenant(None).unwrap();
        assert_eq!(key, "all");
        assert!(tenant.id.is_none());
    }
}
