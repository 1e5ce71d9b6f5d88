// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion provider trait for LLM gateway implementations.

use async_trait::async_trait;

use crate::error::RevaError;

/// A single-shot completion request.
///
/// The pipeline bakes conversation history and schema context into the
/// prompt text itself, so the gateway stays a stateless transport: one
/// system prompt, one user prompt, one response.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier as understood by the remote endpoint.
    pub model: String,
    /// Optional system instructions.
    pub system_prompt: Option<String>,
    /// The user-role prompt body.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: None,
            prompt: prompt.into(),
            temperature: 0.3,
        }
    }

    pub fn with_system(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Gateway to a remote chat-completion endpoint.
///
/// Implementations perform exactly one request per call: no streaming and
/// no internal retry. Retry policy belongs to the synthesis loop, which
/// needs to distinguish execution failures from transport failures.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends the request and returns the assistant message text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, RevaError>;
}
