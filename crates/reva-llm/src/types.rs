// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenRouter chat-completions request/response types.

use serde::{Deserialize, Serialize};

/// One message in the chat-completions wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Message role: "system", "user", or "assistant".
    pub role: String,
    /// Message text.
    pub content: String,
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model identifier (e.g. "qwen/qwen-2.5-72b-instruct").
    pub model: String,
    /// Ordered message list; system prompt first when present.
    pub messages: Vec<ApiMessage>,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Response body for a successful completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

/// The assistant message inside a choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Error body returned by the endpoint on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail inside an error body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(default)]
    pub code: Option<i64>,
}
