// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenRouter chat-completions endpoint.
//!
//! Provides [`OpenRouterClient`], which handles request construction,
//! bearer authentication, the request timeout, and mapping of transport
//! and HTTP failures to typed [`RevaError`] variants. Deliberately does
//! NOT retry: retry policy lives in the synthesis loop, which must
//! distinguish execution failures from transport failures.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use reva_core::{CompletionProvider, CompletionRequest, RevaError};
use tracing::debug;

use crate::types::{ApiErrorResponse, ApiMessage, ChatCompletionRequest, ChatCompletionResponse};

/// HTTP gateway to an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl OpenRouterClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `api_key` - bearer token for the endpoint
    /// * `base_url` - full chat-completions URL
    /// * `timeout` - per-request timeout
    pub fn new(
        api_key: &str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RevaError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| RevaError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| RevaError::Connection(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    fn map_transport_error(&self, e: reqwest::Error) -> RevaError {
        if e.is_timeout() {
            RevaError::Timeout {
                duration: self.timeout,
            }
        } else {
            RevaError::Connection(e.to_string())
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, RevaError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system_prompt {
            messages.push(ApiMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.push(ApiMessage {
            role: "user".to_string(),
            content: request.prompt.clone(),
        });

        let body = ChatCompletionRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        debug!(status = %status, model = %request.model, "completion response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| RevaError::MalformedResponse(format!("undecodable body: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(RevaError::MalformedResponse(
                "response contained no message content".to_string(),
            ));
        }

        Ok(content)
    }
}

/// Maps a non-success HTTP status (plus error body, when decodable) to a
/// distinct error kind so callers can decide what is user-facing.
fn map_status_error(status: StatusCode, body: &str) -> RevaError {
    match status.as_u16() {
        401 => RevaError::Auth,
        429 => RevaError::RateLimited,
        code => {
            let message = serde_json::from_str::<ApiErrorResponse>(body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.to_string());
            RevaError::Api {
                status: code,
                message,
            }
        }
    }
}
