// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted completion provider for deterministic pipeline tests.
//!
//! Responses are popped from a FIFO queue; every request is recorded so
//! tests can assert on call counts and prompt contents (tenant injection,
//! retry error text, history windows).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use reva_core::{CompletionProvider, CompletionRequest, RevaError};

/// A mock LLM gateway that replays a fixed script of outcomes.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    script: Arc<Mutex<VecDeque<Result<String, RevaError>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful completion.
    pub fn push_ok(&self, text: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(text.into()));
    }

    /// Queue a gateway failure.
    pub fn push_err(&self, err: RevaError) {
        self.script.lock().unwrap().push_back(Err(err));
    }

    /// All requests received so far, in order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of completion calls received.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, RevaError> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RevaError::Internal("provider script exhausted".into())))
    }
}
