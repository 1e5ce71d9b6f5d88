// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-turn query classification.
//!
//! One LLM call decides whether a question needs the database. Two policies
//! are load-bearing and must not be weakened:
//!
//! - **fail closed on parsing**: any response that is not a recognized label
//!   becomes [`QueryCategory::Data`], never conversational
//! - **fail open on transport**: a gateway failure also becomes `Data`, so
//!   the user still gets an execution attempt instead of a generic apology

use reva_context::prompts::ROUTER_SYSTEM_PROMPT;
use reva_core::types::{QueryCategory, Turn};
use reva_core::{CompletionProvider, CompletionRequest};
use tracing::{debug, warn};

/// LLM-backed classifier with a bounded history window.
pub struct QueryRouter {
    model_id: String,
    temperature: f32,
    history_window: usize,
}

impl QueryRouter {
    /// Creates a router that classifies with the given model and shows the
    /// model the last `history_window` turns for pronoun disambiguation.
    pub fn new(model_id: impl Into<String>, temperature: f32, history_window: usize) -> Self {
        Self {
            model_id: model_id.into(),
            temperature,
            history_window,
        }
    }

    /// Classifies one question. Infallible by design: both unparseable
    /// output and gateway errors resolve to [`QueryCategory::Data`].
    pub async fn classify(
        &self,
        provider: &dyn CompletionProvider,
        question: &str,
        history: &[Turn],
    ) -> QueryCategory {
        let request = CompletionRequest::new(&self.model_id, self.build_prompt(question, history))
            .with_system(ROUTER_SYSTEM_PROMPT)
            .with_temperature(self.temperature);

        match provider.complete(request).await {
            Ok(response) => {
                let category = parse_category(&response);
                debug!(raw = %response.trim(), %category, "query classified");
                category
            }
            Err(e) => {
                warn!(error = %e, "router LLM call failed, defaulting to data");
                QueryCategory::Data
            }
        }
    }

    fn build_prompt(&self, question: &str, history: &[Turn]) -> String {
        let recent = &history[history.len().saturating_sub(self.history_window)..];
        if recent.is_empty() {
            return format!("Question: {question}");
        }
        let mut prompt = String::from("Recent conversation:\n");
        for turn in recent {
            prompt.push_str(&format!("{}: {}\n", turn.role, turn.content));
        }
        prompt.push_str(&format!("\nQuestion: {question}"));
        prompt
    }
}

/// Normalizes the model's single-word verdict into a category.
///
/// Accepts `general`/`conversational` for the greeting path; everything
/// else -- including noise like `"Answer: data."` fragments or unknown
/// labels -- fails closed to `Data`.
pub fn parse_category(response: &str) -> QueryCategory {
    let normalized: String = response
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();

    match normalized.as_str() {
        "general" | "conversational" => QueryCategory::Conversational,
        _ => QueryCategory::Data,
    }
}
