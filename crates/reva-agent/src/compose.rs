// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Natural-language answer composition.
//!
//! Successful data turns and conversational turns go through one final LLM
//! call. Failure paths are deliberately deterministic: exhausted retries and
//! failed generations return fixed apology strings with no LLM involvement,
//! so the degraded behavior is predictable and testable without mocks.

use reva_core::types::Row;
use reva_core::{CompletionProvider, CompletionRequest};
use reva_context::prompts::{GENERAL_CONVERSATION_PROMPT, RESPONSE_SYSTEM_PROMPT};
use tracing::warn;

use crate::state::SynthOutcome;

/// Fixed reply when the retry budget is spent.
pub const RETRY_EXHAUSTED_APOLOGY: &str = "I apologize, but I'm having trouble processing your \
data query at the moment. This could be due to the complexity of the question or a temporary \
issue. Please try rephrasing your question or try again in a moment.";

/// Fixed reply when no SQL could be produced or executed at all.
pub const NO_RESULT_APOLOGY: &str = "I couldn't retrieve the data you requested. There was an \
issue generating or executing the database query. Please try rephrasing your question or ask \
something else.";

/// Fixed reply when the final composition call itself fails.
pub const COMPOSE_FAILURE_APOLOGY: &str = "I apologize, but I'm unable to generate a response \
right now. This might be a temporary issue. Please try again in a moment.";

/// Turns pipeline results into user-facing text.
pub struct ResponseComposer {
    model_id: String,
    temperature: f32,
}

impl ResponseComposer {
    pub fn new(model_id: impl Into<String>, temperature: f32) -> Self {
        Self {
            model_id: model_id.into(),
            temperature,
        }
    }

    /// Greeting-style reply for conversational turns.
    ///
    /// The system prompt redirects smuggled domain questions to the
    /// database path instead of answering them from the model's memory.
    pub async fn compose_conversational(
        &self,
        provider: &dyn CompletionProvider,
        question: &str,
    ) -> String {
        let request = CompletionRequest::new(&self.model_id, question)
            .with_system(GENERAL_CONVERSATION_PROMPT)
            .with_temperature(self.temperature);
        match provider.complete(request).await {
            Ok(answer) => answer.trim().to_string(),
            Err(e) => {
                warn!(error = %e, "conversational composition failed");
                COMPOSE_FAILURE_APOLOGY.to_string()
            }
        }
    }

    /// Answer for a data turn.
    ///
    /// Empty result sets still go through the LLM -- the instructions make
    /// it report "no matching records" rather than fabricating data. Only
    /// the exhausted path bypasses the LLM entirely.
    pub async fn compose_data(
        &self,
        provider: &dyn CompletionProvider,
        question: &str,
        outcome: &SynthOutcome,
    ) -> String {
        match outcome {
            SynthOutcome::Exhausted { .. } => RETRY_EXHAUSTED_APOLOGY.to_string(),
            SynthOutcome::Succeeded { sql, rows, .. } => {
                let prompt = format!(
                    "Question: {question}\n\nExecuted SQL: {sql}\n\nQuery results:\n{}\n\n\
                     Answer the question based on these results.",
                    render_rows(rows)
                );
                let request = CompletionRequest::new(&self.model_id, prompt)
                    .with_system(RESPONSE_SYSTEM_PROMPT)
                    .with_temperature(self.temperature);
                match provider.complete(request).await {
                    Ok(answer) => answer.trim().to_string(),
                    Err(e) => {
                        warn!(error = %e, "data composition failed");
                        COMPOSE_FAILURE_APOLOGY.to_string()
                    }
                }
            }
        }
    }
}

/// Renders result rows as a plain-text block for the composition prompt.
pub fn render_rows(rows: &[Row]) -> String {
    if rows.is_empty() {
        return "(no rows returned)".to_string();
    }
    rows.iter()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            format!("({})", cells.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reva_core::RevaError;
    use reva_core::types::SqlValue;
    use reva_test_utils::ScriptedProvider;

    fn composer() -> ResponseComposer {
        ResponseComposer::new("qwen/qwen-2.5-72b-instruct", 0.3)
    }

    #[tokio::test]
    async fn exhausted_turns_bypass_the_llm() {
        let provider = ScriptedProvider::new();
        let answer = composer()
            .compose_data(
                &provider,
                "How many projects are there?",
                &SynthOutcome::Exhausted {
                    attempts: 3,
                    last_error: "no such column".into(),
                },
            )
            .await;
        assert_eq!(answer, RETRY_EXHAUSTED_APOLOGY);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_result_sets_still_go_through_the_llm() {
        let provider = ScriptedProvider::new();
        provider.push_ok("I couldn't find any matching records.");
        let answer = composer()
            .compose_data(
                &provider,
                "Projects in Atlantis?",
                &SynthOutcome::Succeeded {
                    sql: "SELECT project_name FROM projects WHERE city = 'Atlantis'".into(),
                    rows: vec![],
                    retries: 0,
                },
            )
            .await;
        assert_eq!(answer, "I couldn't find any matching records.");
        assert_eq!(provider.call_count(), 1);
        assert!(provider.requests()[0].prompt.contains("(no rows returned)"));
    }

    #[tokio::test]
    async fn data_prompt_carries_question_sql_and_rows() {
        let provider = ScriptedProvider::new();
        provider.push_ok("There are 3 projects under construction.");
        composer()
            .compose_data(
                &provider,
                "How many projects are under construction?",
                &SynthOutcome::Succeeded {
                    sql: "SELECT COUNT(*) FROM projects".into(),
                    rows: vec![vec![SqlValue::Integer(3)]],
                    retries: 0,
                },
            )
            .await;
        let request = &provider.requests()[0];
        assert_eq!(
            request.system_prompt.as_deref(),
            Some(RESPONSE_SYSTEM_PROMPT)
        );
        assert!(request.prompt.contains("How many projects are under construction?"));
        assert!(request.prompt.contains("SELECT COUNT(*) FROM projects"));
        assert!(request.prompt.contains("(3)"));
    }

    #[tokio::test]
    async fn composition_failure_falls_back_deterministically() {
        let provider = ScriptedProvider::new();
        provider.push_err(RevaError::RateLimited);
        let answer = composer()
            .compose_data(
                &provider,
                "count projects",
                &SynthOutcome::Succeeded {
                    sql: "SELECT COUNT(*) FROM projects".into(),
                    rows: vec![vec![SqlValue::Integer(1)]],
                    retries: 0,
                },
            )
            .await;
        assert_eq!(answer, COMPOSE_FAILURE_APOLOGY);
    }

    #[tokio::test]
    async fn conversational_uses_greeting_prompt() {
        let provider = ScriptedProvider::new();
        provider.push_ok("Hello! How can I help you today?");
        let answer = composer().compose_conversational(&provider, "hi!").await;
        assert_eq!(answer, "Hello! How can I help you today?");
        assert_eq!(
            provider.requests()[0].system_prompt.as_deref(),
            Some(GENERAL_CONVERSATION_PROMPT)
        );
    }

    #[tokio::test]
    async fn conversational_failure_falls_back_deterministically() {
        let provider = ScriptedProvider::new();
        provider.push_err(RevaError::Connection("refused".into()));
        let answer = composer().compose_conversational(&provider, "hi!").await;
        assert_eq!(answer, COMPOSE_FAILURE_APOLOGY);
    }

    #[test]
    fn row_rendering() {
        assert_eq!(render_rows(&[]), "(no rows returned)");
        let rows = vec![
            vec![SqlValue::Text("Purva Meraki".into()), SqlValue::Integer(72)],
            vec![SqlValue::Text("Casagrand Bloom".into()), SqlValue::Null],
        ];
        assert_eq!(
            render_rows(&rows),
            "(Purva Meraki, 72)\n(Casagrand Bloom, NULL)"
        );
    }
}
