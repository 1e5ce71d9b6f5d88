// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQL synthesis with bounded, LLM-assisted correction.
//!
//! The loop is an explicit state machine over [`SynthPhase`] rather than
//! recursion, so the termination bound is visible: at most
//! `max_retries + 1` generation calls and `max_retries + 1` execution
//! attempts per turn. Only execution failures are retried; a transport
//! failure during generation means there is no new statement to execute and
//! ends the turn.

use reva_core::types::Turn;
use reva_core::{CompletionProvider, CompletionRequest, RevaError, SqlExecutor};
use reva_context::prompts::SQL_GENERATOR_SYSTEM_PROMPT;
use tracing::{debug, warn};

use crate::state::{SynthOutcome, SynthPhase};

/// Drives question -> SQL -> rows with bounded correction retries.
pub struct DataQueryEngine {
    model_id: String,
    temperature: f32,
    max_retries: u32,
}

impl DataQueryEngine {
    pub fn new(model_id: impl Into<String>, temperature: f32, max_retries: u32) -> Self {
        Self {
            model_id: model_id.into(),
            temperature,
            max_retries,
        }
    }

    /// Runs the synthesis loop for one question.
    ///
    /// `Err` is reserved for failures no retry can fix: gateway transport
    /// errors during generation and storage infrastructure errors. Both
    /// terminal loop states come back as `Ok`.
    pub async fn run(
        &self,
        provider: &dyn CompletionProvider,
        executor: &dyn SqlExecutor,
        question: &str,
        history: &[Turn],
        schema: &str,
        fuzzy_context: &str,
    ) -> Result<SynthOutcome, RevaError> {
        let mut phase = SynthPhase::Generating;
        let mut retries: u32 = 0;
        debug!(%phase, "requesting SQL for question");

        let prompt = self.generation_prompt(question, history, schema, fuzzy_context);
        let mut sql = self.request_sql(provider, prompt).await?;

        loop {
            phase = SynthPhase::Executing;
            debug!(%phase, retries, sql = %sql, "executing generated SQL");

            match executor.execute(&sql).await {
                Ok(rows) => {
                    debug!(rows = rows.len(), retries, "execution succeeded");
                    return Ok(SynthOutcome::Succeeded { sql, rows, retries });
                }
                Err(RevaError::Execution { message, .. }) => {
                    if retries >= self.max_retries {
                        warn!(attempts = retries + 1, error = %message, "retry budget exhausted");
                        return Ok(SynthOutcome::Exhausted {
                            attempts: retries + 1,
                            last_error: message,
                        });
                    }
                    phase = SynthPhase::Retrying;
                    retries += 1;
                    debug!(%phase, retries, error = %message, "re-prompting with engine error");
                    let prompt = self.retry_prompt(
                        question,
                        history,
                        schema,
                        fuzzy_context,
                        &sql,
                        &message,
                    );
                    sql = self.request_sql(provider, prompt).await?;
                }
                Err(other) => return Err(other),
            }
        }
    }

    async fn request_sql(
        &self,
        provider: &dyn CompletionProvider,
        prompt: String,
    ) -> Result<String, RevaError> {
        let request = CompletionRequest::new(&self.model_id, prompt)
            .with_system(SQL_GENERATOR_SYSTEM_PROMPT)
            .with_temperature(self.temperature);
        let raw = provider.complete(request).await?;
        Ok(strip_code_fences(&raw))
    }

    fn generation_prompt(
        &self,
        question: &str,
        history: &[Turn],
        schema: &str,
        fuzzy_context: &str,
    ) -> String {
        let mut prompt = String::new();
        prompt.push_str(schema);
        prompt.push_str(fuzzy_context);
        push_history(&mut prompt, history);
        prompt.push_str(&format!(
            "\nConvert this question into a single SQLite query.\n\nQuestion: {question}\n\nSQL:"
        ));
        prompt
    }

    /// Retry prompts restate the full instruction set (the system prompt is
    /// sent again unchanged) and append the failing statement plus the
    /// literal engine error.
    fn retry_prompt(
        &self,
        question: &str,
        history: &[Turn],
        schema: &str,
        fuzzy_context: &str,
        failed_sql: &str,
        error: &str,
    ) -> String {
        let mut prompt = self.generation_prompt(question, history, schema, fuzzy_context);
        prompt.push_str(&format!(
            "\n\nThe previous query failed.\n\nFailed query: {failed_sql}\nDatabase error: {error}\n\n\
             Fix the query. Keep text matching case-insensitive with LIKE and wildcards. \
             Output ONLY the corrected SQL query."
        ));
        prompt
    }
}

fn push_history(prompt: &mut String, history: &[Turn]) {
    if history.is_empty() {
        return;
    }
    prompt.push_str("\nConversation history:\n");
    for turn in history {
        prompt.push_str(&format!("{}: {}\n", turn.role, turn.content));
    }
}

/// Strips incidental markdown fencing from LLM output.
///
/// Models occasionally wrap statements in ```` ```sql ```` fences despite
/// the SQL-only instruction; the executor needs the bare statement.
pub fn strip_code_fences(raw: &str) -> String {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // Drop the info string ("sql", "sqlite", ...) up to the first newline.
        text = match rest.split_once('\n') {
            Some((_, body)) => body,
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim().to_string()
}
