// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-turn pipeline state.
//!
//! [`QueryState`] is created fresh for each user turn, mutated in place by
//! the pipeline stages, and discarded once the answer has been appended to
//! the conversation log. The synthesis result is a sum type so that
//! contradictory states (a success carrying an error, an exhausted turn
//! carrying rows) cannot be constructed.

use reva_core::types::{QueryCategory, Row, TenantContext, Turn};

/// Transient phases of the synthesis loop, for tracing and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthPhase {
    /// Building a prompt and asking the LLM for SQL.
    Generating,
    /// Executing the generated statement against storage.
    Executing,
    /// Re-prompting with the failing statement and engine error.
    Retrying,
    /// Terminal: execution produced rows (possibly zero).
    Succeeded,
    /// Terminal: the retry budget is spent.
    Exhausted,
}

impl std::fmt::Display for SynthPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthPhase::Generating => write!(f, "generating"),
            SynthPhase::Executing => write!(f, "executing"),
            SynthPhase::Retrying => write!(f, "retrying"),
            SynthPhase::Succeeded => write!(f, "succeeded"),
            SynthPhase::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// Terminal result of the synthesis loop.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthOutcome {
    /// The statement executed; `retries` counts correction rounds consumed.
    Succeeded {
        sql: String,
        rows: Vec<Row>,
        retries: u32,
    },
    /// Every execution attempt failed; carries the last engine error text
    /// for the machine-readable error field (never shown raw to the user).
    Exhausted { attempts: u32, last_error: String },
}

impl SynthOutcome {
    /// The terminal phase this outcome represents.
    pub fn phase(&self) -> SynthPhase {
        match self {
            SynthOutcome::Succeeded { .. } => SynthPhase::Succeeded,
            SynthOutcome::Exhausted { .. } => SynthPhase::Exhausted,
        }
    }

    /// The executed statement, when one succeeded.
    pub fn sql(&self) -> Option<&str> {
        match self {
            SynthOutcome::Succeeded { sql, .. } => Some(sql),
            SynthOutcome::Exhausted { .. } => None,
        }
    }
}

/// Working state for one invocation of the pipeline.
#[derive(Debug, Clone)]
pub struct QueryState {
    /// The raw user question.
    pub question: String,
    /// Bounded history slice the synthesizer may consult.
    pub history: Vec<Turn>,
    /// Router verdict; unset until classification runs.
    pub category: Option<QueryCategory>,
    /// Tenant bound for this turn; immutable once the turn starts.
    pub tenant: TenantContext,
    /// Model identifier used for every LLM call this turn.
    pub model_id: String,
    /// Synthesis result; `None` for conversational turns and generation failures.
    pub outcome: Option<SynthOutcome>,
    /// Final natural-language answer.
    pub answer: String,
    /// Machine-readable error text, when the turn degraded.
    pub error: Option<String>,
}

impl QueryState {
    /// Fresh state for a new turn.
    pub fn new(
        question: impl Into<String>,
        history: Vec<Turn>,
        tenant: TenantContext,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            history,
            category: None,
            tenant,
            model_id: model_id.into(),
            outcome: None,
            answer: String::new(),
            error: None,
        }
    }
}
