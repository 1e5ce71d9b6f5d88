// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session conversation state and the pipeline entry point.
//!
//! A [`ChatSession`] owns the ordered, length-capped conversation log and
//! wires the router, synthesis loop, and composer together for one user at
//! a time. Sessions share nothing mutable with each other besides the
//! storage engine; the tenant and model are immutable for the duration of
//! one turn, with rebinding taking effect on the next turn.

use std::sync::Arc;

use reva_config::RevaConfig;
use reva_core::types::{QueryCategory, TenantContext, Turn};
use reva_core::{CompletionProvider, RevaError, SqlExecutor};
use reva_context::{fuzzy_context, schema_description};
use reva_router::QueryRouter;
use tracing::{info, warn};

use crate::compose::{NO_RESULT_APOLOGY, ResponseComposer};
use crate::state::{QueryState, SynthOutcome};
use crate::synth::DataQueryEngine;

/// Everything a session needs to know that is not a collaborator handle.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Model identifier used for every LLM call.
    pub model_id: String,
    /// Sampling temperature for every LLM call.
    pub temperature: f32,
    /// SQL correction budget per turn.
    pub max_retries: u32,
    /// Retained conversation turns; oldest dropped first.
    pub max_history: usize,
    /// Trailing turns shown to the router.
    pub router_history: usize,
    /// Tenant bound at session start.
    pub tenant: TenantContext,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model_id: "qwen/qwen-2.5-72b-instruct".to_string(),
            temperature: 0.3,
            max_retries: 2,
            max_history: 20,
            router_history: 3,
            tenant: TenantContext::unbound(),
        }
    }
}

impl SessionConfig {
    /// Resolves a session config from the loaded application config.
    ///
    /// `model_key` is a registry key (e.g. "qwen"), not a raw model id;
    /// `None` selects the configured default model and default tenant.
    pub fn from_config(config: &RevaConfig, model_key: Option<&str>) -> Result<Self, RevaError> {
        let (_, model) = config.model(model_key).ok_or_else(|| {
            RevaError::Config(format!(
                "unknown model `{}` (available: {})",
                model_key.unwrap_or(&config.llm.default_model),
                config.models.keys().cloned().collect::<Vec<_>>().join(", ")
            ))
        })?;
        let (_, tenant) = config.tenant(None).ok_or_else(|| {
            RevaError::Config(format!(
                "unknown tenant `{}`",
                config.chat.default_tenant
            ))
        })?;

        Ok(Self {
            model_id: model.id.clone(),
            temperature: model.temperature,
            max_retries: config.chat.max_retries,
            max_history: config.chat.max_history,
            router_history: config.chat.router_history,
            tenant: match &tenant.id {
                Some(id) => TenantContext::bound(id.clone()),
                None => TenantContext::unbound(),
            },
        })
    }
}

/// The answer bundle returned to front ends.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    /// Final natural-language answer; always present, even on failure.
    pub answer: String,
    /// Router verdict for this turn.
    pub category: QueryCategory,
    /// The executed SQL, when a data turn succeeded.
    pub sql: Option<String>,
    /// Machine-readable error text, when the turn degraded.
    pub error: Option<String>,
}

/// One user's conversation with the chatbot.
pub struct ChatSession {
    provider: Arc<dyn CompletionProvider>,
    executor: Arc<dyn SqlExecutor>,
    router: QueryRouter,
    engine: DataQueryEngine,
    composer: ResponseComposer,
    config: SessionConfig,
    history: Vec<Turn>,
    tenant: TenantContext,
}

impl ChatSession {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        executor: Arc<dyn SqlExecutor>,
        config: SessionConfig,
    ) -> Self {
        let router = QueryRouter::new(
            config.model_id.clone(),
            config.temperature,
            config.router_history,
        );
        let engine = DataQueryEngine::new(
            config.model_id.clone(),
            config.temperature,
            config.max_retries,
        );
        let composer = ResponseComposer::new(config.model_id.clone(), config.temperature);
        let tenant = config.tenant.clone();
        Self {
            provider,
            executor,
            router,
            engine,
            composer,
            config,
            history: Vec::new(),
            tenant,
        }
    }

    /// Answers one question.
    ///
    /// Never returns an error: every internal failure degrades into an
    /// apology answer plus a machine-readable `error` field. Raw engine
    /// errors and transport failures are logged, not shown.
    pub async fn ask(&mut self, question: &str, preserve_history: bool) -> ChatOutcome {
        let mut state = QueryState::new(
            question,
            self.history.clone(),
            self.tenant.clone(),
            self.config.model_id.clone(),
        );

        let category = self
            .router
            .classify(self.provider.as_ref(), question, &state.history)
            .await;
        state.category = Some(category);
        info!(%category, "question classified");

        match category {
            QueryCategory::Conversational => {
                state.answer = self
                    .composer
                    .compose_conversational(self.provider.as_ref(), question)
                    .await;
            }
            QueryCategory::Data => {
                self.run_data_turn(&mut state).await;
            }
        }

        if preserve_history {
            self.history.push(Turn::user(question));
            self.history.push(Turn::assistant(state.answer.clone()));
            self.truncate_history();
        }

        ChatOutcome {
            answer: state.answer,
            category,
            sql: state.outcome.as_ref().and_then(|o| o.sql().map(str::to_string)),
            error: state.error,
        }
    }

    async fn run_data_turn(&self, state: &mut QueryState) {
        let schema = schema_description(&state.tenant);
        // Fuzzy context is a hint, not a requirement: if the lists cannot
        // be read the generation still proceeds without them.
        let fuzzy = match fuzzy_context(self.executor.as_ref(), &state.tenant).await {
            Ok(context) => context,
            Err(e) => {
                warn!(error = %e, "fuzzy context unavailable");
                String::new()
            }
        };

        match self
            .engine
            .run(
                self.provider.as_ref(),
                self.executor.as_ref(),
                &state.question,
                &state.history,
                &schema,
                &fuzzy,
            )
            .await
        {
            Ok(outcome) => {
                if let SynthOutcome::Exhausted {
                    attempts,
                    last_error,
                } = &outcome
                {
                    state.error = Some(
                        RevaError::RetryExhausted {
                            attempts: *attempts,
                            last_error: last_error.clone(),
                        }
                        .to_string(),
                    );
                }
                state.answer = self
                    .composer
                    .compose_data(self.provider.as_ref(), &state.question, &outcome)
                    .await;
                state.outcome = Some(outcome);
            }
            Err(e) => {
                warn!(error = %e, "data turn failed before execution");
                state.answer = NO_RESULT_APOLOGY.to_string();
                state.error = Some(e.to_string());
            }
        }
    }

    /// Drops all retained turns.
    pub fn reset_history(&mut self) {
        self.history.clear();
    }

    /// The retained conversation log, oldest first.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Rebinds the tenant for subsequent turns. Prior history is kept.
    pub fn set_tenant(&mut self, tenant: TenantContext) {
        self.tenant = tenant;
    }

    /// The currently bound tenant.
    pub fn tenant(&self) -> &TenantContext {
        &self.tenant
    }

    fn truncate_history(&mut self) {
        let max = self.config.max_history;
        if self.history.len() > max {
            let drop = self.history.len() - max;
            self.history.drain(..drop);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::RETRY_EXHAUSTED_APOLOGY;
    use reva_core::types::SqlValue;
    use reva_test_utils::{ScriptedExecutor, ScriptedProvider};

    const QUESTION: &str = "How many projects are under construction?";
    const GOOD_SQL: &str =
        "SELECT COUNT(*) FROM projects WHERE construction_status = 'Under Construction'";

    fn session_with(
        provider: &ScriptedProvider,
        executor: &ScriptedExecutor,
        config: SessionConfig,
    ) -> ChatSession {
        ChatSession::new(
            Arc::new(provider.clone()),
            Arc::new(executor.clone()),
            config,
        )
    }

    #[tokio::test]
    async fn data_turn_first_attempt_success() {
        let provider = ScriptedProvider::new();
        provider.push_ok("data");
        provider.push_ok(GOOD_SQL);
        provider.push_ok("There are 3 projects under construction.");
        let executor = ScriptedExecutor::new();
        executor.push_rows(vec![vec![SqlValue::Integer(3)]]);

        let mut session = session_with(&provider, &executor, SessionConfig::default());
        let outcome = session.ask(QUESTION, true).await;

        assert_eq!(outcome.category, QueryCategory::Data);
        assert_eq!(outcome.answer, "There are 3 projects under construction.");
        assert_eq!(outcome.sql.as_deref(), Some(GOOD_SQL));
        assert!(outcome.error.is_none());
        // router + generation + composition, no retries consumed.
        assert_eq!(provider.call_count(), 3);
        assert_eq!(executor.execution_count(), 1);
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn data_turn_recovers_after_one_execution_failure() {
        let provider = ScriptedProvider::new();
        provider.push_ok("data");
        provider.push_ok("SELECT COUNT(*) FROM projects WHERE status = 'Under Construction'");
        provider.push_ok(GOOD_SQL);
        provider.push_ok("There are 3 projects under construction.");
        let executor = ScriptedExecutor::new();
        executor.push_failure("no such column: status");
        executor.push_rows(vec![vec![SqlValue::Integer(3)]]);

        let mut session = session_with(&provider, &executor, SessionConfig::default());
        let outcome = session.ask(QUESTION, true).await;

        assert_eq!(outcome.answer, "There are 3 projects under construction.");
        assert_eq!(outcome.sql.as_deref(), Some(GOOD_SQL));
        // router + 2 generations + composition.
        assert_eq!(provider.call_count(), 4);
        assert_eq!(executor.execution_count(), 2);
    }

    #[tokio::test]
    async fn exhausted_turn_returns_fixed_apology_without_composition_call() {
        let provider = ScriptedProvider::new();
        provider.push_ok("data");
        for _ in 0..3 {
            provider.push_ok(GOOD_SQL);
        }
        let executor = ScriptedExecutor::new();
        for _ in 0..3 {
            executor.push_failure("no such column: construction_status");
        }

        let mut session = session_with(&provider, &executor, SessionConfig::default());
        let outcome = session.ask(QUESTION, true).await;

        assert_eq!(outcome.answer, RETRY_EXHAUSTED_APOLOGY);
        assert_eq!(outcome.sql, None);
        let error = outcome.error.as_deref().unwrap();
        assert!(error.contains("3 attempts"), "got: {error}");
        assert!(error.contains("no such column: construction_status"));
        // router + 3 generations, and nothing more: the composer must not
        // call the LLM for an exhausted turn.
        assert_eq!(provider.call_count(), 4);
        assert_eq!(executor.execution_count(), 3);
    }

    #[tokio::test]
    async fn conversational_turn_never_touches_storage() {
        let provider = ScriptedProvider::new();
        provider.push_ok("general");
        provider.push_ok("Hello! How can I help you today?");
        let executor = ScriptedExecutor::new();

        let mut session = session_with(&provider, &executor, SessionConfig::default());
        let outcome = session.ask("hi!", true).await;

        assert_eq!(outcome.category, QueryCategory::Conversational);
        assert_eq!(outcome.answer, "Hello! How can I help you today?");
        assert_eq!(outcome.sql, None);
        assert_eq!(executor.execution_count(), 0);
    }

    #[tokio::test]
    async fn bound_tenant_reaches_the_generation_prompt() {
        let provider = ScriptedProvider::new();
        provider.push_ok("data");
        provider.push_ok(GOOD_SQL);
        provider.push_ok("Done.");
        let executor = ScriptedExecutor::new();
        executor.push_rows(vec![]);

        let mut session = session_with(&provider, &executor, SessionConfig::default());
        session.set_tenant(TenantContext::bound("T1"));
        session.ask(QUESTION, false).await;

        // requests: [router, generation, composition]
        let generation = &provider.requests()[1];
        assert!(generation.prompt.contains("tenant_id = 'T1'"));
    }

    #[tokio::test]
    async fn set_tenant_keeps_prior_history() {
        let provider = ScriptedProvider::new();
        provider.push_ok("general");
        provider.push_ok("Hi!");
        let executor = ScriptedExecutor::new();

        let mut session = session_with(&provider, &executor, SessionConfig::default());
        session.ask("hello", true).await;
        assert_eq!(session.history().len(), 2);

        session.set_tenant(TenantContext::bound("PURVA_001"));
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.tenant().id(), Some("PURVA_001"));
    }

    #[tokio::test]
    async fn history_is_capped_oldest_first() {
        let provider = ScriptedProvider::new();
        let executor = ScriptedExecutor::new();
        let config = SessionConfig {
            max_history: 4,
            ..SessionConfig::default()
        };
        let mut session = session_with(&provider, &executor, config);

        for i in 0..5 {
            provider.push_ok("general");
            provider.push_ok(format!("reply {i}"));
            session.ask(&format!("greeting {i}"), true).await;
        }

        // 5 turns appended 10 entries; only the 4 most recent remain.
        let history = session.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].content, "greeting 3");
        assert_eq!(history[1].content, "reply 3");
        assert_eq!(history[2].content, "greeting 4");
        assert_eq!(history[3].content, "reply 4");
    }

    #[tokio::test]
    async fn preserve_history_false_leaves_log_untouched() {
        let provider = ScriptedProvider::new();
        provider.push_ok("general");
        provider.push_ok("Hi!");
        let executor = ScriptedExecutor::new();

        let mut session = session_with(&provider, &executor, SessionConfig::default());
        session.ask("hello", false).await;
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn reset_history_clears_the_log() {
        let provider = ScriptedProvider::new();
        provider.push_ok("general");
        provider.push_ok("Hi!");
        let executor = ScriptedExecutor::new();

        let mut session = session_with(&provider, &executor, SessionConfig::default());
        session.ask("hello", true).await;
        session.reset_history();
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn generation_transport_failure_degrades_to_apology() {
        let provider = ScriptedProvider::new();
        provider.push_ok("data");
        provider.push_err(RevaError::Timeout {
            duration: std::time::Duration::from_secs(30),
        });
        let executor = ScriptedExecutor::new();

        let mut session = session_with(&provider, &executor, SessionConfig::default());
        let outcome = session.ask(QUESTION, true).await;

        assert_eq!(outcome.answer, NO_RESULT_APOLOGY);
        assert!(outcome.error.as_deref().unwrap().contains("timed out"));
        assert_eq!(executor.execution_count(), 0);
        // The apology still lands in history like any other answer.
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn router_gateway_failure_still_attempts_the_data_path() {
        let provider = ScriptedProvider::new();
        provider.push_err(RevaError::Connection("refused".into()));
        provider.push_ok(GOOD_SQL);
        provider.push_ok("There are 3 projects under construction.");
        let executor = ScriptedExecutor::new();
        executor.push_rows(vec![vec![SqlValue::Integer(3)]]);

        let mut session = session_with(&provider, &executor, SessionConfig::default());
        let outcome = session.ask(QUESTION, true).await;

        // Fail-open: the classification failure is absorbed and the turn
        // proceeds as a data query.
        assert_eq!(outcome.category, QueryCategory::Data);
        assert_eq!(outcome.answer, "There are 3 projects under construction.");
    }

    #[test]
    fn session_config_resolves_from_app_config() {
        let config = RevaConfig::default();
        let session = SessionConfig::from_config(&config, None).unwrap();
        assert_eq!(session.model_id, "qwen/qwen-2.5-72b-instruct");
        assert_eq!(session.max_retries, 2);
        assert_eq!(session.tenant, TenantContext::unbound());

        let session = SessionConfig::from_config(&config, Some("deepseek")).unwrap();
        assert_eq!(session.model_id, "deepseek/deepseek-chat");

        assert!(SessionConfig::from_config(&config, Some("nope")).is_err());
    }
}
