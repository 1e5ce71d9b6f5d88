// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `reva serve` command implementation.
//!
//! Exposes the pipeline over HTTP: one chat session per configured model,
//! mirroring the pipeline boundary (`ask`, `reset_history`) plus model
//! listing and a health probe. Sessions live behind per-model async locks,
//! so requests against different models proceed concurrently.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use reva_agent::{ChatSession, SessionConfig};
use reva_config::RevaConfig;
use reva_core::{CompletionProvider, RevaError, SqlExecutor};
use reva_llm::OpenRouterClient;
use reva_storage::SqliteStore;

use crate::shell::resolve_api_key;

/// Shared server state: one session per model registry key.
pub struct AppState {
    sessions: HashMap<String, Mutex<ChatSession>>,
    default_model: String,
}

impl AppState {
    /// Builds one chat session per model key against shared collaborators.
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        executor: Arc<dyn SqlExecutor>,
        config: &RevaConfig,
    ) -> Result<Self, RevaError> {
        let mut sessions = HashMap::new();
        for key in config.models.keys() {
            let session_config = SessionConfig::from_config(config, Some(key))?;
            let session = ChatSession::new(provider.clone(), executor.clone(), session_config);
            sessions.insert(key.clone(), Mutex::new(session));
        }
        Ok(Self {
            sessions,
            default_model: config.llm.default_model.clone(),
        })
    }

    fn session(&self, model: Option<&str>) -> Result<&Mutex<ChatSession>, ApiError> {
        let key = model.unwrap_or(&self.default_model);
        self.sessions.get(key).ok_or_else(|| ApiError {
            status: StatusCode::BAD_REQUEST,
            message: format!(
                "invalid model `{key}`; available: {}",
                self.sessions.keys().cloned().collect::<Vec<_>>().join(", ")
            ),
        })
    }
}

/// Request body for `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_preserve_history")]
    pub preserve_history: bool,
}

fn default_preserve_history() -> bool {
    true
}

/// Response body for `POST /chat`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub query_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request body for `POST /chat/reset`.
#[derive(Debug, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// Builds the HTTP router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/chat/reset", post(reset))
        .route("/models", get(models))
        .route("/health", get(health))
        .with_state(state)
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if request.question.trim().is_empty() {
        return Err(ApiError {
            status: StatusCode::BAD_REQUEST,
            message: "no question provided".to_string(),
        });
    }

    let session = state.session(request.model.as_deref())?;
    let outcome = session
        .lock()
        .await
        .ask(&request.question, request.preserve_history)
        .await;

    Ok(Json(ChatResponse {
        answer: outcome.answer,
        query_type: outcome.category.to_string(),
        sql_query: outcome.sql,
        error: outcome.error,
    }))
}

async fn reset(
    State(state): State<Arc<AppState>>,
    request: Option<Json<ResetRequest>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let session = state.session(request.model.as_deref())?;
    session.lock().await.reset_history();
    Ok(Json(serde_json::json!({ "status": "success" })))
}

async fn models(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let mut keys: Vec<&String> = state.sessions.keys().collect();
    keys.sort();
    Json(serde_json::json!({
        "models": keys,
        "default": state.default_model,
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "sessions_loaded": state.sessions.len(),
    }))
}

/// Runs the `reva serve` command.
pub async fn run_serve(config: RevaConfig, bind: &str) -> Result<(), RevaError> {
    let api_key = resolve_api_key(&config)?;
    let provider: Arc<dyn CompletionProvider> = Arc::new(OpenRouterClient::new(
        &api_key,
        config.llm.base_url.clone(),
        Duration::from_secs(config.llm.timeout_secs),
    )?);
    let store = SqliteStore::open(&config.storage.database_path).await?;
    let executor: Arc<dyn SqlExecutor> = Arc::new(store);

    let state = Arc::new(AppState::new(provider, executor, &config)?);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| RevaError::Internal(format!("failed to bind {bind}: {e}")))?;
    info!(%bind, sessions = state.sessions.len(), "chat API listening");

    axum::serve(listener, app(state))
        .await
        .map_err(|e| RevaError::Internal(format!("server error: {e}")))
}
