// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Reva chatbot pipeline.

use thiserror::Error;

/// The primary error type used across the Reva workspace.
///
/// Gateway-boundary failures are split into distinct variants so callers can
/// decide whether an error is worth retrying. The synthesis loop only ever
/// retries [`RevaError::Execution`]; transport failures during generation or
/// composition are terminal for the turn.
#[derive(Debug, Error)]
pub enum RevaError {
    /// Configuration errors (invalid TOML, missing required fields, unknown keys).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (connection, migration, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The LLM request exceeded its timeout.
    #[error("LLM request timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Could not reach the LLM endpoint at the transport level.
    #[error("LLM connection failure: {0}")]
    Connection(String),

    /// The LLM endpoint rejected our credentials (HTTP 401).
    #[error("LLM authentication failed: invalid API key")]
    Auth,

    /// The LLM endpoint is rate limiting us (HTTP 429).
    #[error("LLM rate limit exceeded")]
    RateLimited,

    /// Any other non-success HTTP status from the LLM endpoint.
    #[error("LLM API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The LLM response body could not be decoded or had no content.
    #[error("malformed LLM response: {0}")]
    MalformedResponse(String),

    /// The storage engine rejected a generated SQL statement.
    ///
    /// Carries the offending statement and the engine's error text; consumed
    /// by the retry loop and never shown raw to the end user.
    #[error("SQL execution failed: {message}")]
    Execution { sql: String, message: String },

    /// The synthesis loop spent its retry budget without a successful execution.
    #[error("SQL retry budget exhausted after {attempts} attempts: {last_error}")]
    RetryExhausted { attempts: u32, last_error: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RevaError {
    /// True when a fresh SQL generation attempt could plausibly fix the failure.
    ///
    /// Only execution errors qualify; a transport failure means there is no
    /// new statement to execute.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RevaError::Execution { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_execution_errors_are_retryable() {
        assert!(
            RevaError::Execution {
                sql: "SELECT 1".into(),
                message: "no such table".into(),
            }
            .is_retryable()
        );

        assert!(!RevaError::Auth.is_retryable());
        assert!(!RevaError::RateLimited.is_retryable());
        assert!(
            !RevaError::Timeout {
                duration: std::time::Duration::from_secs(30),
            }
            .is_retryable()
        );
        assert!(!RevaError::Connection("refused".into()).is_retryable());
        assert!(!RevaError::MalformedResponse("empty choices".into()).is_retryable());
    }

    #[test]
    fn execution_error_display_hides_sql() {
        // The Display form is what could leak into logs shown to users; it
        // must carry the engine text but not echo the statement itself.
        let err = RevaError::Execution {
            sql: "SELECT secret FROM projects".into(),
            message: "no such column: secret".into(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("no such column"));
        assert!(!rendered.contains("FROM projects"));
    }
}
