// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Reva natural-language-to-SQL chatbot.
//!
//! This crate provides the error taxonomy, common types, and the boundary
//! traits (`CompletionProvider`, `SqlExecutor`) implemented by the gateway
//! and storage crates and mocked in pipeline tests.

pub mod error;
pub mod traits;
pub mod types;

pub use error::RevaError;
pub use traits::{CompletionProvider, CompletionRequest, SqlExecutor};
pub use types::{QueryCategory, Role, Row, SqlValue, TenantContext, Turn};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct() {
        let _ = RevaError::Config("bad key".into());
        let _ = RevaError::Storage {
            source: Box::new(std::io::Error::other("disk")),
        };
        let _ = RevaError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _ = RevaError::Connection("refused".into());
        let _ = RevaError::Auth;
        let _ = RevaError::RateLimited;
        let _ = RevaError::Api {
            status: 500,
            message: "server error".into(),
        };
        let _ = RevaError::MalformedResponse("no choices".into());
        let _ = RevaError::Execution {
            sql: "SELECT 1".into(),
            message: "syntax error".into(),
        };
        let _ = RevaError::RetryExhausted {
            attempts: 3,
            last_error: "no such column".into(),
        };
        let _ = RevaError::Internal("unexpected".into());
    }

    #[test]
    fn traits_are_object_safe() {
        fn _provider(_: &dyn CompletionProvider) {}
        fn _executor(_: &dyn SqlExecutor) {}
    }

    #[test]
    fn completion_request_builder() {
        let req = CompletionRequest::new("qwen/qwen-2.5-72b-instruct", "hi")
            .with_system("be brief")
            .with_temperature(0.0);
        assert_eq!(req.model, "qwen/qwen-2.5-72b-instruct");
        assert_eq!(req.system_prompt.as_deref(), Some("be brief"));
        assert_eq!(req.prompt, "hi");
        assert_eq!(req.temperature, 0.0);
    }
}
