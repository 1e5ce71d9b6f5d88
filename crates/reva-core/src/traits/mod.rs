// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boundary trait definitions for the Reva pipeline.
//!
//! The pipeline's two external collaborators -- the LLM endpoint and the
//! listings store -- are consumed through these traits so tests can swap in
//! scripted fakes. All traits use `#[async_trait]` for dyn compatibility.

pub mod executor;
pub mod provider;

pub use executor::SqlExecutor;
pub use provider::{CompletionProvider, CompletionRequest};
