// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenRouter chat-completions gateway for the Reva chatbot.
//!
//! A thin, stateless request/response wrapper: one call per completion,
//! a bounded timeout, and typed mapping of transport/HTTP failures. No
//! streaming, no caching, and no internal retry -- the synthesis loop owns
//! all retry policy.

pub mod client;
pub mod types;

pub use client::OpenRouterClient;
