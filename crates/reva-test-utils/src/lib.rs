// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Reva pipeline tests.
//!
//! Provides scripted mock implementations of the boundary traits so the
//! router, synthesis loop, and session can be tested deterministically
//! without external services.
//!
//! # Components
//!
//! - [`ScriptedProvider`] - mock LLM gateway with a FIFO outcome script
//! - [`ScriptedExecutor`] - mock storage boundary with a FIFO outcome script

pub mod scripted_executor;
pub mod scripted_provider;

pub use scripted_executor::ScriptedExecutor;
pub use scripted_provider::ScriptedProvider;
