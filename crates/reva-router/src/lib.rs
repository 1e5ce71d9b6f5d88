// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query classification for the Reva chatbot.
//!
//! Decides, per user turn, whether a question is a greeting or needs the
//! database. The classifier is biased toward the database path: ambiguity,
//! unparseable model output, and gateway failures all resolve to
//! [`reva_core::types::QueryCategory::Data`].

pub mod router;

pub use router::{QueryRouter, parse_category};
