// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt-side context assembly for the Reva chatbot.
//!
//! This crate renders everything the SQL generator needs to see besides the
//! question itself: the schema description (with tenant filter reminders),
//! the fuzzy entity-name hint block, and the fixed system prompts for each
//! pipeline stage.

pub mod fuzzy;
pub mod prompts;
pub mod schema;

pub use fuzzy::{fuzzy_context, matching_developers, matching_projects, normalize_city};
pub use schema::schema_description;
