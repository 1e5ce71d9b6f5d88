// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Reva listings database.
//!
//! Provides WAL-mode SQLite storage with embedded migrations for the
//! `projects` and `project_units` tables, a single-writer concurrency model
//! via `tokio-rusqlite`, and the generic read-only `execute` call the
//! synthesis loop feeds LLM-generated SQL into.

pub mod database;
pub mod migrations;
pub mod queries;
pub mod store;

pub use database::Database;
pub use store::SqliteStore;
