// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Reva pipeline crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Who produced a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One exchange in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The router's verdict on a user question.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QueryCategory {
    /// Greetings, farewells, thanks -- answered without touching the database.
    Conversational,
    /// Everything else, including ambiguous input.
    Data,
}

/// The tenant a session is scoped to.
///
/// `None` means no filtering: queries run across all tenants. Once bound,
/// every generated statement touching the domain tables must carry an
/// equality filter on the tenant column; the schema description enforces
/// this through an explicit reminder block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext(Option<String>);

impl TenantContext {
    /// A context filtered to one tenant identifier.
    pub fn bound(id: impl Into<String>) -> Self {
        Self(Some(id.into()))
    }

    /// A context with no tenant filtering.
    pub fn unbound() -> Self {
        Self(None)
    }

    /// The bound tenant identifier, if any.
    pub fn id(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// A single cell of a SQL result row.
///
/// SQLite's dynamic typing collapses to four value kinds here; BLOB columns
/// do not occur in the listings schema and are rendered as text placeholders
/// if they ever appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Integer(v) => write!(f, "{v}"),
            SqlValue::Real(v) => write!(f, "{v}"),
            SqlValue::Text(v) => write!(f, "{v}"),
        }
    }
}

/// One result row from the storage boundary.
pub type Row = Vec<SqlValue>;
