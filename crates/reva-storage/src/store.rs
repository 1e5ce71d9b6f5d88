// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the `SqlExecutor` trait.

use async_trait::async_trait;
use reva_core::types::{Row, TenantContext};
use reva_core::{RevaError, SqlExecutor};

use crate::database::Database;
use crate::queries;

/// SQLite-backed executor handed to the pipeline.
///
/// Wraps a [`Database`] handle and delegates to the typed query functions.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Opens the store at `path`, running migrations if needed.
    pub async fn open(path: &str) -> Result<Self, RevaError> {
        Ok(Self {
            db: Database::open(path).await?,
        })
    }

    /// Opens an in-memory store. Test-only convenience.
    pub async fn open_in_memory() -> Result<Self, RevaError> {
        Ok(Self {
            db: Database::open_in_memory().await?,
        })
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Row counts for both domain tables (for the status front end).
    pub async fn table_counts(&self) -> Result<(i64, i64), RevaError> {
        queries::table_counts(&self.db).await
    }

    /// Cheap connectivity check (for the status front end).
    pub async fn ping(&self) -> Result<(), RevaError> {
        queries::ping(&self.db).await
    }
}

#[async_trait]
impl SqlExecutor for SqliteStore {
    async fn execute(&self, sql: &str) -> Result<Vec<Row>, RevaError> {
        queries::execute_sql(&self.db, sql).await
    }

    async fn distinct_cities(&self) -> Result<Vec<String>, RevaError> {
        queries::distinct_cities(&self.db).await
    }

    async fn distinct_developers(
        &self,
        tenant: &TenantContext,
    ) -> Result<Vec<String>, RevaError> {
        queries::distinct_developers(&self.db, tenant).await
    }

    async fn distinct_project_names(
        &self,
        tenant: &TenantContext,
    ) -> Result<Vec<String>, RevaError> {
        queries::distinct_project_names(&self.db, tenant).await
    }
}
