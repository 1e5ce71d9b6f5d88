// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query execution trait for the storage boundary.

use async_trait::async_trait;

use crate::error::RevaError;
use crate::types::{Row, TenantContext};

/// Synchronous-in-spirit SQL execution against the listings store.
///
/// The pipeline treats storage as a generic `execute` call plus the
/// distinct-name lookups that feed the fuzzy prompt context. Generated SQL
/// is expected to be read-only; implementations must reject anything else.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Executes one SQL statement and returns all result rows.
    ///
    /// Failures surface as [`RevaError::Execution`] carrying the offending
    /// statement and the engine's error text.
    async fn execute(&self, sql: &str) -> Result<Vec<Row>, RevaError>;

    /// Distinct city names across all tenants.
    async fn distinct_cities(&self) -> Result<Vec<String>, RevaError>;

    /// Distinct developer names, optionally filtered to one tenant.
    async fn distinct_developers(
        &self,
        tenant: &TenantContext,
    ) -> Result<Vec<String>, RevaError>;

    /// Distinct project names, optionally filtered to one tenant.
    async fn distinct_project_names(
        &self,
        tenant: &TenantContext,
    ) -> Result<Vec<String>, RevaError>;
}
