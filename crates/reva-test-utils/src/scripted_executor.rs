// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted SQL executor for deterministic pipeline tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use reva_core::types::{Row, TenantContext};
use reva_core::{RevaError, SqlExecutor};

/// A mock storage boundary that replays a fixed script of execution
/// outcomes and serves fixed distinct-name lists.
#[derive(Clone, Default)]
pub struct ScriptedExecutor {
    script: Arc<Mutex<VecDeque<Result<Vec<Row>, RevaError>>>>,
    executed: Arc<Mutex<Vec<String>>>,
    cities: Arc<Mutex<Vec<String>>>,
    developers: Arc<Mutex<Vec<String>>>,
    projects: Arc<Mutex<Vec<String>>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful execution returning `rows`.
    pub fn push_rows(&self, rows: Vec<Row>) {
        self.script.lock().unwrap().push_back(Ok(rows));
    }

    /// Queue an execution failure with the given engine message.
    pub fn push_failure(&self, message: impl Into<String>) {
        let message = message.into();
        self.script.lock().unwrap().push_back(Err(RevaError::Execution {
            sql: String::new(),
            message,
        }));
    }

    /// Queue an arbitrary error (e.g. a storage infrastructure failure).
    pub fn push_error(&self, err: RevaError) {
        self.script.lock().unwrap().push_back(Err(err));
    }

    /// Set the distinct-name lists served to the fuzzy context builder.
    pub fn set_names(&self, cities: Vec<String>, developers: Vec<String>, projects: Vec<String>) {
        *self.cities.lock().unwrap() = cities;
        *self.developers.lock().unwrap() = developers;
        *self.projects.lock().unwrap() = projects;
    }

    /// All statements executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    /// Number of execution attempts received.
    pub fn execution_count(&self) -> usize {
        self.executed.lock().unwrap().len()
    }
}

#[async_trait]
impl SqlExecutor for ScriptedExecutor {
    async fn execute(&self, sql: &str) -> Result<Vec<Row>, RevaError> {
        self.executed.lock().unwrap().push(sql.to_string());
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RevaError::Internal("executor script exhausted".into())));
        // Backfill the statement into scripted failures so assertions see it.
        match next {
            Err(RevaError::Execution { message, .. }) => Err(RevaError::Execution {
                sql: sql.to_string(),
                message,
            }),
            other => other,
        }
    }

    async fn distinct_cities(&self) -> Result<Vec<String>, RevaError> {
        Ok(self.cities.lock().unwrap().clone())
    }

    async fn distinct_developers(
        &self,
        _tenant: &TenantContext,
    ) -> Result<Vec<String>, RevaError> {
        Ok(self.developers.lock().unwrap().clone())
    }

    async fn distinct_project_names(
        &self,
        _tenant: &TenantContext,
    ) -> Result<Vec<String>, RevaError> {
        Ok(self.projects.lock().unwrap().clone())
    }
}
