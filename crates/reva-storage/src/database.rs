// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and migrations.
//!
//! All access goes through tokio-rusqlite's single background thread, so the
//! [`Database`] handle is the single writer. Do NOT create additional
//! `Connection` instances for the same file.

use std::time::Duration;

use reva_core::RevaError;
use tracing::debug;

use crate::migrations;

/// Handle to the SQLite listings database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path`, applies PRAGMAs,
    /// and runs pending migrations.
    pub async fn open(path: &str) -> Result<Self, RevaError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| map_tr_err(e.into()))?;

        conn.call(|conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            // journal_mode returns a result row, so query it instead of updating.
            conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;
            migrations::run_migrations(conn)
                .map_err(|e| rusqlite::Error::ModuleError(e.to_string()))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, "listings database opened");
        Ok(Self { conn })
    }

    /// Opens an in-memory database. Test-only convenience.
    pub async fn open_in_memory() -> Result<Self, RevaError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| map_tr_err(e.into()))?;
        conn.call(|conn| {
            conn.pragma_update(None, "foreign_keys", "ON")?;
            migrations::run_migrations(conn)
                .map_err(|e| rusqlite::Error::ModuleError(e.to_string()))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
        Ok(Self { conn })
    }

    /// Returns the underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }
}

/// Maps a tokio-rusqlite error into the workspace error type.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> RevaError {
    RevaError::Storage {
        source: Box::new(e),
    }
}
