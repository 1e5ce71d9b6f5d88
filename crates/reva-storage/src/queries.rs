// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query operations against the listings database.
//!
//! `execute_sql` is the generic entry point the synthesis loop feeds
//! LLM-generated statements into; the distinct-name queries feed the fuzzy
//! prompt context. Generated SQL must be read-only and is gated here before
//! it reaches the engine.

use reva_core::types::{Row, SqlValue, TenantContext};
use reva_core::RevaError;
use rusqlite::params;
use rusqlite::types::ValueRef;

use crate::database::{Database, map_tr_err};

/// Executes one read-only SQL statement and returns all result rows.
///
/// Engine failures (malformed SQL, unknown column, ...) surface as
/// [`RevaError::Execution`] carrying the offending statement and the
/// engine's error text, which the retry loop feeds back into the next
/// generation prompt.
pub async fn execute_sql(db: &Database, sql: &str) -> Result<Vec<Row>, RevaError> {
    assert_read_only(sql)?;

    let statement = sql.trim().to_string();
    let for_closure = statement.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&for_closure)?;
            let column_count = stmt.column_count();
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                let mut record = Vec::with_capacity(column_count);
                for idx in 0..column_count {
                    record.push(value_from_ref(row.get_ref(idx)?));
                }
                out.push(record);
            }
            Ok(out)
        })
        .await
        .map_err(|e| map_execution_err(&statement, e))
}

/// Distinct city names across all tenants, alphabetically.
pub async fn distinct_cities(db: &Database) -> Result<Vec<String>, RevaError> {
    distinct_names(db, "city", &TenantContext::unbound()).await
}

/// Distinct developer names, optionally scoped to one tenant.
pub async fn distinct_developers(
    db: &Database,
    tenant: &TenantContext,
) -> Result<Vec<String>, RevaError> {
    distinct_names(db, "developer_name", tenant).await
}

/// Distinct project names, optionally scoped to one tenant.
pub async fn distinct_project_names(
    db: &Database,
    tenant: &TenantContext,
) -> Result<Vec<String>, RevaError> {
    distinct_names(db, "project_name", tenant).await
}

/// Row counts for both domain tables.
pub async fn table_counts(db: &Database) -> Result<(i64, i64), RevaError> {
    db.connection()
        .call(|conn| {
            let projects =
                conn.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))?;
            let units =
                conn.query_row("SELECT COUNT(*) FROM project_units", [], |row| row.get(0))?;
            Ok((projects, units))
        })
        .await
        .map_err(map_tr_err)
}

/// Cheap connectivity check.
pub async fn ping(db: &Database) -> Result<(), RevaError> {
    db.connection()
        .call(|conn| {
            conn.query_row("SELECT 1", [], |_| Ok(()))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

async fn distinct_names(
    db: &Database,
    column: &'static str,
    tenant: &TenantContext,
) -> Result<Vec<String>, RevaError> {
    let tenant_id = tenant.id().map(str::to_string);
    db.connection()
        .call(move |conn| {
            let mut names = Vec::new();
            match &tenant_id {
                Some(id) => {
                    let sql = format!(
                        "SELECT DISTINCT {column} FROM projects \
                         WHERE {column} IS NOT NULL AND tenant_id = ?1 ORDER BY {column}"
                    );
                    let mut stmt = conn.prepare(&sql)?;
                    let rows = stmt.query_map(params![id], |row| row.get::<_, String>(0))?;
                    for row in rows {
                        names.push(row?);
                    }
                }
                None => {
                    let sql = format!(
                        "SELECT DISTINCT {column} FROM projects \
                         WHERE {column} IS NOT NULL ORDER BY {column}"
                    );
                    let mut stmt = conn.prepare(&sql)?;
                    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
                    for row in rows {
                        names.push(row?);
                    }
                }
            }
            Ok(names)
        })
        .await
        .map_err(map_tr_err)
}

/// Rejects anything that is not a plain read.
///
/// Nothing stops an LLM from emitting `DELETE` or `DROP`; the gate runs
/// before the statement reaches the engine so destructive output fails the
/// same way malformed SQL does and flows into the retry prompt.
fn assert_read_only(sql: &str) -> Result<(), RevaError> {
    let first_keyword = sql
        .trim_start()
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("")
        .to_ascii_uppercase();

    match first_keyword.as_str() {
        "SELECT" | "WITH" => Ok(()),
        _ => Err(RevaError::Execution {
            sql: sql.to_string(),
            message: "only read-only SELECT statements are allowed".to_string(),
        }),
    }
}

fn value_from_ref(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(v) => SqlValue::Integer(v),
        ValueRef::Real(v) => SqlValue::Real(v),
        ValueRef::Text(v) => SqlValue::Text(String::from_utf8_lossy(v).into_owned()),
        ValueRef::Blob(_) => SqlValue::Text("<blob>".to_string()),
    }
}

fn map_execution_err(sql: &str, e: tokio_rusqlite::Error) -> RevaError {
    match e {
        tokio_rusqlite::Error::Error(e) => RevaError::Execution {
            sql: sql.to_string(),
            message: e.to_string(),
        },
        other => map_tr_err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_db() -> Database {
        let db = Database::open_in_memory().await.unwrap();
        db.connection()
            .call(|conn| {
                conn.execute_batch(
                    "INSERT INTO projects (project_id, tenant_id, project_name, developer_name, city, construction_status)
                     VALUES
                       ('P1', 'TM_TEAM_001', 'Casagrand Bloom', 'Casagrand', 'Chennai', 'Under Construction'),
                       ('P2', 'TM_TEAM_001', 'Casagrand Zenith', 'Casagrand', 'Bangalore', 'Under Construction'),
                       ('P3', 'PURVA_001', 'Purva Meraki', 'Purvankara', 'Bangalore', 'Ready to Move');
                     INSERT INTO project_units (unit_id, project_id, tenant_id, configuration_type, property_type, base_price)
                     VALUES
                       ('U1', 'P1', 'TM_TEAM_001', '3BHK', 'Apartment', 9500000),
                       ('U2', 'P3', 'PURVA_001', '2BHK', 'Apartment', 7200000);",
                )?;
                Ok::<(), rusqlite::Error>(())
            })
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn execute_returns_typed_rows() {
        let db = seeded_db().await;
        let rows = execute_sql(
            &db,
            "SELECT COUNT(*) FROM projects WHERE construction_status = 'Under Construction'",
        )
        .await
        .unwrap();
        assert_eq!(rows, vec![vec![SqlValue::Integer(2)]]);
    }

    #[tokio::test]
    async fn execute_returns_empty_rows_without_error() {
        let db = seeded_db().await;
        let rows = execute_sql(&db, "SELECT project_name FROM projects WHERE city = 'Pune'")
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn execute_surfaces_engine_error_with_sql() {
        let db = seeded_db().await;
        let sql = "SELECT frobnication_status FROM projects";
        let err = execute_sql(&db, sql).await.unwrap_err();
        match err {
            RevaError::Execution { sql: failed, message } => {
                assert_eq!(failed, sql);
                assert!(message.contains("frobnication_status"), "got: {message}");
            }
            other => panic!("expected Execution, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn execute_rejects_destructive_statements() {
        let db = seeded_db().await;
        for sql in [
            "DELETE FROM projects",
            "DROP TABLE projects",
            "UPDATE projects SET city = 'Atlantis'",
            "INSERT INTO projects (project_id, tenant_id, project_name, developer_name, city) VALUES ('X', 'T', 'N', 'D', 'C')",
        ] {
            let err = execute_sql(&db, sql).await.unwrap_err();
            assert!(matches!(err, RevaError::Execution { .. }), "{sql}");
        }
        // The data is untouched.
        let rows = execute_sql(&db, "SELECT COUNT(*) FROM projects").await.unwrap();
        assert_eq!(rows, vec![vec![SqlValue::Integer(3)]]);
    }

    #[tokio::test]
    async fn execute_allows_cte_reads() {
        let db = seeded_db().await;
        let rows = execute_sql(
            &db,
            "WITH c AS (SELECT city FROM projects) SELECT COUNT(DISTINCT city) FROM c",
        )
        .await
        .unwrap();
        assert_eq!(rows, vec![vec![SqlValue::Integer(2)]]);
    }

    #[tokio::test]
    async fn distinct_names_respect_tenant_scope() {
        let db = seeded_db().await;

        let cities = distinct_cities(&db).await.unwrap();
        assert_eq!(cities, vec!["Bangalore", "Chennai"]);

        let all_devs = distinct_developers(&db, &TenantContext::unbound())
            .await
            .unwrap();
        assert_eq!(all_devs, vec!["Casagrand", "Purvankara"]);

        let purva_projects = distinct_project_names(&db, &TenantContext::bound("PURVA_001"))
            .await
            .unwrap();
        assert_eq!(purva_projects, vec!["Purva Meraki"]);
    }

    #[tokio::test]
    async fn counts_and_ping() {
        let db = seeded_db().await;
        assert_eq!(table_counts(&db).await.unwrap(), (3, 2));
        ping(&db).await.unwrap();
    }
}
