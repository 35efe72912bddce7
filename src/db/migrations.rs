// src/db/migrations.rs
//
// State store schema
//
// RULES:
// - schema_version records every applied version
// - A store written by a newer library is refused, never downgraded
// - Opening an initialized store is a no-op

use rusqlite::Connection;

use crate::error::{TracebackError, TracebackResult};

const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Bring the resolution state store up to `CURRENT_SCHEMA_VERSION`.
pub fn initialize_database(conn: &Connection) -> TracebackResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        apply_initial_schema(conn)?;
        set_schema_version(conn, CURRENT_SCHEMA_VERSION)?;
        log::info!("State store initialized at schema version {}", CURRENT_SCHEMA_VERSION);
    } else if current_version > CURRENT_SCHEMA_VERSION {
        return Err(TracebackError::Other(format!(
            "Schema version {} is newer than supported {}. Update the library.",
            current_version, CURRENT_SCHEMA_VERSION
        )));
    }

    Ok(())
}

/// 0 for a store that has never been initialized.
fn get_schema_version(conn: &Connection) -> TracebackResult<i32> {
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;

    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> TracebackResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
        [version],
    )?;

    Ok(())
}

fn apply_initial_schema(conn: &Connection) -> TracebackResult<()> {
    let schema = include_str!("../../schema.sql");

    conn.execute_batch(schema)
        .map_err(|e| TracebackError::Other(format!("Failed to apply initial schema: {}", e)))?;

    Ok(())
}

/// Run SQLite's integrity check over the state store.
pub fn verify_database_integrity(conn: &Connection) -> TracebackResult<()> {
    let result: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

    if result != "ok" {
        return Err(TracebackError::Other(format!(
            "Database integrity check failed: {}",
            result
        )));
    }

    Ok(())
}
