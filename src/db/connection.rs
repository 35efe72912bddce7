// src/db/connection.rs
//
// State store connections
//
// RULES:
// - Callers own the pool; nothing here is global
// - File pools run in WAL mode with a busy timeout

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::error::{TracebackError, TracebackResult};

pub type ConnectionPool = Pool<SqliteConnectionManager>;

pub type PooledConn = PooledConnection<SqliteConnectionManager>;

const CONNECTION_PRAGMAS: &str = "PRAGMA journal_mode = WAL;
     PRAGMA synchronous = NORMAL;
     PRAGMA busy_timeout = 5000;";

/// Get the database file path
///
/// Path structure: {APP_DATA}/traceback/traceback.db
pub fn get_database_path() -> TracebackResult<PathBuf> {
    let app_data_dir = dirs::data_dir()
        .ok_or_else(|| TracebackError::Other("Could not determine app data directory".to_string()))?;

    let traceback_dir = app_data_dir.join("traceback");
    std::fs::create_dir_all(&traceback_dir)?;

    Ok(traceback_dir.join("traceback.db"))
}

/// Create a connection pool in the application data directory
pub fn create_connection_pool() -> TracebackResult<ConnectionPool> {
    let db_path = get_database_path()?;
    create_connection_pool_at(&db_path)
}

/// Create a connection pool backed by `db_path`
///
/// Pool configuration:
/// - Few connections (resolution is sequential)
/// - SQLite in WAL mode
/// - Busy timeout set to avoid immediate errors
pub fn create_connection_pool_at(db_path: &Path) -> TracebackResult<ConnectionPool> {
    let manager = SqliteConnectionManager::file(db_path)
        .with_init(|conn| conn.execute_batch(CONNECTION_PRAGMAS));

    Pool::builder()
        .max_size(4)
        .build(manager)
        .map_err(|e| TracebackError::Pool(format!("Failed to create connection pool: {}", e)))
}

/// Single-connection pool over a private in-memory database
///
/// One connection only: every new in-memory connection is a fresh database.
pub fn create_memory_pool() -> TracebackResult<ConnectionPool> {
    let manager = SqliteConnectionManager::memory();

    Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|e| TracebackError::Pool(format!("Failed to create connection pool: {}", e)))
}

/// Get a connection from the pool
pub fn get_connection(pool: &ConnectionPool) -> TracebackResult<PooledConn> {
    pool.get()
        .map_err(|e| TracebackError::Pool(format!("Failed to get database connection: {}", e)))
}

/// Create a standalone in-memory connection (for testing)
pub fn create_test_connection() -> TracebackResult<Connection> {
    let conn = Connection::open_in_memory()?;
    Ok(conn)
}
