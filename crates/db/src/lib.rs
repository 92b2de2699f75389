//! SQLite connection bootstrap.
//!
//! Opens file-backed or in-memory connections with the pragmas the book
//! store relies on. Table creation belongs to the store that owns the table.

use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to create database directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Opens a SQLite database file, creating it and its parent directory if needed.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    tracing::info!(target: "bookshelf-db", path = %path.display(), "db_open start");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| DbError::CreateDir {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let result = Connection::open(path)
        .map_err(DbError::from)
        .and_then(|conn| {
            apply_pragmas(&conn, true)?;
            Ok(conn)
        });
    log_outcome("file", started_at, &result);
    result
}

/// Opens a private in-memory SQLite database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    tracing::info!(target: "bookshelf-db", "db_open start mode=memory");

    let result = Connection::open_in_memory()
        .map_err(DbError::from)
        .and_then(|conn| {
            apply_pragmas(&conn, false)?;
            Ok(conn)
        });
    log_outcome("memory", started_at, &result);
    result
}

fn apply_pragmas(conn: &Connection, file_backed: bool) -> DbResult<()> {
    if file_backed {
        // WAL has no effect on in-memory databases.
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;
    }
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

fn log_outcome(mode: &str, started_at: Instant, result: &DbResult<Connection>) {
    let duration_ms = started_at.elapsed().as_millis() as u64;
    match result {
        Ok(_) => tracing::info!(target: "bookshelf-db", mode, duration_ms, "db_open ok"),
        Err(err) => tracing::error!(
            target: "bookshelf-db",
            mode,
            duration_ms,
            error = %err,
            "db_open failed"
        ),
    }
}
