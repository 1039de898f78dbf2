//! Schema migrations and connection setup for the SQLite backend.
//!
//! Uses `rusqlite_migration` to manage schema migrations via SQLite's
//! `user_version` pragma. Migrations are embedded at compile time via
//! `include_str!`.
//!
//! The first migration creates its tables with `IF NOT EXISTS` so that a
//! database written by the original game server is adopted in place; later
//! migrations add the constraints that database lacked.

use std::time::Duration;

use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};

use crate::error::StorageError;

/// How long a writer waits for another connection's write lock.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// All schema migrations, applied in order via `user_version` tracking.
fn migrations() -> Migrations<'static> {
    Migrations::new(vec![
        M::up(include_str!("migrations/001_initial_schema.sql")),
        M::up(include_str!("migrations/002_unique_text.sql")),
    ])
}

/// Opens (or creates) a SQLite database at `path` with WAL mode and all
/// pending migrations applied.
pub fn open_database(path: &str) -> Result<Connection, StorageError> {
    let mut conn = Connection::open(path)?;
    configure_and_migrate(&mut conn)?;
    Ok(conn)
}

/// Opens an in-memory SQLite database with all pending migrations applied.
pub fn open_in_memory() -> Result<Connection, StorageError> {
    let mut conn = Connection::open_in_memory()?;
    configure_and_migrate(&mut conn)?;
    Ok(conn)
}

/// Configures pragmas and applies pending migrations.
fn configure_and_migrate(conn: &mut Connection) -> Result<(), StorageError> {
    // WAL: readers don't block the single writer. Reports "memory" for
    // in-memory databases.
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
        row.get::<_, String>(0)
    })?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;

    migrations()
        .to_latest(conn)
        .map_err(|e| StorageError::Migration(e.to_string()))?;

    Ok(())
}

/// Writes the layout used by the original game server (user_version 0) to
/// `path`, followed by `seed`.
#[cfg(test)]
pub(crate) fn create_legacy_database(path: &str, seed: &str) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE combinations (
            str1 TEXT CHECK(length(str1) <= 100),
            str2 TEXT CHECK(length(str2) <= 100),
            cnId TEXT,
            PRIMARY KEY (str1, str2)
        );
        CREATE TABLE craftnode (
            id TEXT PRIMARY KEY,
            text TEXT CHECK(length(text) <= 100),
            emoji Text CHECK(length(emoji) <= 64),
            tags Text NULL,
            modelUrl TEXT NULL CHECK(length(modelUrl) <= 255),
            previewUrl TEXT NULL CHECK(length(previewUrl) <= 255)
        );",
    )
    .unwrap();
    conn.execute_batch(seed).unwrap();
}
