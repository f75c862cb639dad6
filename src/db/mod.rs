pub mod migrations;
pub mod repository;
pub mod seed;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open the board store with WAL enabled and the schema up to date.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("Opening database at {:?}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}
