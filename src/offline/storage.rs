use anyhow::{anyhow, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Mutex;

use crate::offline::http::{Request, Response};

/// Named response caches. `put` replaces any entry for the same request
/// atomically, so storing a response twice is harmless.
pub trait CacheStorage: Send + Sync {
    fn keys(&self) -> Result<Vec<String>>;
    fn delete(&self, name: &str) -> Result<bool>;
    fn match_request(&self, name: &str, request: &Request) -> Result<Option<Response>>;
    fn put(&self, name: &str, request: &Request, response: &Response) -> Result<()>;
    fn entry_count(&self, name: &str) -> Result<usize>;
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("cache storage lock poisoned")
}

// ─── In memory ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryCacheStorage {
    caches: Mutex<BTreeMap<String, HashMap<String, Response>>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.caches.lock().map_err(poisoned)?.keys().cloned().collect())
    }

    fn delete(&self, name: &str) -> Result<bool> {
        Ok(self.caches.lock().map_err(poisoned)?.remove(name).is_some())
    }

    fn match_request(&self, name: &str, request: &Request) -> Result<Option<Response>> {
        let caches = self.caches.lock().map_err(poisoned)?;
        Ok(caches
            .get(name)
            .and_then(|c| c.get(request.cache_key()))
            .cloned())
    }

    fn put(&self, name: &str, request: &Request, response: &Response) -> Result<()> {
        self.caches
            .lock()
            .map_err(poisoned)?
            .entry(name.to_string())
            .or_default()
            .insert(request.cache_key().to_string(), response.clone());
        Ok(())
    }

    fn entry_count(&self, name: &str) -> Result<usize> {
        Ok(self
            .caches
            .lock()
            .map_err(poisoned)?
            .get(name)
            .map_or(0, HashMap::len))
    }
}

// ─── SQLite ─────────────────────────────────────────────────────────────────

/// Caches persisted to disk so a display restarted while offline still has
/// its last good responses.
pub struct SqliteCacheStorage {
    conn: Mutex<Connection>,
}

impl SqliteCacheStorage {
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             CREATE TABLE IF NOT EXISTS cache_entries (
                 cache_name    TEXT NOT NULL,
                 url           TEXT NOT NULL,
                 status        INTEGER NOT NULL,
                 content_type  TEXT,
                 body          BLOB NOT NULL,
                 stored_at     TEXT DEFAULT (datetime('now')),
                 PRIMARY KEY (cache_name, url)
             );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl CacheStorage for SqliteCacheStorage {
    fn keys(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().map_err(poisoned)?;
        let mut stmt = conn.prepare("SELECT DISTINCT cache_name FROM cache_entries ORDER BY cache_name")?;
        let names = stmt.query_map([], |row| row.get(0))?;
        Ok(names.collect::<rusqlite::Result<Vec<String>>>()?)
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let conn = self.conn.lock().map_err(poisoned)?;
        let n = conn.execute("DELETE FROM cache_entries WHERE cache_name = ?1", params![name])?;
        Ok(n > 0)
    }

    fn match_request(&self, name: &str, request: &Request) -> Result<Option<Response>> {
        let conn = self.conn.lock().map_err(poisoned)?;
        let hit = conn
            .query_row(
                "SELECT status, content_type, body FROM cache_entries WHERE cache_name = ?1 AND url = ?2",
                params![name, request.cache_key()],
                |row| {
                    Ok(Response::new(
                        row.get::<_, u16>(0)?,
                        row.get::<_, Option<String>>(1)?.as_deref(),
                        row.get::<_, Vec<u8>>(2)?,
                    ))
                },
            )
            .optional()?;
        Ok(hit)
    }

    fn put(&self, name: &str, request: &Request, response: &Response) -> Result<()> {
        let conn = self.conn.lock().map_err(poisoned)?;
        conn.execute(
            "INSERT INTO cache_entries (cache_name, url, status, content_type, body)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(cache_name, url) DO UPDATE SET
                status = excluded.status, content_type = excluded.content_type,
                body = excluded.body, stored_at = datetime('now')",
            params![
                name,
                request.cache_key(),
                response.status,
                response.content_type,
                response.body.as_ref(),
            ],
        )?;
        Ok(())
    }

    fn entry_count(&self, name: &str) -> Result<usize> {
        let conn = self.conn.lock().map_err(poisoned)?;
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM cache_entries WHERE cache_name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(path: &str) -> Request {
        Request::get(format!("http://board.local{path}").parse().unwrap())
    }

    fn exercise(storage: &dyn CacheStorage) {
        let ok = Response::new(200, Some("application/json"), r#"{"a":1}"#);
        storage.put("api-v1", &req("/api/x?q=1"), &ok).unwrap();
        storage.put("api-v1", &req("/api/x?q=1"), &Response::new(500, None, "boom")).unwrap();
        storage.put("shell-v1", &req("/"), &ok).unwrap();

        assert_eq!(storage.keys().unwrap(), vec!["api-v1", "shell-v1"]);
        assert_eq!(storage.entry_count("api-v1").unwrap(), 1);
        let hit = storage.match_request("api-v1", &req("/api/x?q=1")).unwrap().unwrap();
        assert_eq!(hit.status, 500);
        assert!(storage.match_request("api-v1", &req("/api/x?q=2")).unwrap().is_none());

        assert!(storage.delete("api-v1").unwrap());
        assert!(!storage.delete("api-v1").unwrap());
        assert_eq!(storage.keys().unwrap(), vec!["shell-v1"]);
    }

    #[test]
    fn memory_storage_semantics() {
        exercise(&MemoryCacheStorage::new());
    }

    #[test]
    fn sqlite_storage_semantics_and_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");
        exercise(&SqliteCacheStorage::open(&path).unwrap());

        let reopened = SqliteCacheStorage::open(&path).unwrap();
        let shell = reopened.match_request("shell-v1", &req("/")).unwrap().unwrap();
        assert_eq!(shell.content_type.as_deref(), Some("application/json"));
        assert_eq!(shell.body.as_ref(), br#"{"a":1}"#);
    }
}
