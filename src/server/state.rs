use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::config::ServerConfig;
use crate::proxy::{ProxyError, ProxyResult, Upstream};

/// Shared state handed to every handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub upstream: Arc<dyn Upstream>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Connection, upstream: Arc<dyn Upstream>, config: ServerConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            upstream,
            config: Arc::new(config),
        }
    }

    /// Run a store query with the connection locked. Never call across an await.
    pub fn with_db<T>(&self, f: impl FnOnce(&Connection) -> anyhow::Result<T>) -> ProxyResult<T> {
        let conn = self
            .db
            .lock()
            .map_err(|_| ProxyError::Internal("database lock poisoned".into()))?;
        Ok(f(&conn)?)
    }
}
