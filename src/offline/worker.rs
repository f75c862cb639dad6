use anyhow::{anyhow, Result};
use reqwest::{Method, Url};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::offline::fetcher::{FetchError, Fetcher};
use crate::offline::http::{Request, RequestMode, Response};
use crate::offline::storage::CacheStorage;

/// Paths pre-cached at install time.
pub const SHELL_MANIFEST: &[&str] = &["/", "/manifest.json", "/favicon.ico", "/static/board.css"];

const STATIC_PREFIX: &str = "/static/";
const API_PREFIX: &str = "/api/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheNames {
    pub shell: String,
    pub api: String,
}

impl CacheNames {
    pub fn for_version(version: &str) -> Self {
        Self {
            shell: format!("minbar-shell-{version}"),
            api: format!("minbar-api-{version}"),
        }
    }

    fn contains(&self, name: &str) -> bool {
        name == self.shell || name == self.api
    }
}

/// How a request is handled once intercepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Passthrough,
    Navigation,
    CacheFirst,
    NetworkFirst,
}

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Network,
    Cache,
    Synthesized,
    Passthrough,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Served {
    pub response: Response,
    pub source: Source,
}

impl Served {
    pub(crate) fn new(response: Response, source: Source) -> Self {
        Self { response, source }
    }

    /// True when the network could not be reached for this response.
    pub fn is_offline(&self) -> bool {
        matches!(self.source, Source::Cache | Source::Synthesized)
    }
}

/// Intercepts requests to one origin and answers them from the network or
/// from two versioned caches.
pub struct OfflineWorker {
    pub(crate) fetcher: Arc<dyn Fetcher>,
    pub(crate) storage: Arc<dyn CacheStorage>,
    origin: Url,
    pub(crate) names: CacheNames,
    skip_waiting: AtomicBool,
    claimed: AtomicBool,
}

impl OfflineWorker {
    pub fn new(fetcher: Arc<dyn Fetcher>, storage: Arc<dyn CacheStorage>, origin: Url, version: &str) -> Self {
        Self {
            fetcher,
            storage,
            origin,
            names: CacheNames::for_version(version),
            skip_waiting: AtomicBool::new(false),
            claimed: AtomicBool::new(false),
        }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn cache_names(&self) -> &CacheNames {
        &self.names
    }

    pub fn url(&self, path_and_query: &str) -> Result<Url> {
        self.origin
            .join(path_and_query)
            .map_err(|e| anyhow!("Bad path '{}': {}", path_and_query, e))
    }

    /// Pre-populate the shell cache. All manifest entries must load with a
    /// success status or nothing is stored.
    pub async fn install(&self) -> Result<()> {
        let mut fetched = Vec::with_capacity(SHELL_MANIFEST.len());
        for path in SHELL_MANIFEST {
            let request = Request::get(self.url(path)?);
            let response = self.fetcher.fetch(&request).await?;
            if !response.is_success() {
                return Err(anyhow!("Shell asset {} returned {}", path, response.status));
            }
            fetched.push((request, response));
        }
        for (request, response) in &fetched {
            self.storage.put(&self.names.shell, request, response)?;
        }
        self.skip_waiting.store(true, Ordering::SeqCst);
        log::info!("Offline worker installed {} shell assets into {}", fetched.len(), self.names.shell);
        Ok(())
    }

    /// Drop caches from other versions and take control.
    pub fn activate(&self) -> Result<Vec<String>> {
        let mut dropped = Vec::new();
        for name in self.storage.keys()? {
            if !self.names.contains(&name) {
                self.storage.delete(&name)?;
                dropped.push(name);
            }
        }
        if !dropped.is_empty() {
            log::info!("Dropped stale caches: {}", dropped.join(", "));
        }
        self.claimed.store(true, Ordering::SeqCst);
        Ok(dropped)
    }

    /// Install then activate. A failed install is logged and activation
    /// continues so caches persisted by an earlier run keep serving.
    pub async fn start(&self) -> Result<()> {
        if let Err(e) = self.install().await {
            log::warn!("Offline worker install failed: {:#}", e);
        }
        self.activate()?;
        Ok(())
    }

    pub fn is_waiting_skipped(&self) -> bool {
        self.skip_waiting.load(Ordering::SeqCst)
    }

    pub fn is_controlling(&self) -> bool {
        self.claimed.load(Ordering::SeqCst)
    }

    pub fn classify(&self, request: &Request) -> Route {
        if request.method != Method::GET || request.url.origin() != self.origin.origin() {
            return Route::Passthrough;
        }
        if request.mode == RequestMode::Navigate {
            return Route::Navigation;
        }
        let path = request.url.path();
        if path.starts_with(STATIC_PREFIX) || SHELL_MANIFEST.contains(&path) {
            Route::CacheFirst
        } else if path.starts_with(API_PREFIX) {
            Route::NetworkFirst
        } else {
            Route::Passthrough
        }
    }

    pub async fn fetch(&self, request: &Request) -> Result<Served, FetchError> {
        let route = self.classify(request);
        log::debug!("{:?} {}", route, request.url);
        match route {
            Route::Passthrough => {
                let response = self.fetcher.fetch(request).await?;
                Ok(Served::new(response, Source::Passthrough))
            }
            Route::Navigation => self.network_with_shell_fallback(request).await,
            Route::CacheFirst => self.cache_first(request).await,
            Route::NetworkFirst => Ok(self.network_first(request).await),
        }
    }
}
