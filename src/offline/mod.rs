//! Offline resilience for the display: every request to the board server
//! goes through an [`OfflineWorker`], which answers from the network when it
//! can and from persisted caches when it cannot.

pub mod fetcher;
pub mod http;
pub mod storage;
mod strategy;
pub mod worker;

#[cfg(test)]
pub mod testing;

pub use fetcher::{FetchError, Fetcher, HttpFetcher};
pub use http::{Request, RequestMode, Response};
pub use storage::{CacheStorage, MemoryCacheStorage, SqliteCacheStorage};
pub use worker::{CacheNames, OfflineWorker, Route, Served, Source, SHELL_MANIFEST};
