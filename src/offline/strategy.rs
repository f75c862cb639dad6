use crate::offline::fetcher::FetchError;
use crate::offline::http::{Request, Response};
use crate::offline::worker::{OfflineWorker, Served, Source};

impl OfflineWorker {
    fn store(&self, cache: &str, request: &Request, response: &Response) {
        if let Err(e) = self.storage.put(cache, request, response) {
            log::warn!("Could not cache {}: {:#}", request.url, e);
        }
    }

    fn lookup(&self, cache: &str, request: &Request) -> Option<Response> {
        match self.storage.match_request(cache, request) {
            Ok(hit) => hit,
            Err(e) => {
                log::warn!("Cache read failed for {}: {:#}", request.url, e);
                None
            }
        }
    }

    /// A hit is returned as-is and never revalidated.
    pub async fn cache_first(&self, request: &Request) -> Result<Served, FetchError> {
        if let Some(hit) = self.lookup(&self.names.shell, request) {
            return Ok(Served::new(hit, Source::Cache));
        }
        let response = self.fetcher.fetch(request).await?;
        self.store(&self.names.shell, request, &response);
        Ok(Served::new(response, Source::Network))
    }

    /// Always produces a response: network, then cache, then a 503 body.
    pub async fn network_first(&self, request: &Request) -> Served {
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.store(&self.names.api, request, &response);
                Served::new(response, Source::Network)
            }
            Err(e) => {
                log::info!("Offline for {}: {}", request.url, e);
                match self.lookup(&self.names.api, request) {
                    Some(hit) => Served::new(hit, Source::Cache),
                    None => Served::new(Response::offline_unavailable(), Source::Synthesized),
                }
            }
        }
    }

    /// Falls back to the cached page, then the cached root shell.
    pub async fn network_with_shell_fallback(&self, request: &Request) -> Result<Served, FetchError> {
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.store(&self.names.shell, request, &response);
                Ok(Served::new(response, Source::Network))
            }
            Err(e) => {
                if let Some(hit) = self.lookup(&self.names.shell, request) {
                    return Ok(Served::new(hit, Source::Cache));
                }
                let root = self.url("/").map(Request::get).ok();
                match root.and_then(|r| self.lookup(&self.names.shell, &r)) {
                    Some(shell) => Ok(Served::new(shell, Source::Cache)),
                    None => Err(e),
                }
            }
        }
    }
}
