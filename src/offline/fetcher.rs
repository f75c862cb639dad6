use async_trait::async_trait;
use std::time::Duration;

use crate::offline::http::{Request, Response};

/// A failure to get any response at all. HTTP error statuses are not
/// failures; they come back as an `Ok` response.
#[derive(Debug, Clone, thiserror::Error)]
#[error("network error: {0}")]
pub struct FetchError(pub String);

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("minbar/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        let resp = self
            .client
            .request(request.method.clone(), request.url.clone())
            .send()
            .await
            .map_err(|e| FetchError(e.to_string()))?;

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes().await.map_err(|e| FetchError(e.to_string()))?;

        Ok(Response {
            status,
            content_type,
            body,
        })
    }
}
