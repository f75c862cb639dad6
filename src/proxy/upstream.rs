use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

use crate::proxy::error::UpstreamError;

#[async_trait]
pub trait Upstream: Send + Sync {
    /// GET `url` and decode the body as JSON. Non-2xx statuses are errors.
    async fn get_json(&self, url: &Url) -> Result<Value, UpstreamError>;
}

pub struct ReqwestUpstream {
    client: reqwest::Client,
}

impl ReqwestUpstream {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("minbar/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Upstream for ReqwestUpstream {
    async fn get_json(&self, url: &Url) -> Result<Value, UpstreamError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| UpstreamError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.json::<Value>().await.map_err(|e| UpstreamError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
