use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::proxy::error::UpstreamError;
use crate::proxy::upstream::Upstream;

/// Answers by exact URL first, then by path; anything else is a 404.
pub struct MockUpstream {
    by_url: HashMap<String, Value>,
    by_path: HashMap<String, Value>,
    requested: Mutex<Vec<String>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self {
            by_url: HashMap::new(),
            by_path: HashMap::new(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, path: &str, body: Value) -> Self {
        self.by_path.insert(path.to_string(), body);
        self
    }

    pub fn with_url(mut self, url: &str, body: Value) -> Self {
        self.by_url.insert(url.to_string(), body);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl Upstream for MockUpstream {
    async fn get_json(&self, url: &Url) -> Result<Value, UpstreamError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.by_url
            .get(url.as_str())
            .or_else(|| self.by_path.get(url.path()))
            .cloned()
            .ok_or_else(|| UpstreamError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
