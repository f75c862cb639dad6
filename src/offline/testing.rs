use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::offline::fetcher::{FetchError, Fetcher};
use crate::offline::http::{Request, Response};

enum Reply {
    Respond(Response),
    Fail,
}

/// Scripted fetcher keyed on URL path. Unscripted paths answer 200 when
/// online and fail when offline.
pub struct MockFetcher {
    online: bool,
    scripted: HashMap<String, Reply>,
    requested: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn online() -> Self {
        Self {
            online: true,
            scripted: HashMap::new(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn offline() -> Self {
        Self {
            online: false,
            ..Self::online()
        }
    }

    pub fn with_status(self, path: &str, status: u16) -> Self {
        self.with_body(path, status, serde_json::json!({ "status": status }))
    }

    pub fn with_body(mut self, path: &str, status: u16, body: serde_json::Value) -> Self {
        self.scripted
            .insert(path.to_string(), Reply::Respond(Response::json_body(status, &body)));
        self
    }

    pub fn with_failure(mut self, path: &str) -> Self {
        self.scripted.insert(path.to_string(), Reply::Fail);
        self
    }

    pub fn calls(&self) -> usize {
        self.requested.lock().unwrap().len()
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        self.requested.lock().unwrap().push(request.url.to_string());
        match self.scripted.get(request.url.path()) {
            Some(Reply::Respond(r)) => Ok(r.clone()),
            Some(Reply::Fail) => Err(FetchError("connection refused".into())),
            None if self.online => Ok(Response::json_body(
                200,
                &serde_json::json!({ "path": request.url.path() }),
            )),
            None => Err(FetchError("connection refused".into())),
        }
    }
}
