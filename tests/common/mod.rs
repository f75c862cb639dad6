#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use reqwest::Url;
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use minbar::config::ServerConfig;
use minbar::proxy::{Upstream, UpstreamError};
use minbar::server::{self, AppState};

/// Answers by URL path and records what was asked for.
#[derive(Default)]
pub struct StubUpstream {
    routes: Vec<(String, Value)>,
    requested: Mutex<Vec<String>>,
}

impl StubUpstream {
    pub fn with(mut self, path_suffix: &str, body: Value) -> Self {
        self.routes.push((path_suffix.to_string(), body));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl Upstream for StubUpstream {
    async fn get_json(&self, url: &Url) -> Result<Value, UpstreamError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.routes
            .iter()
            .find(|(suffix, _)| url.path().ends_with(suffix.as_str()))
            .map(|(_, body)| body.clone())
            .ok_or_else(|| UpstreamError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

pub fn server_config() -> ServerConfig {
    ServerConfig {
        geocoding_url: "http://geo.test/v1/search".into(),
        forecast_url: "http://meteo.test/v1/forecast".into(),
        hadith_primary: "http://primary.test/hadith".into(),
        hadith_secondary: "http://secondary.test/hadith".into(),
        hadith_max_number: 50,
        ..ServerConfig::default()
    }
}

pub fn app(db_path: &Path, upstream: Arc<StubUpstream>) -> Router {
    let conn = minbar::db::open(db_path).unwrap();
    server::router(AppState::new(conn, upstream, server_config()))
}

pub async fn body_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    (status, headers, body_json(response.into_body()).await)
}
