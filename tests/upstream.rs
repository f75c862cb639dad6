use reqwest::Url;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use minbar::offline::{Fetcher, HttpFetcher, Request};
use minbar::proxy::{ReqwestUpstream, Upstream, UpstreamError};

fn url(server: &MockServer, p: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), p)).unwrap()
}

#[tokio::test]
async fn decodes_json_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Rome"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let upstream = ReqwestUpstream::new(Duration::from_secs(5)).unwrap();
    let value = upstream.get_json(&url(&server, "/v1/search?name=Rome")).await.unwrap();
    assert_eq!(value, json!({"results": []}));
}

#[tokio::test]
async fn error_statuses_are_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let upstream = ReqwestUpstream::new(Duration::from_secs(5)).unwrap();
    let err = upstream.get_json(&url(&server, "/editions/eng-bukhari/1.min.json")).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Status { status: 500, .. }));
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let upstream = ReqwestUpstream::new(Duration::from_secs(5)).unwrap();
    let err = upstream.get_json(&url(&server, "/v1/forecast")).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Decode { .. }));
}

#[tokio::test]
async fn fetcher_returns_error_statuses_as_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/masjids/nowhere/today"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_raw(r#"{"error":"Masjid 'nowhere' not found"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
    let response = fetcher
        .fetch(&Request::get(url(&server, "/api/masjids/nowhere/today")))
        .await
        .unwrap();
    assert_eq!(response.status, 404);
    assert_eq!(response.content_type.as_deref(), Some("application/json"));
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["error"], "Masjid 'nowhere' not found");
}

#[tokio::test]
async fn unreachable_host_is_a_fetch_error() {
    let fetcher = HttpFetcher::new(Duration::from_millis(500)).unwrap();
    let result = fetcher
        .fetch(&Request::get(Url::parse("http://127.0.0.1:9/").unwrap()))
        .await;
    assert!(result.is_err());
}
