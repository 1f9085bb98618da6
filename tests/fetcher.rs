//! `GitHubClient` against a local HTTP stand-in for the GitHub API.

use axum::{
    http::{HeaderMap, Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use portfolio_harness::config::GitHubConfig;
use portfolio_harness::fetcher::{FetchError, GitHubClient, RemoteSource, RequestOptions};
use serde_json::{json, Value};
use std::error::Error;

// ─── Helpers ────────────────────────────────────────────────────────

async fn handle_echo(method: Method, headers: HeaderMap) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    Json(json!({
        "method": method.as_str(),
        "accept": header("accept"),
        "ua": header("user-agent"),
    }))
}

/// Serve the stand-in on an ephemeral port and return its base URL.
async fn start_api() -> String {
    let app = Router::new()
        .route(
            "/repos/girishlade111/Lade-Auth",
            get(|| async { Json(json!({ "stargazers_count": 19 })) }),
        )
        .route("/garbage", get(|| async { "<html>rate limited</html>" }))
        .route(
            "/forbidden",
            get(|| async { (StatusCode::FORBIDDEN, Json(json!({ "message": "nope" }))) }),
        )
        .route("/echo", any(handle_echo));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}", addr)
}

fn client(api_base: &str) -> GitHubClient {
    GitHubClient::new(&GitHubConfig {
        api_base: api_base.to_string(),
        ..GitHubConfig::default()
    })
    .unwrap()
}

// ─── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_json_success() {
    let client = client(&start_api().await);

    let body = client
        .get_json("/repos/girishlade111/Lade-Auth", &RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(body["stargazers_count"], 19);
}

#[tokio::test]
async fn test_not_found_is_remote_request_error() {
    let client = client(&start_api().await);

    let err = client
        .get_json("/missing", &RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::RemoteRequest { status: 404, .. }));
    assert_eq!(err.endpoint(), "/missing");
}

#[tokio::test]
async fn test_error_status_ignores_json_body() {
    let client = client(&start_api().await);

    let err = client
        .get_json("/forbidden", &RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let client = client(&start_api().await);

    let err = client
        .get_json("/garbage", &RequestOptions::default())
        .await
        .unwrap_err();

    assert!(
        matches!(err, FetchError::MalformedResponse { .. }),
        "unexpected error: {}",
        err
    );
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let client = client(&start_api().await);

    let body = client
        .get_json("/echo", &RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(body["method"], "GET");
    assert_eq!(body["accept"], "application/vnd.github.v3+json");
    assert_eq!(body["ua"], "girishlade111-portfolio");
}

#[tokio::test]
async fn test_override_header_replaces_default_only() {
    let client = client(&start_api().await);
    let options = RequestOptions::default().with_header("Accept", "x/y");

    let body = client.get_json("/echo", &options).await.unwrap();

    assert_eq!(body["accept"], "x/y");
    assert_eq!(body["ua"], "girishlade111-portfolio");
}

#[tokio::test]
async fn test_method_override() {
    let client = client(&start_api().await);
    let options = RequestOptions::default().with_method(Method::POST);

    let body = client.get_json("/echo", &options).await.unwrap();

    assert_eq!(body["method"], "POST");
}

#[tokio::test]
async fn test_invalid_override_header_is_rejected_before_sending() {
    let client = client(&start_api().await);
    let options = RequestOptions::default().with_header("bad header", "v");

    let err = client.get_json("/echo", &options).await.unwrap_err();

    assert!(matches!(err, FetchError::InvalidRequest { .. }));
}

#[tokio::test]
async fn test_unreachable_host_is_network_error_with_source() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = client(&format!("http://127.0.0.1:{}", port));

    let err = client
        .get_json("/users/girishlade111", &RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Network { .. }));
    assert!(err.source().is_some());
    assert_eq!(err.status(), None);
}
