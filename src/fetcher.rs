//! Remote fetcher for the GitHub REST API.
//!
//! [`RemoteSource`] is the seam every live feature goes through: the
//! aggregator, stats refresh, commit listing, and the HTTP data feed take a
//! `&dyn RemoteSource`, so tests can substitute an in-memory source.
//! [`GitHubClient`] is the production implementation on top of `reqwest`.
//!
//! # Request shape
//!
//! Every request carries a fixed `User-Agent` and an `Accept` header naming
//! the expected media type. [`RequestOptions::headers`] merge into these
//! defaults: an override with the same name replaces that header, all other
//! defaults are still sent.
//!
//! # Failure taxonomy
//!
//! | Condition | Error |
//! |-----------|-------|
//! | non-2xx status | [`FetchError::RemoteRequest`] |
//! | no response (DNS, TLS, reset) | [`FetchError::Network`] |
//! | body is not the expected JSON | [`FetchError::MalformedResponse`] |
//! | override header is not valid HTTP | [`FetchError::InvalidRequest`] |
//!
//! There is no retry, timeout, or caching here: one call, one request.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Method;
use serde_json::Value;

use crate::config::GitHubConfig;

/// Why a single remote request produced no usable payload.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to fetch {endpoint} ({status})")]
    RemoteRequest { endpoint: String, status: u16 },

    #[error("network error fetching {endpoint}: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    /// The request could not be built (bad override header).
    #[error("invalid request for {endpoint}: {reason}")]
    InvalidRequest { endpoint: String, reason: String },
}

impl FetchError {
    pub fn malformed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// The endpoint the failed request was for.
    pub fn endpoint(&self) -> &str {
        match self {
            Self::RemoteRequest { endpoint, .. }
            | Self::Network { endpoint, .. }
            | Self::MalformedResponse { endpoint, .. }
            | Self::InvalidRequest { endpoint, .. } => endpoint,
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRequest { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Per-request overrides.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method; `GET` when unset.
    pub method: Option<Method>,
    /// Extra headers, merged over the defaults by name.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }
}

/// A source of JSON documents addressed by endpoint path.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Issue one request and return the parsed JSON body.
    async fn get_json(&self, endpoint: &str, options: &RequestOptions)
        -> Result<Value, FetchError>;
}

/// GitHub REST client.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    default_headers: HeaderMap,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> anyhow::Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
        default_headers.insert(ACCEPT, HeaderValue::from_str(&config.accept)?);

        Ok(Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            default_headers,
        })
    }

    /// Absolute URL for `endpoint`.
    pub fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{}", self.api_base, endpoint)
        } else {
            format!("{}/{}", self.api_base, endpoint)
        }
    }

    /// Defaults with `options.headers` merged over them.
    pub fn headers_for(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<HeaderMap, FetchError> {
        let mut headers = self.default_headers.clone();
        for (name, value) in &options.headers {
            let name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| FetchError::InvalidRequest {
                    endpoint: endpoint.to_string(),
                    reason: format!("invalid header name '{}': {}", name, e),
                })?;
            let value = HeaderValue::from_str(value).map_err(|e| FetchError::InvalidRequest {
                endpoint: endpoint.to_string(),
                reason: format!("invalid header value: {}", e),
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl RemoteSource for GitHubClient {
    async fn get_json(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<Value, FetchError> {
        let url = self.url_for(endpoint);
        let headers = self.headers_for(endpoint, options)?;
        let method = options.method.clone().unwrap_or(Method::GET);

        tracing::debug!(%method, %url, "github request");

        let response = self
            .http
            .request(method, &url)
            .headers(headers)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::RemoteRequest {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Network {
            endpoint: endpoint.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|e| FetchError::malformed(endpoint, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GitHubClient {
        GitHubClient::new(&GitHubConfig::default()).unwrap()
    }

    #[test]
    fn test_relative_endpoint_joins_api_base() {
        let c = client();
        assert_eq!(
            c.url_for("/repos/a/b"),
            "https://api.github.com/repos/a/b"
        );
        assert_eq!(c.url_for("users/a"), "https://api.github.com/users/a");
    }

    #[test]
    fn test_absolute_endpoint_is_kept() {
        let c = client();
        assert_eq!(
            c.url_for("https://example.com/x?y=1"),
            "https://example.com/x?y=1"
        );
    }

    #[test]
    fn test_trailing_slash_on_api_base() {
        let cfg = GitHubConfig {
            api_base: "http://localhost:9000/".to_string(),
            ..GitHubConfig::default()
        };
        let c = GitHubClient::new(&cfg).unwrap();
        assert_eq!(c.url_for("/users/a"), "http://localhost:9000/users/a");
    }

    #[test]
    fn test_default_headers_present() {
        let c = client();
        let h = c.headers_for("/x", &RequestOptions::default()).unwrap();
        assert_eq!(h[USER_AGENT], "girishlade111-portfolio");
        assert_eq!(h[ACCEPT], "application/vnd.github.v3+json");
    }

    #[test]
    fn test_overrides_merge_into_defaults() {
        let c = client();
        let opts = RequestOptions::default()
            .with_header("Accept", "application/vnd.github.cloak-preview+json")
            .with_header("X-Trace", "1");
        let h = c.headers_for("/x", &opts).unwrap();
        assert_eq!(h[ACCEPT], "application/vnd.github.cloak-preview+json");
        assert_eq!(h[USER_AGENT], "girishlade111-portfolio");
        assert_eq!(h["x-trace"], "1");
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn test_invalid_override_header_is_rejected() {
        let c = client();
        let opts = RequestOptions::default().with_header("bad header", "v");
        assert!(c.headers_for("/x", &opts).is_err());
    }

    #[test]
    fn test_error_accessors() {
        let e = FetchError::RemoteRequest {
            endpoint: "/repos/a/b".to_string(),
            status: 404,
        };
        assert_eq!(e.endpoint(), "/repos/a/b");
        assert_eq!(e.status(), Some(404));
        assert_eq!(e.to_string(), "failed to fetch /repos/a/b (404)");
        assert_eq!(FetchError::malformed("/x", "not an object").status(), None);
    }
}
