//! HTTP client wrapper for single-shot GET fetches.
//!
//! One pooled reqwest [`Client`] is built at startup and shared by every
//! fetch task. Certificate validation is disabled deliberately: the tool
//! targets hosts with self-signed certificates, and that trade-off is the
//! operator's explicit choice.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};
use url::Url;

use super::error::FetchError;
use crate::extract::{ExtractError, ResponseParts};

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (60 seconds per request).
pub const READ_TIMEOUT_SECS: u64 = 60;

/// HTTP client for fetching target URLs.
///
/// Cheap to clone; clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with default timeouts and the given request
    /// headers applied to every fetch.
    ///
    /// Header pairs that are not representable as HTTP header names or
    /// values are skipped with a warning rather than failing the run.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new(request_headers: &[(String, String)]) -> Self {
        Self::new_with_timeouts(request_headers, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(
        request_headers: &[(String, String)],
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            // Operator choice: targets commonly carry self-signed certs.
            .danger_accept_invalid_certs(true)
            .default_headers(build_header_map(request_headers))
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Issues one GET request and hands back the live response.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Timeout`] when the request deadline passes
    /// and [`FetchError::Network`] for every other transport failure.
    pub async fn get(&self, url: &Url) -> Result<LiveResponse, FetchError> {
        debug!(url = %url, "sending GET request");
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url.as_str())
            } else {
                FetchError::network(url.as_str(), e)
            }
        })?;
        Ok(LiveResponse { inner: response })
    }
}

/// Converts configured header pairs into a reqwest header map, skipping
/// pairs the wire format cannot represent.
fn build_header_map(request_headers: &[(String, String)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in request_headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => warn!(header = name, "skipping unrepresentable request header"),
        }
    }
    map
}

/// A live network response, consumed once during extraction.
#[derive(Debug)]
pub struct LiveResponse {
    inner: reqwest::Response,
}

impl ResponseParts for LiveResponse {
    fn status_code(&self) -> u16 {
        self.inner.status().as_u16()
    }

    fn headers_text(&self) -> String {
        let mut block = String::new();
        for (name, value) in self.inner.headers() {
            block.push_str(name.as_str());
            block.push_str(": ");
            block.push_str(&String::from_utf8_lossy(value.as_bytes()));
            block.push('\n');
        }
        block
    }

    fn cookies_text(&self) -> String {
        let mut block = String::new();
        for cookie in self.inner.cookies() {
            block.push_str(cookie.name());
            block.push('=');
            block.push_str(cookie.value());
            if let Some(domain) = cookie.domain() {
                block.push_str("; Domain=");
                block.push_str(domain);
            }
            if let Some(path) = cookie.path() {
                block.push_str("; Path=");
                block.push_str(path);
            }
            if cookie.secure() {
                block.push_str("; Secure");
            }
            if cookie.http_only() {
                block.push_str("; HttpOnly");
            }
            block.push('\n');
        }
        block
    }

    async fn body_text(self) -> Result<String, ExtractError> {
        self.inner
            .text()
            .await
            .map_err(|e| ExtractError::body_decode(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::extract::{ElementSelector, extract};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_header_map_keeps_valid_pairs() {
        let map = build_header_map(&[
            ("Accept".to_string(), "text/html".to_string()),
            ("X-Token".to_string(), "abc".to_string()),
        ]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("accept").unwrap(), "text/html");
    }

    #[test]
    fn test_build_header_map_skips_unrepresentable_pairs() {
        let map = build_header_map(&[
            ("Bad Name".to_string(), "x".to_string()),
            ("Good".to_string(), "y".to_string()),
        ]);
        assert_eq!(map.len(), 1);
        assert!(map.get("good").is_some());
    }

    #[tokio::test]
    async fn test_get_sends_configured_request_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/check"))
            .and(header("X-Probe", "yes"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let client = HttpClient::new(&[("X-Probe".to_string(), "yes".to_string())]);
        let url = Url::parse(&format!("{}/check", server.uri())).unwrap();
        let response = client.get(&url).await.unwrap();
        assert_eq!(response.status_code(), 200);
    }

    #[tokio::test]
    async fn test_live_response_exposes_headers_and_cookies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cookies"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Set-Cookie", "session=abc123; Path=/")
                    .insert_header("X-Custom", "marker")
                    .set_body_string("<html></html>"),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new(&[]);
        let url = Url::parse(&format!("{}/cookies", server.uri())).unwrap();
        let response = client.get(&url).await.unwrap();

        let headers = response.headers_text();
        assert!(headers.contains("x-custom: marker\n"), "got: {headers}");

        let cookies = response.cookies_text();
        assert!(cookies.contains("session=abc123"), "got: {cookies}");
        assert!(cookies.contains("Path=/"), "got: {cookies}");
    }

    #[tokio::test]
    async fn test_live_response_body_flows_through_extract() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello body"))
            .mount(&server)
            .await;

        let client = HttpClient::new(&[]);
        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
        let response = client.get(&url).await.unwrap();

        let record = extract(ElementSelector::Text, response).await.unwrap();
        assert_eq!(record.text.as_deref(), Some("hello body"));
    }

    #[tokio::test]
    async fn test_get_connection_refused_is_a_network_error() {
        // Port 1 is essentially never listening.
        let client = HttpClient::new(&[]);
        let url = Url::parse("http://127.0.0.1:1/").unwrap();

        let result = client.get(&url).await;
        assert!(matches!(result, Err(FetchError::Network { .. })));
    }
}
