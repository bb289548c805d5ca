//! HTTP transport for the JIRA client.
//!
//! [`JiraClient`](super::JiraClient) talks to JIRA through the [`Transport`]
//! trait so tests and embedders can swap in their own implementation. The
//! default, [`ReqwestTransport`], injects authentication and honors the
//! caller's cancellation token.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::auth::Auth;
use super::error::{ApiError, Result};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A request to issue against the JIRA base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP verb.
    pub method: Method,
    /// Path relative to the base URL, already percent-encoded.
    pub path: String,
    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,
    /// Optional JSON body.
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append several query parameters.
    pub fn query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Serialization`] if `body` cannot be represented as JSON.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Look up the first value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// The status and body of a response, before any decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header, if the server sent one.
    pub content_type: Option<String>,
    /// The response body, possibly empty.
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type: None,
            body,
        }
    }

    /// A response carrying a JSON document.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_string()),
            body: body.to_string().into_bytes(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Whether the body is empty or only whitespace.
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }
}

/// Sends requests to a JIRA instance.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send `request` and return the raw response.
    ///
    /// Implementations must stop waiting and return [`ApiError::Cancelled`]
    /// once `cancel` fires. Any status code is a successful transport
    /// outcome; only failures before a response exist are errors.
    async fn send(&self, request: HttpRequest, cancel: &CancellationToken) -> Result<RawResponse>;
}

/// [`Transport`] backed by a `reqwest` client.
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .finish()
    }
}

impl ReqwestTransport {
    /// Create a transport for `base_url` with the default timeout.
    pub fn new(base_url: &str, auth: Auth) -> Result<Self> {
        Self::with_timeout(base_url, auth, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a transport with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not http(s) or the HTTP client cannot
    /// be built.
    pub fn with_timeout(base_url: &str, auth: Auth, timeout: Duration) -> Result<Self> {
        if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            auth,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request, cancel), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: HttpRequest, cancel: &CancellationToken) -> Result<RawResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), self.url(&request.path))
            .header(header::AUTHORIZATION, self.auth.header_value())
            .header(header::ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ApiError::Cancelled),
            response = builder.send() => response?,
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ApiError::Cancelled),
            body = response.bytes() => body?,
        };

        debug!(status, bytes = body.len(), "Received response");

        Ok(RawResponse {
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}

/// Normalize the base URL by removing trailing slashes.
///
/// Warns if the URL is not HTTPS (localhost excepted).
fn normalize_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');

    if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}. This is insecure for production use.", url);
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_base_url_removes_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://company.atlassian.net/"),
            "https://company.atlassian.net"
        );
        assert_eq!(
            normalize_base_url("https://company.atlassian.net///"),
            "https://company.atlassian.net"
        );
    }

    #[test]
    fn test_normalize_base_url_preserves_path() {
        assert_eq!(
            normalize_base_url("https://company.atlassian.net/jira/"),
            "https://company.atlassian.net/jira"
        );
    }

    #[test]
    fn test_url_joins_path() {
        let transport =
            ReqwestTransport::new("https://jira.example.com/", Auth::new("a@b.c", "t")).unwrap();
        assert_eq!(
            transport.url("/rest/api/3/myself"),
            "https://jira.example.com/rest/api/3/myself"
        );
    }

    #[test]
    fn test_rejects_non_http_url() {
        let result = ReqwestTransport::new("ftp://jira.example.com", Auth::new("a@b.c", "t"));
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_debug_hides_token() {
        let transport =
            ReqwestTransport::new("https://jira.example.com", Auth::new("a@b.c", "hunter2")).unwrap();
        let debug_output = format!("{:?}", transport);
        assert!(debug_output.contains("jira.example.com"));
        assert!(!debug_output.contains("hunter2"));
    }

    #[test]
    fn test_request_builders() {
        let request = HttpRequest::get("/rest/api/3/search")
            .query("jql", "project = PROJ")
            .query_pairs([("startAt", 0u32), ("maxResults", 50)]);
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.query_value("jql"), Some("project = PROJ"));
        assert_eq!(request.query_value("maxResults"), Some("50"));
        assert_eq!(request.query_value("missing"), None);

        let request = HttpRequest::post("/rest/api/3/issue")
            .json(&json!({"fields": {}}))
            .unwrap();
        assert_eq!(request.body, Some(json!({"fields": {}})));
    }

    #[test]
    fn test_raw_response_is_empty() {
        assert!(RawResponse::new(204, Vec::new()).is_empty());
        assert!(RawResponse::new(200, b" \n".to_vec()).is_empty());
        assert!(!RawResponse::json(200, &json!({})).is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_before_send() {
        let transport =
            ReqwestTransport::new("http://localhost:9", Auth::new("a@b.c", "t")).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = transport.send(HttpRequest::get("/rest/api/3/myself"), &cancel).await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
    }
}
