//
//  gerrit-cli
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client for the Gerrit REST API
//!
//! This module holds the request pipeline every API operation goes through.
//!
//! ## Features
//!
//! - Base URL validation and normalization ([`resolve_base_url`])
//! - Routing through Gerrit's authenticated `/a/` namespace when credentials are set
//! - Query-string encoding for `GET`, JSON or plain-text bodies otherwise
//! - Magic-prefix removal and JSON decoding of responses
//! - Structured errors that keep the response status and headers
//! - An injected [`TransportConfig`] instead of a process-wide HTTP client
//!
//! ## Example
//!
//! ```rust,no_run
//! use gerrit_cli::api::{GerritClient, Payload, Target};
//! use reqwest::Method;
//!
//! # async fn run() -> gerrit_cli::api::Result<()> {
//! let client = GerritClient::new("https://review.example.com")?;
//! client.set_basic_auth("admin", "secret")?;
//!
//! let mut version = String::new();
//! client
//!     .requester()
//!     .call(Method::GET, "config/server/version", Payload::Empty, Target::Text(&mut version))
//!     .await?;
//! println!("Gerrit {version}");
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};
use url::Url;

use super::common::{
    encode_query, strip_magic_prefix, ConfigError, GerritError, Payload, ResponseInfo, Result,
    Target,
};
use crate::auth::{AuthScheme, Credentials};

const JSON_CONTENT_TYPE: &str = "application/json";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

/// Connection settings for the underlying HTTP client.
///
/// Each [`GerritClient`] (and [`GitilesClient`](crate::api::gitiles::GitilesClient))
/// owns the client built from one of these; there is no shared global transport.
///
/// # Defaults
///
/// | Setting | Value |
/// |---------|-------|
/// | `timeout` | 30s for the whole exchange |
/// | `connect_timeout` | 15s, including the TLS handshake |
/// | `pool_max_idle_per_host` | 10 connections |
/// | `pool_idle_timeout` | 90s |
/// | `user_agent` | `gerritctl/<version>` |
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Upper bound for a complete request/response exchange.
    pub timeout: Duration,
    /// Upper bound for establishing a connection.
    pub connect_timeout: Duration,
    /// Idle connections kept per host.
    pub pool_max_idle_per_host: usize,
    /// How long an idle connection is kept.
    pub pool_idle_timeout: Duration,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(15),
            pool_max_idle_per_host: 10,
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: format!("{}/{}", crate::APP_NAME, crate::VERSION),
        }
    }
}

impl TransportConfig {
    /// Builds a `reqwest` client with these settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn build_client(&self) -> Result<Client> {
        Ok(Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .pool_idle_timeout(self.pool_idle_timeout)
            .build()?)
    }
}

/// Validates a server URL and normalizes it to end with `/`.
///
/// # Parameters
///
/// * `raw` - The server URL, e.g. `https://review.example.com` or
///   `https://example.com/r` for a Gerrit served under a path prefix
///
/// # Returns
///
/// The parsed URL with any query or fragment removed and exactly one
/// trailing `/`. Resolving an already normalized URL returns it unchanged.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBaseUrl`] if `raw` is not an absolute
/// `http` or `https` URL with a host.
///
/// # Example
///
/// ```rust
/// use gerrit_cli::api::client::resolve_base_url;
///
/// let url = resolve_base_url("https://review.example.com/r").unwrap();
/// assert_eq!(url.as_str(), "https://review.example.com/r/");
/// assert!(resolve_base_url("review.example.com").is_err());
/// ```
pub fn resolve_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("not an absolute URL with a host".to_string()));
    }
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }

    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Extracts a human readable message from an error response body.
///
/// Gerrit usually answers errors with plain text, but proxies and plugins
/// may send JSON. The magic prefix is removed first; the status reason is
/// used when the body is empty.
pub fn format_api_error(status: StatusCode, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(strip_magic_prefix(body));
    let text = text.trim();

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(text) {
        // {"message": "..."}
        if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }

        // {"errors": [{"message": "..."}]}
        if let Some(message) = json
            .get("errors")
            .and_then(|e| e.as_array())
            .and_then(|arr| arr.first())
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }

        if let Some(message) = json.as_str() {
            return message.to_string();
        }
    }

    if text.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        text.to_string()
    }
}

fn encodes_as_query(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

/// Builds, sends and decodes requests against one server.
///
/// The base URL and HTTP client are fixed at construction. Credentials can
/// be replaced at any time with [`Requester::set_credentials`]; every request
/// takes one consistent snapshot of them, so a concurrent swap never mixes
/// the old scheme with the new secret.
#[derive(Debug)]
pub struct Requester {
    http: Client,
    base_url: Url,
    credentials: RwLock<Option<Credentials>>,
}

impl Requester {
    /// Creates a requester for `base_url` using `http` for transport.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL is rejected by
    /// [`resolve_base_url`].
    pub fn new(base_url: &str, http: Client) -> Result<Self, ConfigError> {
        Ok(Self {
            http,
            base_url: resolve_base_url(base_url)?,
            credentials: RwLock::new(None),
        })
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Replaces (or with `None`, clears) the credentials.
    pub fn set_credentials(&self, credentials: Option<Credentials>) {
        let mut guard = self
            .credentials
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = credentials;
    }

    /// A copy of the current credentials.
    pub fn credentials(&self) -> Option<Credentials> {
        self.credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `true` when requests are sent with credentials.
    pub fn is_authenticated(&self) -> bool {
        self.credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn endpoint_url(&self, endpoint: &str, authenticated: bool) -> Result<Url> {
        let endpoint = endpoint.trim_start_matches('/');
        let mut base = self.base_url.clone();
        if authenticated {
            base.set_path(&format!("/a{}", self.base_url.path()));
        }

        Url::parse(&format!("{base}{endpoint}")).map_err(|source| GerritError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// Builds a request without sending it.
    ///
    /// # Parameters
    ///
    /// * `method` - HTTP method
    /// * `endpoint` - Path relative to the base URL; a leading `/` is ignored.
    ///   Identifier segments must already be escaped.
    /// * `payload` - Query options for `GET`/`HEAD`, the body otherwise
    ///
    /// # Returns
    ///
    /// A request with:
    /// - the `a/` segment after the base path when credentials are configured
    /// - the payload encoded as query parameters or as a JSON / text body
    /// - the credentials applied
    /// - `Accept: application/json`
    ///
    /// # Errors
    ///
    /// - [`GerritError::Encode`] if the payload failed to serialize
    /// - [`GerritError::Query`] if the payload cannot become query parameters
    /// - [`GerritError::InvalidEndpoint`] if the path does not form a URL
    ///
    /// # Notes
    ///
    /// A body is attached for any method other than `GET` and `HEAD`,
    /// `DELETE` included, whenever the payload is not empty. Endpoints declare
    /// whether they carry a body simply by passing one.
    pub fn new_request(
        &self,
        method: Method,
        endpoint: &str,
        payload: Payload<'_>,
    ) -> Result<reqwest::Request> {
        let credentials = self.credentials();
        let mut url = self.endpoint_url(endpoint, credentials.is_some())?;

        let mut body: Option<(Vec<u8>, &'static str)> = None;
        match payload {
            Payload::Empty => {}
            Payload::Json(value) => {
                let value = value.map_err(GerritError::Encode)?;
                if encodes_as_query(&method) {
                    encode_query(&mut url, &value)?;
                } else if !value.is_null() {
                    let bytes = serde_json::to_vec(&value).map_err(GerritError::Encode)?;
                    body = Some((bytes, JSON_CONTENT_TYPE));
                }
            }
            Payload::Text(text) => {
                if encodes_as_query(&method) {
                    return Err(GerritError::Query(format!(
                        "a text payload cannot be sent with {method}"
                    )));
                }
                body = Some((text.into_owned().into_bytes(), TEXT_CONTENT_TYPE));
            }
        }

        let mut builder = self
            .http
            .request(method, url)
            .header(ACCEPT, JSON_CONTENT_TYPE);
        if let Some((bytes, content_type)) = body {
            builder = builder.header(CONTENT_TYPE, content_type).body(bytes);
        }
        if let Some(credentials) = &credentials {
            builder = credentials.apply_to_request(builder);
        }

        let request = builder.build()?;
        debug!(method = %request.method(), url = %request.url(), "built request");
        Ok(request)
    }

    /// Sends a request and decodes the response into `target`.
    ///
    /// # Behavior
    ///
    /// 1. A non-2xx status becomes [`GerritError::Status`] carrying the
    ///    server's message and the [`ResponseInfo`]
    /// 2. [`Target::Discard`] ignores the body
    /// 3. [`Target::Sink`] receives the body verbatim, chunk by chunk
    /// 4. [`Target::Text`] receives the body without magic prefix, with
    ///    surrounding `"` and newlines trimmed; a `204` yields `""`
    /// 5. [`Target::Json`] is decoded from the body without magic prefix;
    ///    a `204` leaves it untouched
    ///
    /// A text target switches the `Accept` header to `text/plain` first.
    ///
    /// # Errors
    ///
    /// Transport errors, status errors, [`GerritError::Decode`] for bad JSON
    /// and [`GerritError::Io`] when the sink cannot be written.
    pub async fn execute(
        &self,
        mut request: reqwest::Request,
        target: Target<'_>,
    ) -> Result<ResponseInfo> {
        if matches!(target, Target::Text(_)) {
            request
                .headers_mut()
                .insert(ACCEPT, HeaderValue::from_static("text/plain"));
        }

        let mut response = self.http.execute(request).await?;
        let info = ResponseInfo::from_response(&response);
        debug!(status = %info.status, url = %info.url, "received response");

        if !info.status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = format_api_error(info.status, &body);
            return Err(GerritError::Status {
                status: info.status,
                message,
                response: info,
            });
        }

        match target {
            Target::Discard => {}
            Target::Sink(sink) => {
                while let Some(chunk) = response.chunk().await? {
                    sink.write_all(&chunk).await?;
                }
                sink.flush().await?;
            }
            Target::Text(out) => {
                let body = response.bytes().await?;
                let text = String::from_utf8_lossy(strip_magic_prefix(&body));
                *out = text.trim_matches(|c| c == '"' || c == '\n').to_string();
            }
            Target::Json(slot) => {
                if info.is_no_content() {
                    return Ok(info);
                }
                let body = response.bytes().await?;
                slot.fill_from_json(strip_magic_prefix(&body))
                    .map_err(GerritError::Decode)?;
            }
        }

        Ok(info)
    }

    /// Builds and sends one request. This is the single entry point used by
    /// every resource method.
    ///
    /// There are no retries; dropping the returned future cancels the
    /// exchange.
    pub async fn call(
        &self,
        method: Method,
        endpoint: &str,
        payload: Payload<'_>,
        target: Target<'_>,
    ) -> Result<ResponseInfo> {
        let request = self.new_request(method, endpoint, payload)?;
        self.execute(request, target).await
    }

    /// Calls an endpoint that answers with JSON.
    ///
    /// # Errors
    ///
    /// Besides the [`call`](Self::call) errors, returns
    /// [`GerritError::EmptyResponse`] when the server sent no body.
    pub async fn call_json<T>(&self, method: Method, endpoint: &str, payload: Payload<'_>) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        let mut slot: Option<T> = None;
        let info = self
            .call(method, endpoint, payload, Target::Json(&mut slot))
            .await?;
        slot.ok_or(GerritError::EmptyResponse {
            status: info.status,
        })
    }

    /// Calls an endpoint whose JSON body may be missing (`204`).
    pub async fn call_json_opt<T>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Payload<'_>,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        let mut slot: Option<T> = None;
        self.call(method, endpoint, payload, Target::Json(&mut slot))
            .await?;
        Ok(slot)
    }

    /// Calls an endpoint that answers with a scalar string.
    pub async fn call_text(&self, method: Method, endpoint: &str, payload: Payload<'_>) -> Result<String> {
        let mut text = String::new();
        self.call(method, endpoint, payload, Target::Text(&mut text))
            .await?;
        Ok(text)
    }

    /// Calls an endpoint whose body is irrelevant.
    pub async fn call_empty(
        &self,
        method: Method,
        endpoint: &str,
        payload: Payload<'_>,
    ) -> Result<ResponseInfo> {
        self.call(method, endpoint, payload, Target::Discard).await
    }

    /// Calls an endpoint and streams its body into `sink`.
    pub async fn call_stream<W>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Payload<'_>,
        sink: &mut W,
    ) -> Result<ResponseInfo>
    where
        W: AsyncWrite + Unpin + Send,
    {
        self.call(method, endpoint, payload, Target::Sink(sink))
            .await
    }
}

/// Client for a Gerrit server.
///
/// Cloning is cheap: clones share the same [`Requester`], so credentials set
/// through one clone apply to all of them. Resource handles returned by the
/// service accessors ([`accounts`](Self::accounts), [`changes`](Self::changes),
/// [`projects`](Self::projects), [`groups`](Self::groups),
/// [`access`](Self::access), [`server`](Self::server)) keep such a clone.
#[derive(Debug, Clone)]
pub struct GerritClient {
    requester: Arc<Requester>,
}

impl GerritClient {
    /// Creates a client with the default [`TransportConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`GerritError::Config`] for an invalid URL and
    /// [`GerritError::Transport`] if the HTTP client cannot be built.
    pub fn new(url: &str) -> Result<Self> {
        Self::with_transport(url, &TransportConfig::default())
    }

    /// Creates a client with custom transport settings.
    pub fn with_transport(url: &str, transport: &TransportConfig) -> Result<Self> {
        Self::with_http_client(url, transport.build_client()?)
    }

    /// Creates a client around an existing `reqwest` client.
    pub fn with_http_client(url: &str, http: Client) -> Result<Self> {
        Ok(Self {
            requester: Arc::new(Requester::new(url, http)?),
        })
    }

    /// Sets credentials while building the client.
    pub fn with_auth(self, credentials: Credentials) -> Self {
        self.requester.set_credentials(Some(credentials));
        self
    }

    /// Replaces the authentication scheme and credentials.
    ///
    /// # Parameters
    ///
    /// * `scheme` - `basic`, `digest` or `cookie`
    /// * `username` - Username, or cookie name
    /// * `password` - HTTP password, or cookie value
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from [`Credentials::from_parts`]. On error the
    /// previous credentials stay in place.
    pub fn set_auth(&self, scheme: &str, username: &str, password: &str) -> Result<(), ConfigError> {
        let credentials = Credentials::from_parts(scheme, username, password)?;
        self.requester.set_credentials(Some(credentials));
        Ok(())
    }

    /// Uses HTTP basic authentication.
    pub fn set_basic_auth(&self, username: &str, password: &str) -> Result<(), ConfigError> {
        self.set_auth(AuthScheme::Basic.as_str(), username, password)
    }

    /// Requests HTTP digest authentication.
    ///
    /// Always fails with [`ConfigError::DigestUnsupported`] (or
    /// [`ConfigError::EmptyCredential`] for empty values).
    pub fn set_digest_auth(&self, username: &str, password: &str) -> Result<(), ConfigError> {
        warn!("digest authentication requested but not supported");
        self.set_auth(AuthScheme::Digest.as_str(), username, password)
    }

    /// Authenticates with a session cookie `username=password`.
    pub fn set_cookie_auth(&self, name: &str, value: &str) -> Result<(), ConfigError> {
        self.set_auth(AuthScheme::Cookie.as_str(), name, value)
    }

    /// Drops credentials; later requests are anonymous.
    pub fn clear_auth(&self) {
        self.requester.set_credentials(None);
    }

    /// The request pipeline, for endpoints without a typed wrapper.
    pub fn requester(&self) -> &Requester {
        &self.requester
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        self.requester.base_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::changes::ChangeInput;
    use crate::api::projects::ProjectOptions;
    use mockito::Matcher;
    use serde::{Deserialize, Serialize};

    fn requester(url: &str) -> Requester {
        Requester::new(url, Client::new()).unwrap()
    }

    fn body_of(request: &reqwest::Request) -> Option<&[u8]> {
        request.body().and_then(|b| b.as_bytes())
    }

    #[test]
    fn test_resolve_base_url_appends_separator() {
        let url = resolve_base_url("https://review.example.com").unwrap();
        assert_eq!(url.as_str(), "https://review.example.com/");

        let url = resolve_base_url("https://example.com/r").unwrap();
        assert_eq!(url.as_str(), "https://example.com/r/");

        let again = resolve_base_url(url.as_str()).unwrap();
        assert_eq!(again, url);
        assert!(!again.as_str().ends_with("//"));
    }

    #[test]
    fn test_resolve_base_url_rejects_malformed_input() {
        for raw in ["", "review.example.com", "/relative/path", "mailto:admin@example.com", "ftp://example.com"] {
            assert!(
                matches!(resolve_base_url(raw), Err(ConfigError::InvalidBaseUrl { .. })),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_unauthenticated_url_has_no_prefix() {
        let r = requester("https://review.example.com/r");
        let request = r.new_request(Method::GET, "/changes/", Payload::Empty).unwrap();
        assert_eq!(request.url().as_str(), "https://review.example.com/r/changes/");
        assert_eq!(request.headers()[ACCEPT], "application/json");
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_authenticated_url_has_prefix_once_after_host() {
        let r = requester("https://review.example.com:8443/r");
        r.set_credentials(Some(Credentials::basic("admin", "secret").unwrap()));

        let request = r.new_request(Method::GET, "changes/", Payload::Empty).unwrap();
        assert_eq!(request.url().as_str(), "https://review.example.com:8443/a/r/changes/");
        assert_eq!(request.url().path().matches("/a/").count(), 1);
        assert_eq!(
            request.headers()[reqwest::header::AUTHORIZATION],
            "Basic YWRtaW46c2VjcmV0"
        );
    }

    #[test]
    fn test_get_encodes_options_as_query() {
        let r = requester("http://localhost");
        let options = ProjectOptions {
            limit: Some(25),
            ..Default::default()
        };
        let request = r
            .new_request(Method::GET, "projects/", Payload::json(&options))
            .unwrap();
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().query(), Some("n=25"));
        assert!(request.body().is_none());
    }

    #[test]
    fn test_post_struct_is_json_body() {
        let r = requester("http://localhost");
        let input = ChangeInput {
            project: "demo".into(),
            branch: "main".into(),
            subject: "test".into(),
            ..Default::default()
        };
        let request = r
            .new_request(Method::POST, "changes/", Payload::json(&input))
            .unwrap();
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(
            body_of(&request).unwrap(),
            br#"{"project":"demo","branch":"main","subject":"test"}"#
        );
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn test_put_text_is_sent_verbatim() {
        let r = requester("http://localhost");
        let request = r
            .new_request(Method::PUT, "changes/1/message", Payload::text("Fix the \"build\"\n"))
            .unwrap();
        assert_eq!(body_of(&request).unwrap(), b"Fix the \"build\"\n");
        assert!(request.headers()[CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
    }

    #[test]
    fn test_delete_without_payload_has_no_body() {
        let r = requester("http://localhost");
        let request = r
            .new_request(Method::DELETE, "changes/1/topic", Payload::Empty)
            .unwrap();
        assert!(request.body().is_none());
        assert!(request.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_broken_payload_produces_no_request() {
        let r = requester("http://localhost");
        let mut bad = std::collections::HashMap::new();
        bad.insert((1, 2), "tuple keys are not JSON object keys");
        let result = r.new_request(Method::POST, "changes/", Payload::json(&bad));
        assert!(matches!(result, Err(GerritError::Encode(_))));
    }

    #[test]
    fn test_text_payload_cannot_be_a_query() {
        let r = requester("http://localhost");
        let result = r.new_request(Method::GET, "changes/", Payload::text("q"));
        assert!(matches!(result, Err(GerritError::Query(_))));
    }

    #[test]
    fn test_format_api_error() {
        assert_eq!(
            format_api_error(StatusCode::NOT_FOUND, b"Not found: demo\n"),
            "Not found: demo"
        );
        assert_eq!(
            format_api_error(StatusCode::BAD_REQUEST, b")]}'\n{\"message\":\"bad input\"}"),
            "bad input"
        );
        assert_eq!(format_api_error(StatusCode::CONFLICT, b""), "Conflict");
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Echo {
        name: String,
        #[serde(default)]
        count: u32,
    }

    #[tokio::test]
    async fn test_json_with_and_without_magic_prefix() {
        let mut server = mockito::Server::new_async().await;
        let _prefixed = server
            .mock("GET", "/prefixed")
            .match_header("accept", "application/json")
            .with_body(")]}'\n{\"name\":\"demo\",\"count\":3}")
            .create_async()
            .await;
        let _plain = server
            .mock("GET", "/plain")
            .with_body("{\"name\":\"demo\",\"count\":3}")
            .create_async()
            .await;

        let r = requester(&server.url());
        let a: Echo = r.call_json(Method::GET, "prefixed", Payload::Empty).await.unwrap();
        let b: Echo = r.call_json(Method::GET, "/plain", Payload::Empty).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.count, 3);
    }

    #[tokio::test]
    async fn test_json_body_round_trips_through_server_echo() {
        let mut server = mockito::Server::new_async().await;
        let sent = Echo {
            name: "demo".into(),
            count: 7,
        };
        let _m = server
            .mock("POST", "/echo")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({"name": "demo", "count": 7})))
            .with_body(")]}'\n{\"name\":\"demo\",\"count\":7}")
            .create_async()
            .await;

        let r = requester(&server.url());
        let received: Echo = r
            .call_json(Method::POST, "echo", Payload::json(&sent))
            .await
            .unwrap();
        assert_eq!(received, sent);
    }

    #[tokio::test]
    async fn test_not_found_keeps_response() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/projects/missing")
            .with_status(404)
            .with_header("x-gerrit-trace", "abc")
            .with_body("Not found: missing")
            .create_async()
            .await;

        let r = requester(&server.url());
        let err = r
            .call(Method::GET, "projects/missing", Payload::Empty, Target::Discard)
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        let response = err.response().unwrap();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.headers["x-gerrit-trace"], "abc");
        match err {
            GerritError::Status { message, .. } => assert_eq!(message, "Not found: missing"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_content_with_text_target() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/accounts/self/name")
            .match_header("accept", "text/plain")
            .with_status(204)
            .create_async()
            .await;

        let r = requester(&server.url());
        let mut name = String::from("stale");
        let info = r
            .call(Method::GET, "accounts/self/name", Payload::Empty, Target::Text(&mut name))
            .await
            .unwrap();
        assert!(info.is_no_content());
        assert_eq!(name, "");
    }

    #[tokio::test]
    async fn test_no_content_with_json_target() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("DELETE", "/changes/1/topic")
            .with_status(204)
            .create_async()
            .await;

        let r = requester(&server.url());
        let result: Option<Echo> = r
            .call_json_opt(Method::DELETE, "changes/1/topic", Payload::Empty)
            .await
            .unwrap();
        assert!(result.is_none());

        let err = r
            .call_json::<Echo>(Method::DELETE, "changes/1/topic", Payload::Empty)
            .await
            .unwrap_err();
        assert!(matches!(err, GerritError::EmptyResponse { .. }));
    }

    #[tokio::test]
    async fn test_text_target_trims_quotes_and_prefix() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/config/server/version")
            .with_body(")]}'\n\"3.9.1\"\n")
            .create_async()
            .await;

        let r = requester(&server.url());
        let version = r
            .call_text(Method::GET, "config/server/version", Payload::Empty)
            .await
            .unwrap();
        assert_eq!(version, "3.9.1");
    }

    #[tokio::test]
    async fn test_sink_receives_body_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let patch = b")]}'\nbinary\x00\x01patch";
        let _m = server
            .mock("GET", "/changes/1/revisions/current/patch")
            .with_body(patch.as_slice())
            .create_async()
            .await;

        let r = requester(&server.url());
        let mut sink: Vec<u8> = Vec::new();
        r.call_stream(
            Method::GET,
            "changes/1/revisions/current/patch",
            Payload::Empty,
            &mut sink,
        )
        .await
        .unwrap();
        assert_eq!(sink, patch);
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/broken")
            .with_body(")]}'\n{not json")
            .create_async()
            .await;

        let r = requester(&server.url());
        let err = r
            .call_json::<Echo>(Method::GET, "broken", Payload::Empty)
            .await
            .unwrap_err();
        assert!(matches!(err, GerritError::Decode(_)));
        assert!(err.status().is_none());
    }

    #[tokio::test]
    async fn test_cookie_auth_routes_through_authenticated_namespace() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/a/accounts/self")
            .match_header("cookie", "GerritAccount=token")
            .with_body(")]}'\n{\"name\":\"admin\"}")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        client.set_cookie_auth("GerritAccount", "token").unwrap();
        let me: Echo = client
            .requester()
            .call_json(Method::GET, "accounts/self", Payload::Empty)
            .await
            .unwrap();
        assert_eq!(me.name, "admin");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_switching_auth_under_load_never_mixes_schemes() {
        let mut server = mockito::Server::new_async().await;
        let _basic = server
            .mock("GET", "/a/accounts/self")
            .match_header("authorization", "Basic YWRtaW46c2VjcmV0")
            .match_header("cookie", Matcher::Missing)
            .with_body(")]}'\n{\"name\":\"basic\"}")
            .create_async()
            .await;
        let _cookie = server
            .mock("GET", "/a/accounts/self")
            .match_header("cookie", "GerritAccount=token")
            .match_header("authorization", Matcher::Missing)
            .with_body(")]}'\n{\"name\":\"cookie\"}")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        client.set_basic_auth("admin", "secret").unwrap();

        let switcher = {
            let client = client.clone();
            tokio::spawn(async move {
                for i in 0..200 {
                    if i % 2 == 0 {
                        client.set_cookie_auth("GerritAccount", "token").unwrap();
                    } else {
                        client.set_basic_auth("admin", "secret").unwrap();
                    }
                    tokio::task::yield_now().await;
                }
            })
        };

        let callers: Vec<_> = (0..8)
            .map(|_| {
                let client = client.clone();
                tokio::spawn(async move {
                    let mut seen = Vec::new();
                    for _ in 0..10 {
                        let me: Echo = client
                            .requester()
                            .call_json(Method::GET, "accounts/self", Payload::Empty)
                            .await
                            .unwrap();
                        seen.push(me.name);
                    }
                    seen
                })
            })
            .collect();

        switcher.await.unwrap();
        for caller in callers {
            for name in caller.await.unwrap() {
                assert!(name == "basic" || name == "cookie", "unexpected answer {name}");
            }
        }
    }

    #[test]
    fn test_cookie_credentials_with_newline_are_rejected() {
        let client = GerritClient::new("http://localhost").unwrap();
        assert_eq!(
            client.set_cookie_auth("GerritAccount", "abc\ndef"),
            Err(ConfigError::InvalidCredential("cookie"))
        );
        assert!(!client.requester().is_authenticated());
    }

    #[test]
    fn test_failed_set_auth_keeps_previous_credentials() {
        let client = GerritClient::new("http://localhost").unwrap();
        client.set_basic_auth("admin", "secret").unwrap();

        assert_eq!(
            client.set_auth("kerberos", "admin", "secret"),
            Err(ConfigError::UnknownScheme("kerberos".into()))
        );
        assert_eq!(
            client.set_digest_auth("admin", "secret"),
            Err(ConfigError::DigestUnsupported)
        );
        assert_eq!(client.set_basic_auth("", "secret"), Err(ConfigError::EmptyCredential));

        let credentials = client.requester().credentials().unwrap();
        assert_eq!(credentials.scheme(), AuthScheme::Basic);
        assert_eq!(credentials.username(), "admin");

        client.clear_auth();
        assert!(!client.requester().is_authenticated());
    }
}
