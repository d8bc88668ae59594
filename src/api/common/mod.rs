//
//  gerrit-cli
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Gerrit REST API
//!
//! This module provides the shared vocabulary used by every resource module:
//! the error taxonomy, the request payload and response target types consumed
//! by [`Requester::call`](crate::api::client::Requester::call), response
//! metadata, and a handful of wire types that appear in several resources.
//!
//! # Overview
//!
//! - [`GerritError`] - Unified error type for all API operations
//! - [`ConfigError`] - Errors raised while configuring a client, before any I/O
//! - [`Payload`] - What a request carries (query parameters or a body)
//! - [`Target`] - Where a response body goes once the status checks out
//! - [`ResponseInfo`] - Status, headers and final URL of a completed exchange
//! - [`Timestamp`] - Gerrit's `yyyy-mm-dd hh:mm:ss.fffffffff` UTC timestamps
//!
//! # Example
//!
//! ```rust
//! use gerrit_cli::api::common::GerritError;
//!
//! fn describe(result: Result<(), GerritError>) -> &'static str {
//!     match result {
//!         Ok(()) => "ok",
//!         Err(e) if e.is_not_found() => "missing",
//!         Err(GerritError::Config(_)) => "misconfigured",
//!         Err(_) => "failed",
//!     }
//! }
//! ```

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tokio::io::AsyncWrite;
use url::Url;

mod prefix;
mod query;

pub use prefix::{strip_magic_prefix, MAGIC_PREFIX};
pub use query::encode_query;

/// Result alias used across the API layer.
pub type Result<T, E = GerritError> = std::result::Result<T, E>;

/// Errors raised while configuring a client.
///
/// These are detected before any network traffic happens: a bad base URL
/// or an incomplete authentication setup never reaches the wire.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The server URL could not be parsed as an absolute URL.
    #[error("invalid Gerrit URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// One of scheme, username or secret was empty.
    #[error("authentication scheme, username and password must all be non-empty")]
    EmptyCredential,

    /// The scheme tag is not one of `basic`, `digest` or `cookie`.
    #[error("unsupported authentication scheme {0:?} (expected basic, digest or cookie)")]
    UnknownScheme(String),

    /// A credential cannot be carried in an HTTP header, for example because
    /// it contains a control character.
    #[error("{0} contains characters that are not allowed in an HTTP header")]
    InvalidCredential(&'static str),

    /// HTTP digest authentication was requested.
    ///
    /// Digest is recognised but not implemented, so it is refused instead of
    /// sending requests without credentials.
    #[error("digest authentication is not supported; use basic or cookie authentication")]
    DigestUnsupported,
}

/// Unified error type for all Gerrit API operations.
///
/// # Variants
///
/// | Variant | Raised when |
/// |---------|-------------|
/// | `Config` | the client is misconfigured |
/// | `InvalidEndpoint` | the endpoint path does not form a valid URL |
/// | `Encode` | the payload cannot be serialized |
/// | `Query` | the payload cannot be expressed as query parameters |
/// | `Transport` | DNS, TCP, TLS, timeout or body-streaming failures |
/// | `Status` | the server answered with a non-2xx status |
/// | `Decode` | a 2xx body is not the JSON the caller expected |
/// | `EmptyResponse` | a 2xx response had no body where one was required |
/// | `Io` | writing a streamed body to the caller's sink failed |
#[derive(Error, Debug)]
pub enum GerritError {
    /// Client configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The endpoint did not form a valid URL when joined to the base URL.
    #[error("invalid endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// The payload could not be serialized to JSON.
    #[error("failed to encode request payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// The payload could not be turned into query parameters.
    #[error("failed to encode query parameters: {0}")]
    Query(String),

    /// The underlying HTTP transport failed.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    ///
    /// `response` keeps the status, headers and URL so callers can still
    /// inspect the exchange.
    #[error("HTTP {status}: {message}")]
    Status {
        status: StatusCode,
        message: String,
        response: ResponseInfo,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// A JSON body was expected but the server sent none (e.g. `204`).
    #[error("HTTP {status}: expected a JSON body but the response was empty")]
    EmptyResponse { status: StatusCode },

    /// Copying the response body into the caller's sink failed.
    #[error("failed to write response body: {0}")]
    Io(#[from] std::io::Error),
}

impl GerritError {
    /// Returns the HTTP status for [`GerritError::Status`] errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GerritError::Status { status, .. } => Some(*status),
            GerritError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the response metadata captured alongside a status error.
    pub fn response(&self) -> Option<&ResponseInfo> {
        match self {
            GerritError::Status { response, .. } => Some(response),
            _ => None,
        }
    }

    /// `true` for HTTP 404 responses.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// `true` for HTTP 409 responses.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT)
    }

    /// `true` for HTTP 401 and 403 responses.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }
}

/// Metadata of a completed HTTP exchange.
///
/// The body has already been consumed by the decoder by the time callers
/// see this value.
#[derive(Debug, Clone)]
pub struct ResponseInfo {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Final URL after redirects.
    pub url: Url,
}

impl ResponseInfo {
    pub(crate) fn from_response(response: &reqwest::Response) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().clone(),
            url: response.url().clone(),
        }
    }

    /// `true` when the server answered `204 No Content`.
    pub fn is_no_content(&self) -> bool {
        self.status == StatusCode::NO_CONTENT
    }

    /// The response `Content-Type`, if present and valid UTF-8.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

/// What an outgoing request carries.
///
/// For `GET` and `HEAD` requests a [`Payload::Json`] value is encoded as
/// query parameters; for every other method it becomes the request body.
/// [`Payload::Text`] is always sent verbatim as a `text/plain` body.
#[derive(Debug, Default)]
pub enum Payload<'a> {
    /// No query parameters and no body.
    #[default]
    Empty,
    /// Raw text, sent as-is with a plain-text content type.
    Text(Cow<'a, str>),
    /// A structured value, kept as the outcome of serializing it.
    Json(serde_json::Result<serde_json::Value>),
}

impl<'a> Payload<'a> {
    /// Serializes `value` into a structured payload.
    ///
    /// Serialization failures are kept and reported by the request builder,
    /// so no request is ever produced from a broken payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        Payload::Json(serde_json::to_value(value))
    }

    /// Like [`Payload::json`], but `None` means "no payload".
    pub fn optional<T: Serialize>(value: Option<&T>) -> Self {
        value.map_or(Payload::Empty, Payload::json)
    }

    /// A raw text payload.
    pub fn text(value: impl Into<Cow<'a, str>>) -> Self {
        Payload::Text(value.into())
    }

    /// `true` when nothing would be sent.
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Empty => true,
            Payload::Json(Ok(serde_json::Value::Null)) => true,
            _ => false,
        }
    }
}

/// A destination that JSON response bodies can be decoded into.
///
/// Implemented for every [`DeserializeOwned`] type, which lets
/// [`Target::Json`] hold any caller value behind a trait object.
pub trait JsonSlot {
    /// Replaces `self` with the value decoded from `bytes`.
    fn fill_from_json(&mut self, bytes: &[u8]) -> serde_json::Result<()>;
}

impl<T: DeserializeOwned> JsonSlot for T {
    fn fill_from_json(&mut self, bytes: &[u8]) -> serde_json::Result<()> {
        *self = serde_json::from_slice(bytes)?;
        Ok(())
    }
}

/// Where a successful response body goes.
///
/// The decoder picks its behavior from the variant once per call.
pub enum Target<'a> {
    /// The body is ignored.
    Discard,
    /// The body is a scalar string; quotes and newlines are trimmed.
    Text(&'a mut String),
    /// The body is copied verbatim into an async writer.
    Sink(&'a mut (dyn AsyncWrite + Unpin + Send)),
    /// The body is JSON, decoded after the magic prefix is removed.
    Json(&'a mut (dyn JsonSlot + Send)),
}

impl fmt::Debug for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Target::Discard => "Discard",
            Target::Text(_) => "Text",
            Target::Sink(_) => "Sink",
            Target::Json(_) => "Json",
        };
        f.write_str(name)
    }
}

/// Gerrit timestamp: UTC, formatted as `yyyy-mm-dd hh:mm:ss.fffffffff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub DateTime<Utc>);

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

impl Timestamp {
    /// Parses a timestamp in Gerrit's wire format.
    pub fn parse(value: &str) -> std::result::Result<Self, chrono::ParseError> {
        let naive = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)?;
        Ok(Timestamp(naive.and_utc()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S%.9f"))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Link to an external site, attached to projects, branches and commits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebLinkInfo {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Author or committer of a commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitPersonInfo {
    pub name: String,
    pub email: String,
    pub date: Timestamp,
    /// Offset from UTC in minutes.
    #[serde(default)]
    pub tz: i32,
}

/// A Git commit as reported by the review server.
///
/// Parent entries only carry `commit` and `subject`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    #[serde(default)]
    pub parents: Vec<CommitInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<GitPersonInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer: Option<GitPersonInfo>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_links: Vec<WebLinkInfo>,
}

/// Escapes a single path segment (project name, branch ref, file path).
///
/// Slashes are encoded, so `refs/heads/main` stays one segment. Spaces
/// become `%20`; a literal `+` is already encoded as `%2B`.
pub fn escape(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Maps the empty string a `204 No Content` scalar endpoint yields to `None`.
pub fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_parses_gerrit_format() {
        let ts = Timestamp::parse("2013-02-01 09:59:32.126000000").unwrap();
        assert_eq!(ts.0.timestamp(), 1_359_712_772);
        assert_eq!(ts.to_string(), "2013-02-01 09:59:32.126000000");
    }

    #[test]
    fn test_timestamp_serde() {
        let ts: Timestamp = serde_json::from_str("\"2024-05-06 07:08:09.000000000\"").unwrap();
        assert_eq!(
            serde_json::to_string(&ts).unwrap(),
            "\"2024-05-06 07:08:09.000000000\""
        );
        assert!(serde_json::from_str::<Timestamp>("\"yesterday\"").is_err());
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("refs/heads/main"), "refs%2Fheads%2Fmain");
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("with space"), "with%20space");
        assert_eq!(escape("c++"), "c%2B%2B");
    }

    #[test]
    fn test_payload_serialization_errors_are_kept() {
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1u8], "non-string key");
        let payload = Payload::json(&map);
        assert!(matches!(payload, Payload::Json(Err(_))));
    }

    #[test]
    fn test_payload_optional() {
        assert!(Payload::optional::<u32>(None).is_empty());
        assert!(!Payload::optional(Some(&5u32)).is_empty());
    }

    #[test]
    fn test_json_slot_replaces_value() {
        let mut values: Vec<u32> = vec![9];
        values.fill_from_json(b"[1,2,3]").unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(String::new()), None);
        assert_eq!(non_empty("x".into()), Some("x".into()));
    }
}
