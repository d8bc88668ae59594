//
//  gerrit-cli
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! This module defines how credentials are attached to requests sent to a
//! Gerrit server.
//!
//! ## Supported Authentication Methods
//!
//! - **Basic**: an `Authorization: Basic` header built from the username and
//!   HTTP password generated in the Gerrit settings page.
//! - **Cookie**: a single session cookie whose name is the configured
//!   username and whose value is the configured secret, matching setups where
//!   Gerrit sits behind an SSO proxy that hands out a session cookie.
//! - **Digest**: recognised as a scheme name but refused at configuration
//!   time with [`ConfigError::DigestUnsupported`]. Requests are never sent
//!   unauthenticated because digest was asked for.
//!
//! Whenever credentials are configured, the client routes requests through
//! Gerrit's authenticated `/a/` namespace.
//!
//! ## Example
//!
//! ```rust
//! use gerrit_cli::auth::{AuthScheme, Credentials};
//!
//! let scheme: AuthScheme = "basic".parse()?;
//! let credentials = Credentials::new(scheme, "admin", "secret")?;
//! assert_eq!(credentials.username(), "admin");
//!
//! assert!(Credentials::new(AuthScheme::Digest, "admin", "secret").is_err());
//! # Ok::<(), gerrit_cli::api::common::ConfigError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use reqwest::header::{HeaderValue, COOKIE};
use reqwest::RequestBuilder;

use crate::api::common::ConfigError;

/// Authentication scheme names accepted by [`Credentials::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthScheme {
    /// HTTP basic authentication.
    Basic,
    /// HTTP digest authentication (not supported, see module docs).
    Digest,
    /// Session cookie authentication.
    Cookie,
}

impl AuthScheme {
    /// The lowercase tag used in configuration files and flags.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Basic => "basic",
            AuthScheme::Digest => "digest",
            AuthScheme::Cookie => "cookie",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(ConfigError::EmptyCredential),
            "basic" => Ok(AuthScheme::Basic),
            "digest" => Ok(AuthScheme::Digest),
            "cookie" => Ok(AuthScheme::Cookie),
            other => Err(ConfigError::UnknownScheme(other.to_string())),
        }
    }
}

/// Validated credentials, ready to be attached to requests.
///
/// Only schemes that can actually authenticate a request have a variant, so
/// holding a `Credentials` value means every request will carry them.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// HTTP basic authentication.
    Basic { username: String, password: String },
    /// A session cookie `name=value`.
    Cookie { name: String, value: String },
}

impl Credentials {
    /// Validates a scheme and secret pair.
    ///
    /// # Parameters
    ///
    /// * `scheme` - The authentication scheme
    /// * `username` - Username, or the cookie name for [`AuthScheme::Cookie`]
    /// * `password` - HTTP password, or the cookie value
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyCredential`] if `username` or `password` is empty
    /// - [`ConfigError::DigestUnsupported`] for [`AuthScheme::Digest`]
    /// - [`ConfigError::InvalidCredential`] if a value could not be sent as a
    ///   header
    pub fn new(
        scheme: AuthScheme,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return Err(ConfigError::EmptyCredential);
        }

        match scheme {
            AuthScheme::Basic => {
                if username.chars().any(char::is_control) {
                    return Err(ConfigError::InvalidCredential("username"));
                }
                Ok(Credentials::Basic { username, password })
            }
            AuthScheme::Cookie => {
                if username.contains(['=', ';']) {
                    return Err(ConfigError::InvalidCredential("cookie name"));
                }
                HeaderValue::from_str(&format!("{username}={password}"))
                    .map_err(|_| ConfigError::InvalidCredential("cookie"))?;
                Ok(Credentials::Cookie {
                    name: username,
                    value: password,
                })
            }
            AuthScheme::Digest => Err(ConfigError::DigestUnsupported),
        }
    }

    /// Parses the scheme tag and validates the pair in one step.
    ///
    /// This is what configuration files and command-line flags go through.
    pub fn from_parts(scheme: &str, username: &str, password: &str) -> Result<Self, ConfigError> {
        Self::new(scheme.parse()?, username, password)
    }

    /// Basic credentials.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(AuthScheme::Basic, username, password)
    }

    /// Cookie credentials.
    pub fn cookie(name: impl Into<String>, value: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(AuthScheme::Cookie, name, value)
    }

    /// The scheme these credentials were built for.
    pub fn scheme(&self) -> AuthScheme {
        match self {
            Credentials::Basic { .. } => AuthScheme::Basic,
            Credentials::Cookie { .. } => AuthScheme::Cookie,
        }
    }

    /// The username (or cookie name).
    pub fn username(&self) -> &str {
        match self {
            Credentials::Basic { username, .. } => username,
            Credentials::Cookie { name, .. } => name,
        }
    }

    /// Adds the credentials to an outgoing request.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gerrit_cli::auth::Credentials;
    /// use reqwest::Client;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let credentials = Credentials::basic("admin", "secret")?;
    /// let request = credentials.apply_to_request(Client::new().get("https://review.example.com/a/accounts/self"));
    /// # let _ = request;
    /// # Ok(())
    /// # }
    /// ```
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Credentials::Basic { username, password } => request.basic_auth(username, Some(password)),
            Credentials::Cookie { name, value } => request.header(COOKIE, format!("{name}={value}")),
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("scheme", &self.scheme())
            .field("username", &self.username())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_parsing() {
        assert_eq!("basic".parse::<AuthScheme>().unwrap(), AuthScheme::Basic);
        assert_eq!("cookie".parse::<AuthScheme>().unwrap(), AuthScheme::Cookie);
        assert_eq!("digest".parse::<AuthScheme>().unwrap(), AuthScheme::Digest);
        assert_eq!(
            "oauth".parse::<AuthScheme>(),
            Err(ConfigError::UnknownScheme("oauth".into()))
        );
        assert_eq!("".parse::<AuthScheme>(), Err(ConfigError::EmptyCredential));
    }

    #[test]
    fn test_empty_values_are_rejected() {
        assert_eq!(
            Credentials::basic("", "secret"),
            Err(ConfigError::EmptyCredential)
        );
        assert_eq!(
            Credentials::cookie("GerritAccount", ""),
            Err(ConfigError::EmptyCredential)
        );
    }

    #[test]
    fn test_header_unsafe_values_are_rejected() {
        assert_eq!(
            Credentials::cookie("GerritAccount", "abc\ndef"),
            Err(ConfigError::InvalidCredential("cookie"))
        );
        assert_eq!(
            Credentials::cookie("Gerrit\rAccount", "abc"),
            Err(ConfigError::InvalidCredential("cookie"))
        );
        assert_eq!(
            Credentials::cookie("a=b", "abc"),
            Err(ConfigError::InvalidCredential("cookie name"))
        );
        assert_eq!(
            Credentials::basic("ad\nmin", "secret"),
            Err(ConfigError::InvalidCredential("username"))
        );
    }

    #[test]
    fn test_digest_fails_closed() {
        assert_eq!(
            Credentials::from_parts("digest", "admin", "secret"),
            Err(ConfigError::DigestUnsupported)
        );
    }

    #[test]
    fn test_basic_header() {
        let credentials = Credentials::basic("admin", "secret").unwrap();
        let request = credentials
            .apply_to_request(reqwest::Client::new().get("http://localhost/a/"))
            .build()
            .unwrap();
        assert_eq!(
            request.headers()[reqwest::header::AUTHORIZATION],
            "Basic YWRtaW46c2VjcmV0"
        );
    }

    #[test]
    fn test_cookie_header() {
        let credentials = Credentials::cookie("GerritAccount", "aSceprtBc").unwrap();
        let request = credentials
            .apply_to_request(reqwest::Client::new().get("http://localhost/a/"))
            .build()
            .unwrap();
        assert_eq!(request.headers()[COOKIE], "GerritAccount=aSceprtBc");
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_debug_hides_secret() {
        let credentials = Credentials::basic("admin", "hunter2").unwrap();
        let debug = format!("{credentials:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }
}
