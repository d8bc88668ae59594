//
//  gerrit-cli
//  api/gitiles.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Gitiles Client
//!
//! Read-only repository browsing through the Gitiles plugin of a Gerrit
//! host. The client shares the [`Requester`] pipeline with
//! [`GerritClient`](super::client::GerritClient) but keeps its own base URL
//! and credentials, since Gitiles is often served from a different host.
//!
//! Gitiles only answers in JSON when asked to, so every request carries
//! `format=JSON`.
//!
//! ```rust,no_run
//! use gerrit_cli::api::gitiles::{GitilesClient, GitilesCommitsOptions};
//!
//! # async fn demo() -> gerrit_cli::api::Result<()> {
//! let gitiles = GitilesClient::new("https://gerrit.example.com/")?;
//! let page = gitiles
//!     .commits("platform/build", "refs/heads/main", &GitilesCommitsOptions {
//!         limit: Some(10),
//!         ..Default::default()
//!     })
//!     .await?;
//! for commit in &page.log {
//!     println!("{} {}", commit.commit.get(..8).unwrap_or(&commit.commit), commit.message.lines().next().unwrap_or(""));
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::client::{Requester, TransportConfig};
use super::common::{escape, ConfigError, Payload, Result};
use crate::auth::{AuthScheme, Credentials};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GitilesCommitsOptions {
    /// Maximum number of commits per page.
    #[serde(rename = "n", skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Page cursor, taken from [`GitilesCommits::next`].
    #[serde(rename = "s", skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitilesPersonInfo {
    pub name: String,
    pub email: String,
    /// Formatted by Gitiles, e.g. `Tue Jan 09 14:32:01 2024 +0100`.
    pub time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitilesDiffInfo {
    /// `add`, `delete`, `modify`, `rename` or `copy`.
    #[serde(rename = "type")]
    pub change_type: String,
    pub old_path: String,
    pub new_path: String,
    #[serde(default)]
    pub old_mode: u32,
    #[serde(default)]
    pub new_mode: u32,
    pub old_id: String,
    pub new_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitilesCommitInfo {
    pub commit: String,
    pub tree: String,
    #[serde(default)]
    pub parents: Vec<String>,
    pub author: GitilesPersonInfo,
    pub committer: GitilesPersonInfo,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tree_diff: Vec<GitilesDiffInfo>,
}

/// One page of a commit log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitilesCommits {
    #[serde(default)]
    pub log: Vec<GitilesCommitInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

#[derive(Serialize)]
struct JsonFormat<'a, T: Serialize> {
    format: &'static str,
    #[serde(flatten)]
    options: &'a T,
}

impl<'a, T: Serialize> JsonFormat<'a, T> {
    fn new(options: &'a T) -> Self {
        Self {
            format: "JSON",
            options,
        }
    }
}

#[derive(Serialize)]
struct NoOptions {}

/// Escapes each `/`-separated segment, keeping the separators.
///
/// Gitiles addresses projects and refs by path, so `platform/build` must
/// stay two segments.
fn escape_path(path: &str) -> String {
    path.split('/').map(escape).collect::<Vec<_>>().join("/")
}

/// Client for the Gitiles plugin.
#[derive(Debug, Clone)]
pub struct GitilesClient {
    requester: Arc<Requester>,
}

impl GitilesClient {
    pub fn new(url: &str) -> Result<Self> {
        Self::with_transport(url, &TransportConfig::default())
    }

    pub fn with_transport(url: &str, transport: &TransportConfig) -> Result<Self> {
        Self::with_http_client(url, transport.build_client()?)
    }

    pub fn with_http_client(url: &str, http: Client) -> Result<Self> {
        Ok(Self {
            requester: Arc::new(Requester::new(url, http)?),
        })
    }

    pub fn set_basic_auth(&self, username: &str, password: &str) -> Result<(), ConfigError> {
        self.set_auth(AuthScheme::Basic, username, password)
    }

    /// Always fails; see [`ConfigError::DigestUnsupported`].
    pub fn set_digest_auth(&self, username: &str, password: &str) -> Result<(), ConfigError> {
        warn!("digest authentication requested but not supported");
        self.set_auth(AuthScheme::Digest, username, password)
    }

    pub fn set_cookie_auth(&self, name: &str, value: &str) -> Result<(), ConfigError> {
        self.set_auth(AuthScheme::Cookie, name, value)
    }

    pub fn clear_auth(&self) {
        self.requester.set_credentials(None);
    }

    pub fn requester(&self) -> &Requester {
        &self.requester
    }

    fn set_auth(&self, scheme: AuthScheme, username: &str, password: &str) -> Result<(), ConfigError> {
        let credentials = Credentials::new(scheme, username, password)?;
        self.requester.set_credentials(Some(credentials));
        Ok(())
    }

    /// A single commit, including its tree diff against the first parent.
    pub async fn commit(&self, project: &str, commit: &str) -> Result<GitilesCommitInfo> {
        let endpoint = format!(
            "plugins/gitiles/{}/+/{}",
            escape_path(project),
            escape(commit)
        );
        self.requester
            .call_json(Method::GET, &endpoint, Payload::json(&JsonFormat::new(&NoOptions {})))
            .await
    }

    /// A page of the log reachable from `reference`, newest first.
    pub async fn commits(
        &self,
        project: &str,
        reference: &str,
        options: &GitilesCommitsOptions,
    ) -> Result<GitilesCommits> {
        let endpoint = format!(
            "plugins/gitiles/{}/+log/{}/",
            escape_path(project),
            escape_path(reference)
        );
        self.requester
            .call_json(Method::GET, &endpoint, Payload::json(&JsonFormat::new(options)))
            .await
    }
}
