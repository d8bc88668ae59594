//
//  gerrit-cli
//  api/server.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Server configuration (`config/server/`).

use std::collections::BTreeMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::client::GerritClient;
use super::common::{Payload, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountsConfigInfo {
    /// `FULL_NAME`, `EMAIL`, `USERNAME` and so on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_display_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthInfo {
    /// `HTTP`, `LDAP`, `OAUTH`, `OPENID` and so on.
    pub auth_type: String,
    #[serde(default)]
    pub use_contributor_agreements: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub editable_account_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_basic_auth_policy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeConfigInfo {
    #[serde(default)]
    pub allow_blame: bool,
    #[serde(default)]
    pub large_change: u32,
    #[serde(default)]
    pub reply_label: String,
    #[serde(default)]
    pub reply_tooltip: String,
    /// Seconds between polls for updates; 0 disables polling.
    #[serde(default)]
    pub update_delay: u32,
    #[serde(default)]
    pub submit_whole_topic: bool,
    #[serde(default)]
    pub disable_private_changes: bool,
    #[serde(default)]
    pub mergeability_computation_behavior: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadSchemeInfo {
    pub url: String,
    #[serde(default)]
    pub is_auth_required: bool,
    #[serde(default)]
    pub is_auth_supported: bool,
    #[serde(default)]
    pub commands: BTreeMap<String, String>,
    #[serde(default)]
    pub clone_commands: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadInfo {
    #[serde(default)]
    pub schemes: BTreeMap<String, DownloadSchemeInfo>,
    #[serde(default)]
    pub archives: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GerritInfo {
    pub all_projects: String,
    pub all_users: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_bug_url: Option<String>,
    #[serde(default)]
    pub edit_gpg_keys: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginConfigInfo {
    #[serde(default)]
    pub has_avatars: bool,
    #[serde(default)]
    pub js_resource_paths: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestInfo {
    #[serde(default)]
    pub from: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserConfigInfo {
    #[serde(default)]
    pub anonymous_coward_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiveInfo {
    #[serde(default)]
    pub enable_signed_push: bool,
}

/// Configuration of the server visible to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(default)]
    pub accounts: AccountsConfigInfo,
    pub auth: AuthInfo,
    #[serde(default)]
    pub change: ChangeConfigInfo,
    #[serde(default)]
    pub download: DownloadInfo,
    pub gerrit: GerritInfo,
    #[serde(default)]
    pub plugin: PluginConfigInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receive: Option<ReceiveInfo>,
    #[serde(default)]
    pub suggest: SuggestInfo,
    #[serde(default)]
    pub user: UserConfigInfo,
    /// Present (as an empty object) when SSHD is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sshd: Option<serde_json::Value>,
}

/// Server configuration endpoints reachable from a [`GerritClient`].
#[derive(Debug, Clone, Copy)]
pub struct Server<'a> {
    client: &'a GerritClient,
}

impl GerritClient {
    pub fn server(&self) -> Server<'_> {
        Server { client: self }
    }
}

impl Server<'_> {
    /// The Gerrit version, e.g. `3.9.1`.
    pub async fn version(&self) -> Result<String> {
        self.client
            .requester()
            .call_text(Method::GET, "config/server/version", Payload::Empty)
            .await
    }

    pub async fn info(&self) -> Result<ServerInfo> {
        self.client
            .requester()
            .call_json(Method::GET, "config/server/info", Payload::Empty)
            .await
    }
}
