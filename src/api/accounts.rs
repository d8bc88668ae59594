//
//  gerrit-cli
//  api/accounts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Account API
//!
//! Operations on `accounts/{id}`. An account id is a numeric id, a
//! username, an email address or `self` for the authenticated caller.
//!
//! # Example
//!
//! ```rust,no_run
//! use gerrit_cli::api::GerritClient;
//! use gerrit_cli::api::accounts::{AccountInput, QueryAccountOptions};
//!
//! # async fn run() -> gerrit_cli::api::Result<()> {
//! let client = GerritClient::new("https://review.example.com")?;
//! client.set_basic_auth("admin", "secret")?;
//!
//! let me = client.accounts().self_account().await?;
//! println!("signed in as {:?}", me.raw().and_then(|a| a.username.as_deref()));
//!
//! let created = client
//!     .accounts()
//!     .pending("jdoe")
//!     .create(&AccountInput { name: Some("John Doe".into()), ..Default::default() })
//!     .await?;
//! println!("new account {}", created.id());
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::changes::ChangeInfo;
use super::client::GerritClient;
use super::common::{escape, non_empty, Payload, Result, Timestamp};
use super::groups::GroupInfo;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvatarInfo {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

/// An account as embedded in changes, comments and reviewer lists.
///
/// Which fields are filled depends on the endpoint and the options passed;
/// most responses only carry `_account_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    #[serde(rename = "_account_id", default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub avatars: Vec<AvatarInfo>,
    /// Set on the last entry of a truncated query result.
    #[serde(rename = "_more_accounts", default, skip_serializing_if = "std::ops::Not::not")]
    pub more_accounts: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_emails: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub inactive: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountDetailInfo {
    #[serde(flatten)]
    pub account: AccountInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_on: Option<Timestamp>,
}

/// Input for creating an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountInput {
    /// Must match the username in the URL when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_password: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountNameInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// An empty status deletes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountStatusInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsernameInput {
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayNameInput {
    pub display_name: String,
}

/// Sets, generates or (with neither field) deletes the HTTP password.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpPasswordInput {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub generate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OAuthTokenInfo {
    pub username: String,
    pub resource_host: String,
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(rename = "type")]
    pub token_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailInfo {
    pub email: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub preferred: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pending_confirmation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailInput {
    pub email: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub preferred: bool,
    /// Skip the confirmation mail. Requires `Modify Account`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_confirmation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SshKeyInfo {
    pub seq: u32,
    pub ssh_public_key: String,
    pub encoded_key: String,
    pub algorithm: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub valid: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpgKeyInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<String>,
}

/// ASCII armored keys to add and key ids to delete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpgKeysInput {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delete: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryLimitInfo {
    pub min: i32,
    pub max: i32,
}

/// Global capabilities of an account. Absent capabilities are not granted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountCapabilityInfo {
    #[serde(default)]
    pub access_database: bool,
    #[serde(default)]
    pub administrate_server: bool,
    #[serde(default)]
    pub create_account: bool,
    #[serde(default)]
    pub create_group: bool,
    #[serde(default)]
    pub create_project: bool,
    #[serde(default)]
    pub email_reviewers: bool,
    #[serde(default)]
    pub flush_caches: bool,
    #[serde(default)]
    pub kill_task: bool,
    #[serde(default)]
    pub maintain_server: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_limit: Option<QueryLimitInfo>,
    #[serde(default)]
    pub run_as: bool,
    #[serde(rename = "runGC", default)]
    pub run_gc: bool,
    #[serde(default)]
    pub stream_events: bool,
    #[serde(default)]
    pub view_all_accounts: bool,
    #[serde(default)]
    pub view_caches: bool,
    #[serde(default)]
    pub view_connections: bool,
    #[serde(default)]
    pub view_plugins: bool,
    #[serde(default)]
    pub view_queue: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopMenuItemInfo {
    pub url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// General user preferences. The same shape is used to update them;
/// fields left `None` are not changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferencesInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes_per_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand_inline_diffs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_date_in_change_table: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_view: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bar_in_change_table: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mute_common_path_prefixes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_off_by: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_base_for_merges: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_in_progress_by_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub my: Vec<TopMenuItemInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub change_table: Vec<String>,
}

/// Diff view preferences; `None` fields are left unchanged on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffPreferencesInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand_all_comments: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_whitespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intraline_difference: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_review: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retain_header: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_line_endings: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_tabs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_whitespace_errors: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_uncommented: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax_highlighting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_line_numbers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
}

/// Inline editor preferences; `None` fields are left unchanged on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditPreferencesInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent_unit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_blink_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_top_menu: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_tabs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_whitespace_errors: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax_highlighting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_line_numbers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_brackets: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_wrapping: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent_with_tabs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_close_brackets: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_base: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountExternalIdInfo {
    pub identity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default)]
    pub trusted: bool,
    #[serde(default)]
    pub can_delete: bool,
}

/// Query parameters for [`Accounts::query`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryAccountOptions {
    #[serde(rename = "q", skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(rename = "n", skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(rename = "S", skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    /// `DETAILS` and/or `ALL_EMAILS`.
    #[serde(rename = "o", skip_serializing_if = "Vec::is_empty")]
    pub additional_fields: Vec<String>,
}

/// Query parameters for [`Account::capabilities`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CapabilityOptions {
    /// Only report these capabilities.
    #[serde(rename = "q", skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<String>,
}

/// Account operations reachable from a [`GerritClient`].
#[derive(Debug, Clone, Copy)]
pub struct Accounts<'a> {
    client: &'a GerritClient,
}

impl GerritClient {
    /// Account operations.
    pub fn accounts(&self) -> Accounts<'_> {
        Accounts { client: self }
    }
}

impl Accounts<'_> {
    /// Accounts matching `options.query`.
    pub async fn query(&self, options: &QueryAccountOptions) -> Result<Vec<AccountInfo>> {
        Ok(self
            .client
            .requester()
            .call_json_opt(Method::GET, "accounts/", Payload::json(options))
            .await?
            .unwrap_or_default())
    }

    /// A handle on `id` without fetching it.
    pub fn account(&self, id: &str) -> Account {
        Account::new(self.client.clone(), id)
    }

    /// Fetches an account.
    pub async fn get(&self, id: &str) -> Result<Account> {
        let mut account = self.account(id);
        account.poll().await?;
        Ok(account)
    }

    /// Fetches the authenticated caller.
    pub async fn self_account(&self) -> Result<Account> {
        self.get("self").await
    }

    /// An account that does not exist yet. See [`PendingAccount::create`].
    pub fn pending(&self, username: &str) -> PendingAccount {
        PendingAccount {
            client: self.client.clone(),
            username: username.to_string(),
        }
    }
}

/// An account about to be created under `username`.
#[derive(Debug, Clone)]
pub struct PendingAccount {
    client: GerritClient,
    username: String,
}

impl PendingAccount {
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Creates the account and returns a handle keyed by its numeric id.
    pub async fn create(self, input: &AccountInput) -> Result<Account> {
        let path = format!("accounts/{}", escape(&self.username));
        let info: AccountInfo = self
            .client
            .requester()
            .call_json(Method::PUT, &path, Payload::json(input))
            .await?;

        let id = match info.account_id {
            Some(id) => id.to_string(),
            None => self.username.clone(),
        };
        debug!(username = %self.username, id = %id, "account created");

        let mut account = Account::new(self.client, &id);
        account.raw = Some(info);
        Ok(account)
    }
}

/// Handle on a single account.
#[derive(Debug, Clone)]
pub struct Account {
    client: GerritClient,
    id: String,
    path: String,
    raw: Option<AccountInfo>,
}

impl Account {
    fn new(client: GerritClient, id: &str) -> Self {
        Self {
            client,
            id: id.to_string(),
            path: format!("accounts/{}", escape(id)),
            raw: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn raw(&self) -> Option<&AccountInfo> {
        self.raw.as_ref()
    }

    fn endpoint(&self, suffix: &str) -> String {
        format!("{}/{}", self.path, suffix)
    }

    async fn get<T>(&self, suffix: &str, payload: Payload<'_>) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        self.client
            .requester()
            .call_json(Method::GET, &self.endpoint(suffix), payload)
            .await
    }

    async fn list<T>(&self, suffix: &str) -> Result<T>
    where
        T: DeserializeOwned + Default + Send,
    {
        Ok(self
            .client
            .requester()
            .call_json_opt(Method::GET, &self.endpoint(suffix), Payload::Empty)
            .await?
            .unwrap_or_default())
    }

    async fn put<T>(&self, suffix: &str, payload: Payload<'_>) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        self.client
            .requester()
            .call_json(Method::PUT, &self.endpoint(suffix), payload)
            .await
    }

    async fn text(&self, method: Method, suffix: &str, payload: Payload<'_>) -> Result<Option<String>> {
        let text = self
            .client
            .requester()
            .call_text(method, &self.endpoint(suffix), payload)
            .await?;
        Ok(non_empty(text))
    }

    async fn send(&self, method: Method, suffix: &str) -> Result<()> {
        self.client
            .requester()
            .call_empty(method, &self.endpoint(suffix), Payload::Empty)
            .await?;
        Ok(())
    }

    pub async fn poll(&mut self) -> Result<&AccountInfo> {
        let info: AccountInfo = self
            .client
            .requester()
            .call_json(Method::GET, &self.path, Payload::Empty)
            .await?;
        Ok(&*self.raw.insert(info))
    }

    pub async fn details(&self) -> Result<AccountDetailInfo> {
        self.get("detail", Payload::Empty).await
    }

    /// Full name, `None` when unset.
    pub async fn name(&self) -> Result<Option<String>> {
        self.text(Method::GET, "name", Payload::Empty).await
    }

    pub async fn set_name(&self, input: &AccountNameInput) -> Result<Option<String>> {
        self.text(Method::PUT, "name", Payload::json(input)).await
    }

    pub async fn delete_name(&self) -> Result<()> {
        self.send(Method::DELETE, "name").await
    }

    pub async fn status(&self) -> Result<Option<String>> {
        self.text(Method::GET, "status", Payload::Empty).await
    }

    pub async fn set_status(&self, input: &AccountStatusInput) -> Result<Option<String>> {
        self.text(Method::PUT, "status", Payload::json(input)).await
    }

    pub async fn username(&self) -> Result<Option<String>> {
        self.text(Method::GET, "username", Payload::Empty).await
    }

    /// Usernames can only be set once.
    pub async fn set_username(&self, input: &UsernameInput) -> Result<Option<String>> {
        self.text(Method::PUT, "username", Payload::json(input)).await
    }

    pub async fn set_display_name(&self, input: &DisplayNameInput) -> Result<Option<String>> {
        self.text(Method::PUT, "displayname", Payload::json(input))
            .await
    }

    /// Gerrit answers `ok` for active accounts and `204` for inactive ones.
    pub async fn active(&self) -> Result<bool> {
        Ok(self.text(Method::GET, "active", Payload::Empty).await?.is_some())
    }

    pub async fn set_active(&self) -> Result<()> {
        self.send(Method::PUT, "active").await
    }

    pub async fn delete_active(&self) -> Result<()> {
        self.send(Method::DELETE, "active").await
    }

    /// Sets or generates the HTTP password and returns it.
    pub async fn set_http_password(&self, input: &HttpPasswordInput) -> Result<Option<String>> {
        self.text(Method::PUT, "password.http", Payload::json(input))
            .await
    }

    pub async fn delete_http_password(&self) -> Result<()> {
        self.send(Method::DELETE, "password.http").await
    }

    pub async fn oauth_token(&self) -> Result<OAuthTokenInfo> {
        self.get("oauthtoken", Payload::Empty).await
    }

    pub async fn emails(&self) -> Result<Vec<EmailInfo>> {
        self.list("emails").await
    }

    pub async fn email(&self, email: &str) -> Result<EmailInfo> {
        self.get(&format!("emails/{}", escape(email)), Payload::Empty)
            .await
    }

    pub async fn create_email(&self, input: &EmailInput) -> Result<EmailInfo> {
        self.put(&format!("emails/{}", escape(&input.email)), Payload::json(input))
            .await
    }

    pub async fn delete_email(&self, email: &str) -> Result<()> {
        self.send(Method::DELETE, &format!("emails/{}", escape(email)))
            .await
    }

    pub async fn set_preferred_email(&self, email: &str) -> Result<()> {
        self.send(Method::PUT, &format!("emails/{}/preferred", escape(email)))
            .await
    }

    pub async fn ssh_keys(&self) -> Result<Vec<SshKeyInfo>> {
        self.list("sshkeys").await
    }

    pub async fn ssh_key(&self, seq: u32) -> Result<SshKeyInfo> {
        self.get(&format!("sshkeys/{seq}"), Payload::Empty).await
    }

    /// Adds a public key given in OpenSSH format.
    pub async fn add_ssh_key(&self, key: &str) -> Result<SshKeyInfo> {
        self.client
            .requester()
            .call_json(Method::POST, &self.endpoint("sshkeys"), Payload::text(key))
            .await
    }

    pub async fn delete_ssh_key(&self, seq: u32) -> Result<()> {
        self.send(Method::DELETE, &format!("sshkeys/{seq}")).await
    }

    /// GPG keys keyed by their short id.
    pub async fn gpg_keys(&self) -> Result<BTreeMap<String, GpgKeyInfo>> {
        self.list("gpgkeys").await
    }

    /// Adds and deletes keys in one go; returns the affected keys.
    pub async fn add_gpg_keys(&self, input: &GpgKeysInput) -> Result<BTreeMap<String, GpgKeyInfo>> {
        self.client
            .requester()
            .call_json(Method::POST, &self.endpoint("gpgkeys"), Payload::json(input))
            .await
    }

    pub async fn gpg_key(&self, key_id: &str) -> Result<GpgKeyInfo> {
        self.get(&format!("gpgkeys/{}", escape(key_id)), Payload::Empty)
            .await
    }

    pub async fn delete_gpg_key(&self, key_id: &str) -> Result<()> {
        self.send(Method::DELETE, &format!("gpgkeys/{}", escape(key_id)))
            .await
    }

    pub async fn capabilities(&self, options: &CapabilityOptions) -> Result<AccountCapabilityInfo> {
        self.get("capabilities", Payload::json(options)).await
    }

    /// `true` when the account has `capability`; Gerrit answers 404 otherwise.
    pub async fn check_capability(&self, capability: &str) -> Result<bool> {
        let endpoint = format!("capabilities/{}", escape(capability));
        match self.text(Method::GET, &endpoint, Payload::Empty).await {
            Ok(value) => Ok(value.is_some()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn groups(&self) -> Result<Vec<GroupInfo>> {
        self.list("groups/").await
    }

    pub async fn avatar_change_url(&self) -> Result<Option<String>> {
        self.text(Method::GET, "avatar.change.url", Payload::Empty)
            .await
    }

    pub async fn preferences(&self) -> Result<PreferencesInfo> {
        self.get("preferences", Payload::Empty).await
    }

    pub async fn set_preferences(&self, input: &PreferencesInfo) -> Result<PreferencesInfo> {
        self.put("preferences", Payload::json(input)).await
    }

    pub async fn diff_preferences(&self) -> Result<DiffPreferencesInfo> {
        self.get("preferences.diff", Payload::Empty).await
    }

    pub async fn set_diff_preferences(
        &self,
        input: &DiffPreferencesInfo,
    ) -> Result<DiffPreferencesInfo> {
        self.put("preferences.diff", Payload::json(input)).await
    }

    pub async fn edit_preferences(&self) -> Result<EditPreferencesInfo> {
        self.get("preferences.edit", Payload::Empty).await
    }

    pub async fn set_edit_preferences(
        &self,
        input: &EditPreferencesInfo,
    ) -> Result<EditPreferencesInfo> {
        self.put("preferences.edit", Payload::json(input)).await
    }

    pub async fn external_ids(&self) -> Result<Vec<AccountExternalIdInfo>> {
        self.list("external.ids").await
    }

    pub async fn starred_changes(&self) -> Result<Vec<ChangeInfo>> {
        self.list("starred.changes").await
    }

    pub async fn star_change(&self, change_id: &str) -> Result<()> {
        self.send(Method::PUT, &format!("starred.changes/{}", escape(change_id)))
            .await
    }

    pub async fn unstar_change(&self, change_id: &str) -> Result<()> {
        self.send(Method::DELETE, &format!("starred.changes/{}", escape(change_id)))
            .await
    }
}
