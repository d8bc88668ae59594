//
//  gerrit-cli
//  api/changes/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Change API
//!
//! Operations on `changes/{id}` plus the attention set, change edit,
//! reviewer and revision endpoints nested below it.
//!
//! A change id may be the numeric change number, the `Change-Id` footer or
//! the `{project}~{branch}~{Change-Id}` triplet. Ids are escaped by the
//! handle, so pass them unescaped.
//!
//! # Example
//!
//! ```rust,no_run
//! use gerrit_cli::api::GerritClient;
//! use gerrit_cli::api::changes::{AbandonInput, QueryChangeOptions};
//!
//! # async fn run() -> gerrit_cli::api::Result<()> {
//! let client = GerritClient::new("https://review.example.com")?;
//! client.set_basic_auth("admin", "secret")?;
//!
//! let options = QueryChangeOptions {
//!     query: vec!["is:open owner:self".into()],
//!     limit: Some(10),
//!     ..Default::default()
//! };
//! for info in client.changes().query(&options).await? {
//!     println!("{} {}", info.number, info.subject);
//! }
//!
//! let change = client.changes().change("12345");
//! change.abandon(&AbandonInput { message: Some("superseded".into()), ..Default::default() }).await?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::accounts::AccountInfo;
use super::client::GerritClient;
use super::common::{escape, non_empty, Payload, Result, Timestamp};

mod attention;
mod edit;
mod reviewer;
mod revision;

pub use attention::*;
pub use edit::*;
pub use reviewer::*;
pub use revision::*;

/// A change as returned by `GET changes/{id}`.
///
/// Most collections are only filled when the matching option (`o=...`)
/// was requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub project: String,
    pub branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attention_set: BTreeMap<String, AttentionSetInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<AccountInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub change_id: String,
    #[serde(default)]
    pub subject: String,
    /// `NEW`, `MERGED` or `ABANDONED`.
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitter: Option<AccountInfo>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub starred: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reviewed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mergeable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submittable: Option<bool>,
    #[serde(default)]
    pub insertions: i64,
    #[serde(default)]
    pub deletions: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_comment_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unresolved_comment_count: Option<u32>,
    #[serde(rename = "_number", default)]
    pub number: u64,
    #[serde(default)]
    pub owner: AccountInfo,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<String, ActionInfo>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, LabelInfo>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub permitted_labels: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removable_reviewers: Vec<AccountInfo>,
    /// Keyed by reviewer state: `REVIEWER`, `CC` or `REMOVED`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub reviewers: BTreeMap<String, Vec<AccountInfo>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pending_reviewers: BTreeMap<String, Vec<AccountInfo>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviewer_updates: Vec<ReviewerUpdateInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<ChangeMessageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_revision: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub revisions: BTreeMap<String, RevisionInfo>,
    /// Set on the last entry of a query page when more results exist.
    #[serde(rename = "_more_changes", default, skip_serializing_if = "std::ops::Not::not")]
    pub more_changes: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<ProblemInfo>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_private: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub work_in_progress: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_review_started: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revert_of: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cherry_pick_of_change: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cherry_pick_of_patch_set: Option<u32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub contains_git_conflicts: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_change: Option<String>,
}

/// Input for creating a change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeInput {
    pub project: String,
    pub branch: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_private: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub work_in_progress: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_change: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_commit: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub new_branch: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub validation_options: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge: Option<MergeInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<ChangeAuthorInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
}

/// Author override for [`ChangeInput`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeAuthorInput {
    pub name: String,
    pub email: String,
}

/// Merge commit parameters for [`ChangeInput`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeInput {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub allow_conflicts: bool,
}

/// A label on the current patch set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelInfo {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved: Option<AccountInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected: Option<AccountInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended: Option<AccountInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disliked: Option<AccountInfo>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub blocking: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all: Vec<ApprovalInfo>,
    /// Vote value (e.g. `"+1"`) to its description.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, String>,
}

/// One vote on a label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApprovalInfo {
    #[serde(flatten)]
    pub account: AccountInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeMessageInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AccountInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Timestamp>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(rename = "_revision_number", default, skip_serializing_if = "Option::is_none")]
    pub revision_number: Option<u32>,
}

/// A change to the reviewer set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewerUpdateInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<Timestamp>,
    #[serde(default)]
    pub updated_by: AccountInfo,
    #[serde(default)]
    pub reviewer: AccountInfo,
    /// `REVIEWER`, `CC` or `REMOVED`.
    #[serde(default)]
    pub state: String,
}

/// A consistency problem reported by `check`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemInfo {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

/// Branches and tags a change or commit is included in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncludedInInfo {
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub external: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifyInfo {
    #[serde(default)]
    pub accounts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbandonInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub notify_details: BTreeMap<String, NotifyInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestoreInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevertInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

/// Rebase parameters, used for changes and revisions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RebaseInput {
    /// New parent: a change number, revision or ref. Empty rebases onto the branch tip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub allow_conflicts: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub on_behalf_of_uploader: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer_email: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub validation_options: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveInput {
    pub destination_branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub keep_all_votes: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_behalf_of: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub notify_details: BTreeMap<String, NotifyInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixInput {
    #[serde(default)]
    pub delete_patch_set_if_commit_missing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect_merged_as: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivateInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicInput {
    /// An empty or missing topic deletes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

/// New commit message; creates a new patch set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitMessageInput {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub notify_details: BTreeMap<String, NotifyInfo>,
}

/// Optional message for the `ready` and `wip` transitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkInProgressInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Hashtags to add to and remove from a change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HashtagsInput {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteChangeMessageInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A submit requirement to evaluate against a change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitRequirementInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicability_expression: Option<String>,
    pub submittability_expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_expression: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub allow_override_in_child_projects: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitRequirementResultInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `SATISFIED`, `UNSATISFIED`, `OVERRIDDEN`, `NOT_APPLICABLE` or `ERROR`.
    pub status: String,
    #[serde(default)]
    pub is_legacy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicability_expression_result: Option<SubmitRequirementExpressionInfo>,
    #[serde(default)]
    pub submittability_expression_result: SubmitRequirementExpressionInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_expression_result: Option<SubmitRequirementExpressionInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitRequirementExpressionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default)]
    pub fulfilled: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub passing_atoms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failing_atoms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_atoms: Vec<String>,
}

/// Query options for [`Changes::query`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryChangeOptions {
    /// Search operators, e.g. `status:open project:demo`.
    #[serde(rename = "q", skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<String>,
    #[serde(rename = "n", skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(rename = "S", skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    /// Extra sections such as `LABELS`, `CURRENT_REVISION`, `MESSAGES`.
    #[serde(rename = "o", skip_serializing_if = "Vec::is_empty")]
    pub additional_fields: Vec<String>,
}

/// Extra sections to include when fetching a change.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeOptions {
    #[serde(rename = "o", skip_serializing_if = "Vec::is_empty")]
    pub additional_fields: Vec<String>,
}

/// Change service.
#[derive(Debug, Clone, Copy)]
pub struct Changes<'a> {
    client: &'a GerritClient,
}

impl GerritClient {
    /// Change operations.
    pub fn changes(&self) -> Changes<'_> {
        Changes { client: self }
    }
}

impl Changes<'_> {
    /// Searches for changes.
    ///
    /// A single query is expected; Gerrit answers multiple `q` parameters
    /// with nested arrays.
    pub async fn query(&self, options: &QueryChangeOptions) -> Result<Vec<ChangeInfo>> {
        Ok(self
            .client
            .requester()
            .call_json_opt(Method::GET, "changes/", Payload::json(options))
            .await?
            .unwrap_or_default())
    }

    /// A handle on change `id` without fetching it.
    pub fn change(&self, id: &str) -> Change {
        Change::new(self.client.clone(), id)
    }

    /// Fetches a change with the requested extra sections.
    pub async fn get(&self, id: &str, options: &ChangeOptions) -> Result<Change> {
        let mut change = self.change(id);
        change.poll_with(options).await?;
        Ok(change)
    }

    /// Creates a change.
    ///
    /// The returned handle is bound to the server-assigned change number
    /// and holds the created [`ChangeInfo`].
    pub async fn create(&self, input: &ChangeInput) -> Result<Change> {
        let info: ChangeInfo = self
            .client
            .requester()
            .call_json(Method::POST, "changes/", Payload::json(input))
            .await?;
        debug!(number = info.number, id = %info.id, "created change");

        let mut change = Change::new(self.client.clone(), &info.number.to_string());
        change.raw = Some(info);
        Ok(change)
    }

    /// Deletes a new or abandoned change.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.change(id).delete().await
    }
}

/// Handle on a single change.
#[derive(Debug, Clone)]
pub struct Change {
    client: GerritClient,
    id: String,
    path: String,
    raw: Option<ChangeInfo>,
}

impl Change {
    fn new(client: GerritClient, id: &str) -> Self {
        Self {
            client,
            id: id.to_string(),
            path: format!("changes/{}", escape(id)),
            raw: None,
        }
    }

    /// The id this handle addresses.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn raw(&self) -> Option<&ChangeInfo> {
        self.raw.as_ref()
    }

    pub(crate) fn client(&self) -> &GerritClient {
        &self.client
    }

    pub(crate) fn endpoint(&self, suffix: &str) -> String {
        format!("{}/{}", self.path, suffix)
    }

    /// Refreshes [`raw`](Self::raw) without extra sections.
    pub async fn poll(&mut self) -> Result<&ChangeInfo> {
        self.poll_with(&ChangeOptions::default()).await
    }

    /// Refreshes [`raw`](Self::raw) including `options.additional_fields`.
    pub async fn poll_with(&mut self, options: &ChangeOptions) -> Result<&ChangeInfo> {
        let info: ChangeInfo = self
            .client
            .requester()
            .call_json(Method::GET, &self.path, Payload::json(options))
            .await?;
        Ok(&*self.raw.insert(info))
    }

    pub async fn delete(&self) -> Result<()> {
        self.client
            .requester()
            .call_empty(Method::DELETE, &self.path, Payload::Empty)
            .await?;
        Ok(())
    }

    /// The change with labels, detailed labels, accounts and messages.
    pub async fn detail(&self, options: &ChangeOptions) -> Result<ChangeInfo> {
        self.client
            .requester()
            .call_json(Method::GET, &self.endpoint("detail"), Payload::json(options))
            .await
    }

    /// Creates a new patch set with a new commit message.
    pub async fn set_commit_message(&self, input: &CommitMessageInput) -> Result<()> {
        self.send(Method::PUT, "message", Payload::json(input)).await
    }

    pub async fn set_ready_for_review(&self, input: &WorkInProgressInput) -> Result<()> {
        self.send(Method::POST, "ready", Payload::json(input)).await
    }

    pub async fn set_work_in_progress(&self, input: &WorkInProgressInput) -> Result<()> {
        self.send(Method::POST, "wip", Payload::json(input)).await
    }

    /// The topic, or `None` when it is not set.
    pub async fn topic(&self) -> Result<Option<String>> {
        let topic = self
            .client
            .requester()
            .call_text(Method::GET, &self.endpoint("topic"), Payload::Empty)
            .await?;
        Ok(non_empty(topic))
    }

    /// Sets the topic; `None` is returned when the topic was cleared.
    pub async fn set_topic(&self, input: &TopicInput) -> Result<Option<String>> {
        let topic = self
            .client
            .requester()
            .call_text(Method::PUT, &self.endpoint("topic"), Payload::json(input))
            .await?;
        Ok(non_empty(topic))
    }

    pub async fn delete_topic(&self) -> Result<()> {
        self.send(Method::DELETE, "topic", Payload::Empty).await
    }

    pub async fn abandon(&self, input: &AbandonInput) -> Result<ChangeInfo> {
        self.operate("abandon", Payload::json(input)).await
    }

    pub async fn restore(&self, input: &RestoreInput) -> Result<ChangeInfo> {
        self.operate("restore", Payload::json(input)).await
    }

    pub async fn rebase(&self, input: &RebaseInput) -> Result<ChangeInfo> {
        self.operate("rebase", Payload::json(input)).await
    }

    /// Moves the change to another branch.
    pub async fn move_change(&self, input: &MoveInput) -> Result<ChangeInfo> {
        self.operate("move", Payload::json(input)).await
    }

    /// Creates a change reverting this one.
    pub async fn revert(&self, input: &RevertInput) -> Result<ChangeInfo> {
        self.operate("revert", Payload::json(input)).await
    }

    pub async fn submit(&self, input: &SubmitInput) -> Result<ChangeInfo> {
        self.operate("submit", Payload::json(input)).await
    }

    /// Runs the consistency checks and fixes what can be fixed.
    pub async fn fix(&self, input: &FixInput) -> Result<ChangeInfo> {
        self.operate("check", Payload::json(input)).await
    }

    pub async fn mark_private(&self, input: &PrivateInput) -> Result<()> {
        self.send(Method::POST, "private", Payload::json(input)).await
    }

    /// Gerrit answers `409 Conflict` when the change is not private.
    pub async fn unmark_private(&self) -> Result<()> {
        self.send(Method::DELETE, "private", Payload::Empty).await
    }

    /// Changes submitted together with this one, itself included.
    pub async fn submitted_together(&self) -> Result<Vec<ChangeInfo>> {
        self.fetch_list("submitted_together").await
    }

    pub async fn included_in(&self) -> Result<IncludedInInfo> {
        self.client
            .requester()
            .call_json(Method::GET, &self.endpoint("in"), Payload::Empty)
            .await
    }

    /// Published comments of all revisions, keyed by file path.
    pub async fn comments(&self) -> Result<BTreeMap<String, Vec<CommentInfo>>> {
        self.fetch_map("comments").await
    }

    /// The caller's draft comments of all revisions, keyed by file path.
    pub async fn drafts(&self) -> Result<BTreeMap<String, Vec<CommentInfo>>> {
        self.fetch_map("drafts").await
    }

    /// Consistency check; problems are listed in [`ChangeInfo::problems`].
    pub async fn check(&self) -> Result<ChangeInfo> {
        self.client
            .requester()
            .call_json(Method::GET, &self.endpoint("check"), Payload::Empty)
            .await
    }

    /// Adds or updates the change in the secondary index.
    pub async fn index(&self) -> Result<()> {
        self.send(Method::POST, "index", Payload::Empty).await
    }

    pub async fn hashtags(&self) -> Result<Vec<String>> {
        self.fetch_list("hashtags").await
    }

    /// Updates the hashtags and returns the resulting set.
    pub async fn set_hashtags(&self, input: &HashtagsInput) -> Result<Vec<String>> {
        Ok(self
            .client
            .requester()
            .call_json_opt(Method::POST, &self.endpoint("hashtags"), Payload::json(input))
            .await?
            .unwrap_or_default())
    }

    pub async fn messages(&self) -> Result<Vec<ChangeMessageInfo>> {
        self.fetch_list("messages").await
    }

    pub async fn message(&self, message_id: &str) -> Result<ChangeMessageInfo> {
        self.client
            .requester()
            .call_json(
                Method::GET,
                &self.endpoint(&format!("messages/{}", escape(message_id))),
                Payload::Empty,
            )
            .await
    }

    /// Replaces a message with a deletion notice. Requires the
    /// `Administrate Server` capability.
    pub async fn delete_message(
        &self,
        message_id: &str,
        input: &DeleteChangeMessageInput,
    ) -> Result<ChangeMessageInfo> {
        self.client
            .requester()
            .call_json(
                Method::POST,
                &self.endpoint(&format!("messages/{}/delete", escape(message_id))),
                Payload::json(input),
            )
            .await
    }

    /// Evaluates a submit requirement against the change.
    pub async fn check_submit_requirement(
        &self,
        input: &SubmitRequirementInput,
    ) -> Result<SubmitRequirementResultInfo> {
        self.client
            .requester()
            .call_json(
                Method::POST,
                &self.endpoint("check.submit_requirement"),
                Payload::json(input),
            )
            .await
    }

    /// The change edit of the caller.
    pub fn edit(&self) -> ChangeEdit<'_> {
        ChangeEdit::new(self)
    }

    pub fn reviewers(&self) -> Reviewers<'_> {
        Reviewers::new(self)
    }

    /// A patch set: `current`, a patch set number or a commit SHA-1.
    pub fn revision(&self, id: &str) -> Revision<'_> {
        Revision::new(self, id)
    }

    async fn send(&self, method: Method, suffix: &str, payload: Payload<'_>) -> Result<()> {
        self.client
            .requester()
            .call_empty(method, &self.endpoint(suffix), payload)
            .await?;
        Ok(())
    }

    async fn operate(&self, action: &str, payload: Payload<'_>) -> Result<ChangeInfo> {
        self.client
            .requester()
            .call_json(Method::POST, &self.endpoint(action), payload)
            .await
    }

    async fn fetch_list<T>(&self, suffix: &str) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        Ok(self
            .client
            .requester()
            .call_json_opt(Method::GET, &self.endpoint(suffix), Payload::Empty)
            .await?
            .unwrap_or_default())
    }

    async fn fetch_map<T>(&self, suffix: &str) -> Result<BTreeMap<String, T>>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        Ok(self
            .client
            .requester()
            .call_json_opt(Method::GET, &self.endpoint(suffix), Payload::Empty)
            .await?
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    const CHANGE: &str = r#")]}'
{"id":"demo~main~I8473b95934b5732ac55d26311a706c9c2bde9940","project":"demo","branch":"main","change_id":"I8473b95934b5732ac55d26311a706c9c2bde9940","subject":"Implementing Feature X","status":"NEW","created":"2013-02-01 09:59:32.126000000","updated":"2013-02-21 11:16:36.775000000","insertions":34,"deletions":101,"_number":3965,"owner":{"name":"John Doe"}}"#;

    #[tokio::test]
    async fn test_query_sends_repeated_options() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/changes/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "status:open".into()),
                Matcher::UrlEncoded("n".into(), "2".into()),
                Matcher::Regex("o=LABELS&o=CURRENT_REVISION".into()),
            ]))
            .with_body(format!("[{}]", CHANGE.trim_start_matches(")]}'\n")))
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let options = QueryChangeOptions {
            query: vec!["status:open".into()],
            limit: Some(2),
            additional_fields: vec!["LABELS".into(), "CURRENT_REVISION".into()],
            ..Default::default()
        };
        let changes = client.changes().query(&options).await.unwrap();
        m.assert_async().await;
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].number, 3965);
        assert_eq!(changes[0].owner.name.as_deref(), Some("John Doe"));
    }

    #[tokio::test]
    async fn test_create_binds_to_change_number() {
        let mut server = mockito::Server::new_async().await;
        let _create = server
            .mock("POST", "/changes/")
            .match_body(Matcher::Json(serde_json::json!({
                "project": "demo",
                "branch": "main",
                "subject": "Implementing Feature X"
            })))
            .with_status(201)
            .with_body(CHANGE)
            .create_async()
            .await;
        let abandon = server
            .mock("POST", "/changes/3965/abandon")
            .with_body(CHANGE.replace("\"NEW\"", "\"ABANDONED\""))
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let input = ChangeInput {
            project: "demo".into(),
            branch: "main".into(),
            subject: "Implementing Feature X".into(),
            ..Default::default()
        };
        let change = client.changes().create(&input).await.unwrap();
        assert_eq!(change.id(), "3965");
        assert_eq!(change.raw().unwrap().status, "NEW");

        let info = change.abandon(&AbandonInput::default()).await.unwrap();
        abandon.assert_async().await;
        assert_eq!(info.status, "ABANDONED");
    }

    #[tokio::test]
    async fn test_triplet_id_is_escaped() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/changes/platform%2Fbuild%7Emain%7EI0123/topic")
            .with_body(")]}'\n\"release\"")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let topic = client
            .changes()
            .change("platform/build~main~I0123")
            .topic()
            .await
            .unwrap();
        assert_eq!(topic.as_deref(), Some("release"));
    }

    #[tokio::test]
    async fn test_missing_topic_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/changes/1/topic")
            .with_status(204)
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let topic = client.changes().change("1").topic().await.unwrap();
        assert!(topic.is_none());
    }

    #[tokio::test]
    async fn test_set_hashtags() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/changes/1/hashtags")
            .match_body(Matcher::Json(serde_json::json!({"add": ["perf"], "remove": ["wip"]})))
            .with_body(")]}'\n[\"perf\",\"ui\"]")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let input = HashtagsInput {
            add: vec!["perf".into()],
            remove: vec!["wip".into()],
        };
        let tags = client.changes().change("1").set_hashtags(&input).await.unwrap();
        assert_eq!(tags, vec!["perf".to_string(), "ui".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_message_posts_reason() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("POST", "/changes/1/messages/abc/delete")
            .match_body(Matcher::Json(serde_json::json!({"reason": "spam"})))
            .with_body(")]}'\n{\"id\":\"abc\",\"message\":\"Change message removed by: Administrator\"}")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let input = DeleteChangeMessageInput {
            reason: Some("spam".into()),
        };
        let message = client
            .changes()
            .change("1")
            .delete_message("abc", &input)
            .await
            .unwrap();
        m.assert_async().await;
        assert!(message.message.starts_with("Change message removed"));
    }

    #[tokio::test]
    async fn test_unmark_private_conflict() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("DELETE", "/changes/1/private")
            .with_status(409)
            .with_body("change is not private")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let err = client.changes().change("1").unmark_private().await.unwrap_err();
        assert!(err.is_conflict());
    }
}
