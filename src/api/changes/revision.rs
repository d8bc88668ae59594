//
//  gerrit-cli
//  api/changes/revision.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Revision (patch set) endpoints: `changes/{id}/revisions/{revision}`.

use std::collections::BTreeMap;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::AsyncWrite;

use super::{AttentionSetInput, Change, ChangeInfo, NotifyInfo, RebaseInput, ReviewerInput, ReviewerResult};
use crate::api::accounts::AccountInfo;
use crate::api::common::{escape, non_empty, CommitInfo, Payload, Result, Timestamp, WebLinkInfo};

/// A file touched by a revision or commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// `A`dded, `D`eleted, `R`enamed, `C`opied or `W`ritten; absent for modified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub binary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    #[serde(default)]
    pub lines_inserted: i64,
    #[serde(default)]
    pub lines_deleted: i64,
    #[serde(default)]
    pub size_delta: i64,
    #[serde(default)]
    pub size: i64,
}

/// A REST call the caller may make on a resource, usually contributed by plugins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeableInfo {
    #[serde(default)]
    pub submit_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default)]
    pub mergeable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mergeable_into: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchInfo {
    pub url: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub commands: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    #[serde(default)]
    pub is_merged_in_target_branch: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_set_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_status: Option<String>,
}

/// A patch set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevisionInfo {
    /// `REWORK`, `TRIVIAL_REBASE`, `MERGE_FIRST_PARENT_UPDATE`,
    /// `NO_CODE_CHANGE` or `NO_CHANGE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "_number", default)]
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
    #[serde(default)]
    pub uploader: AccountInfo,
    #[serde(rename = "ref", default)]
    pub reference: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fetch: BTreeMap<String, FetchInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<CommitInfo>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub files: BTreeMap<String, FileInfo>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<String, ActionInfo>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reviewed: bool,
    #[serde(rename = "commit_with_footers", default, skip_serializing_if = "Option::is_none")]
    pub message_with_footer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents_data: Vec<ParentInfo>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRange {
    pub start_line: u32,
    pub start_character: u32,
    pub end_line: u32,
    pub end_character: u32,
}

/// A published or draft inline comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_set: Option<u32>,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// `REVISION` (default) or `PARENT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<CommentRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AccountInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unresolved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
}

/// Input for creating or updating a comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<CommentRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unresolved: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteCommentInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixReplacementInfo {
    pub path: String,
    pub range: CommentRange,
    pub replacement: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixSuggestionInfo {
    #[serde(default)]
    pub fix_id: String,
    pub description: String,
    #[serde(default)]
    pub replacements: Vec<FixReplacementInfo>,
}

/// An inline comment left by an analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotCommentInfo {
    #[serde(flatten)]
    pub comment: CommentInfo,
    pub robot_id: String,
    pub robot_run_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fix_suggestions: Vec<FixSuggestionInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffFileMetaInfo {
    pub name: String,
    pub content_type: String,
    #[serde(default)]
    pub lines: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_links: Vec<WebLinkInfo>,
}

/// One hunk of a diff. Lines only in `a`, only in `b`, or in both (`ab`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffContent {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub a: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub b: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ab: Vec<String>,
    /// `[skip, mark]` pairs of intraline edits.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edit_a: Vec<[u32; 2]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edit_b: Vec<[u32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub common: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffWebLinkInfo {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub show_on_side_by_side_diff_view: bool,
    #[serde(default)]
    pub show_on_unified_diff_view: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_a: Option<DiffFileMetaInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_b: Option<DiffFileMetaInfo>,
    /// `ADDED`, `MODIFIED`, `DELETED`, `RENAMED`, `COPIED` or `REWRITE`.
    pub change_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intraline_status: Option<String>,
    #[serde(default)]
    pub diff_header: Vec<String>,
    #[serde(default)]
    pub content: Vec<DiffContent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_links: Vec<DiffWebLinkInfo>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub binary: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeInfo {
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlameInfo {
    pub author: String,
    pub id: String,
    /// Seconds since the epoch.
    pub time: i64,
    pub commit_msg: String,
    #[serde(default)]
    pub ranges: Vec<RangeInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedChangeAndCommitInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<CommitInfo>,
    #[serde(rename = "_change_number", default, skip_serializing_if = "Option::is_none")]
    pub change_number: Option<u64>,
    #[serde(rename = "_revision_number", default, skip_serializing_if = "Option::is_none")]
    pub revision_number: Option<u32>,
    #[serde(rename = "_current_revision_number", default, skip_serializing_if = "Option::is_none")]
    pub current_revision_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedChangesInfo {
    #[serde(default)]
    pub changes: Vec<RelatedChangeAndCommitInfo>,
}

/// Votes, comments and reviewer updates posted in one go.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, i32>,
    /// File path to the comments on it.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub comments: BTreeMap<String, Vec<CommentInput>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub strict_labels: bool,
    /// `PUBLISH`, `PUBLISH_ALL_REVISIONS` or `KEEP`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drafts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub notify_details: BTreeMap<String, NotifyInfo>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub omit_duplicate_comments: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_behalf_of: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviewers: Vec<ReviewerInput>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ready: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub work_in_progress: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add_to_attention_set: Vec<AttentionSetInput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove_from_attention_set: Vec<AttentionSetInput>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ignore_automatic_attention_set_rules: bool,
}

/// Outcome of [`Revision::set_review`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, i32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub reviewers: BTreeMap<String, ReviewerResult>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ready: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_info: Option<ChangeInfo>,
}

/// A Prolog rule to test against a revision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleInput {
    pub rule: String,
    /// `RUN` or `SKIP` the project's filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
}

/// Result of a submit rule evaluation.
///
/// The label sections (`ok`, `reject`, `need`, `may`, `impossible`) vary
/// between server versions and are kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitRecord {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(flatten)]
    pub labels: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptionInput {
    pub description: String,
}

/// Input for cherry-picking a revision onto another branch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CherryPickInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub notify_details: BTreeMap<String, NotifyInfo>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub keep_reviewers: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub allow_conflicts: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub allow_empty: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer_email: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub validation_options: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommitOptions {
    /// Include `web_links` in the result.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub links: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeableOptions {
    /// Also check mergeability into all other branches.
    #[serde(rename = "other-branches", skip_serializing_if = "std::ops::Not::not")]
    pub other_branches: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilesOptions {
    /// List all files whose path contains this substring.
    #[serde(rename = "q", skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// 1-based parent index for merge commits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ReviewedFilesOptions<'a> {
    #[serde(flatten)]
    files: &'a FilesOptions,
    reviewed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatchOptions {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub zip: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub download: bool,
    /// Limit the patch to a single file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiffOptions {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub intraline: bool,
    /// Patch set number to diff against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<u32>,
    #[serde(rename = "weblinks-only", skip_serializing_if = "std::ops::Not::not")]
    pub weblinks_only: bool,
    /// `NONE`, `TRAILING`, `CHANGED` or `ALL`.
    #[serde(rename = "ignore-whitespace", skip_serializing_if = "Option::is_none")]
    pub ignore_whitespace: Option<String>,
    /// `ALL` or a number of lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Operations on one patch set of a change.
#[derive(Debug, Clone)]
pub struct Revision<'a> {
    change: &'a Change,
    id: String,
    path: String,
}

impl<'a> Revision<'a> {
    pub(super) fn new(change: &'a Change, id: &str) -> Self {
        Self {
            change,
            id: id.to_string(),
            path: change.endpoint(&format!("revisions/{}", escape(id))),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn endpoint(&self, suffix: &str) -> String {
        format!("{}/{}", self.path, suffix)
    }

    fn file_endpoint(&self, file: &str, suffix: &str) -> String {
        format!("{}/files/{}/{}", self.path, escape(file), suffix)
    }

    async fn get<T>(&self, endpoint: &str, payload: Payload<'_>) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        self.change
            .client()
            .requester()
            .call_json(Method::GET, endpoint, payload)
            .await
    }

    async fn get_or_default<T>(&self, endpoint: &str, payload: Payload<'_>) -> Result<T>
    where
        T: DeserializeOwned + Default + Send,
    {
        Ok(self
            .change
            .client()
            .requester()
            .call_json_opt(Method::GET, endpoint, payload)
            .await?
            .unwrap_or_default())
    }

    async fn post<T>(&self, endpoint: &str, payload: Payload<'_>) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        self.change
            .client()
            .requester()
            .call_json(Method::POST, endpoint, payload)
            .await
    }

    async fn send(&self, method: Method, endpoint: &str) -> Result<()> {
        self.change
            .client()
            .requester()
            .call_empty(method, endpoint, Payload::Empty)
            .await?;
        Ok(())
    }

    pub async fn commit(&self, options: &CommitOptions) -> Result<CommitInfo> {
        self.get(&self.endpoint("commit"), Payload::json(options)).await
    }

    pub async fn description(&self) -> Result<Option<String>> {
        let text = self
            .change
            .client()
            .requester()
            .call_text(Method::GET, &self.endpoint("description"), Payload::Empty)
            .await?;
        Ok(non_empty(text))
    }

    pub async fn set_description(&self, input: &DescriptionInput) -> Result<Option<String>> {
        let text = self
            .change
            .client()
            .requester()
            .call_text(Method::PUT, &self.endpoint("description"), Payload::json(input))
            .await?;
        Ok(non_empty(text))
    }

    /// Commits a merge revision brings in.
    pub async fn mergelist(&self) -> Result<Vec<CommitInfo>> {
        self.get_or_default(&self.endpoint("mergelist"), Payload::Empty)
            .await
    }

    pub async fn actions(&self) -> Result<BTreeMap<String, ActionInfo>> {
        self.get_or_default(&self.endpoint("actions"), Payload::Empty)
            .await
    }

    /// The change with detailed labels and reviewers for this revision.
    pub async fn review(&self) -> Result<ChangeInfo> {
        self.get(&self.endpoint("review"), Payload::Empty).await
    }

    pub async fn set_review(&self, input: &ReviewInput) -> Result<ReviewResult> {
        self.post(&self.endpoint("review"), Payload::json(input))
            .await
    }

    pub async fn related(&self) -> Result<RelatedChangesInfo> {
        self.get(&self.endpoint("related"), Payload::Empty).await
    }

    pub async fn rebase(&self, input: &RebaseInput) -> Result<ChangeInfo> {
        self.post(&self.endpoint("rebase"), Payload::json(input))
            .await
    }

    pub async fn submit(&self) -> Result<ChangeInfo> {
        self.post(&self.endpoint("submit"), Payload::Empty).await
    }

    /// Streams the base64 encoded patch (or a zip with `options.zip`) into `sink`.
    pub async fn patch<W>(&self, options: &PatchOptions, sink: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        self.change
            .client()
            .requester()
            .call_stream(Method::GET, &self.endpoint("patch"), Payload::json(options), sink)
            .await?;
        Ok(())
    }

    pub async fn mergeable(&self, options: &MergeableOptions) -> Result<MergeableInfo> {
        self.get(&self.endpoint("mergeable"), Payload::json(options))
            .await
    }

    pub async fn submit_type(&self) -> Result<String> {
        self.change
            .client()
            .requester()
            .call_text(Method::GET, &self.endpoint("submit_type"), Payload::Empty)
            .await
    }

    pub async fn test_submit_type(&self, input: &RuleInput) -> Result<String> {
        self.change
            .client()
            .requester()
            .call_text(Method::POST, &self.endpoint("test.submit_type"), Payload::json(input))
            .await
    }

    pub async fn test_submit_rule(&self, input: &RuleInput) -> Result<Vec<SubmitRecord>> {
        self.post(&self.endpoint("test.submit_rule"), Payload::json(input))
            .await
    }

    /// Draft comments of the caller, keyed by file path.
    pub async fn drafts(&self) -> Result<BTreeMap<String, Vec<CommentInfo>>> {
        self.get_or_default(&self.endpoint("drafts/"), Payload::Empty)
            .await
    }

    pub async fn create_draft(&self, input: &CommentInput) -> Result<CommentInfo> {
        self.change
            .client()
            .requester()
            .call_json(Method::PUT, &self.endpoint("drafts"), Payload::json(input))
            .await
    }

    pub async fn draft(&self, draft_id: &str) -> Result<CommentInfo> {
        self.get(&self.endpoint(&format!("drafts/{}", escape(draft_id))), Payload::Empty)
            .await
    }

    pub async fn update_draft(&self, draft_id: &str, input: &CommentInput) -> Result<CommentInfo> {
        self.change
            .client()
            .requester()
            .call_json(
                Method::PUT,
                &self.endpoint(&format!("drafts/{}", escape(draft_id))),
                Payload::json(input),
            )
            .await
    }

    pub async fn delete_draft(&self, draft_id: &str) -> Result<()> {
        self.send(
            Method::DELETE,
            &self.endpoint(&format!("drafts/{}", escape(draft_id))),
        )
        .await
    }

    /// Published comments, keyed by file path.
    pub async fn comments(&self) -> Result<BTreeMap<String, Vec<CommentInfo>>> {
        self.get_or_default(&self.endpoint("comments/"), Payload::Empty)
            .await
    }

    pub async fn comment(&self, comment_id: &str) -> Result<CommentInfo> {
        self.get(&self.endpoint(&format!("comments/{}", escape(comment_id))), Payload::Empty)
            .await
    }

    /// Replaces a published comment's text with a deletion notice.
    pub async fn delete_comment(
        &self,
        comment_id: &str,
        input: &DeleteCommentInput,
    ) -> Result<CommentInfo> {
        self.post(
            &self.endpoint(&format!("comments/{}/delete", escape(comment_id))),
            Payload::json(input),
        )
        .await
    }

    pub async fn robot_comments(&self) -> Result<BTreeMap<String, Vec<RobotCommentInfo>>> {
        self.get_or_default(&self.endpoint("robotcomments/"), Payload::Empty)
            .await
    }

    pub async fn robot_comment(&self, comment_id: &str) -> Result<RobotCommentInfo> {
        self.get(
            &self.endpoint(&format!("robotcomments/{}", escape(comment_id))),
            Payload::Empty,
        )
        .await
    }

    /// Files of the revision, keyed by path (`/COMMIT_MSG` included).
    pub async fn files(&self, options: &FilesOptions) -> Result<BTreeMap<String, FileInfo>> {
        self.get_or_default(&self.endpoint("files/"), Payload::json(options))
            .await
    }

    /// Base64 encoded content of `file`.
    pub async fn file_content(&self, file: &str) -> Result<String> {
        self.change
            .client()
            .requester()
            .call_text(Method::GET, &self.file_endpoint(file, "content"), Payload::Empty)
            .await
    }

    /// Content type of `file`, from a `HEAD` request.
    pub async fn file_content_type(&self, file: &str) -> Result<Option<String>> {
        let info = self
            .change
            .client()
            .requester()
            .call_empty(Method::HEAD, &self.file_endpoint(file, "content"), Payload::Empty)
            .await?;
        Ok(info.content_type().map(str::to_string))
    }

    /// Streams the raw content of `file` into `sink`.
    pub async fn download_file<W>(&self, file: &str, sink: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        self.change
            .client()
            .requester()
            .call_stream(Method::GET, &self.file_endpoint(file, "download"), Payload::Empty, sink)
            .await?;
        Ok(())
    }

    pub async fn file_diff(&self, file: &str, options: &DiffOptions) -> Result<DiffInfo> {
        self.get(&self.file_endpoint(file, "diff"), Payload::json(options))
            .await
    }

    pub async fn blame(&self, file: &str) -> Result<Vec<BlameInfo>> {
        self.get_or_default(&self.file_endpoint(file, "blame"), Payload::Empty)
            .await
    }

    /// Paths the caller marked as reviewed.
    pub async fn reviewed_files(&self, options: &FilesOptions) -> Result<Vec<String>> {
        let query = ReviewedFilesOptions {
            files: options,
            reviewed: true,
        };
        self.get_or_default(&self.endpoint("files/"), Payload::json(&query))
            .await
    }

    pub async fn mark_reviewed(&self, file: &str) -> Result<()> {
        self.send(Method::PUT, &self.file_endpoint(file, "reviewed"))
            .await
    }

    pub async fn unmark_reviewed(&self, file: &str) -> Result<()> {
        self.send(Method::DELETE, &self.file_endpoint(file, "reviewed"))
            .await
    }

    pub async fn cherry_pick(&self, input: &CherryPickInput) -> Result<ChangeInfo> {
        self.post(&self.endpoint("cherrypick"), Payload::json(input))
            .await
    }
}
