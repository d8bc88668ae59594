//
//  gerrit-cli
//  api/changes/edit.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Change edits: a per-user, per-change scratch revision (`changes/{id}/edit`).

use std::collections::BTreeMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{Change, FetchInfo, FileInfo, NotifyInfo};
use crate::api::common::{escape, non_empty, CommitInfo, Payload, Result, WebLinkInfo};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditInfo {
    pub commit: CommitInfo,
    #[serde(default)]
    pub base_patch_set_number: u32,
    #[serde(default)]
    pub base_revision: String,
    #[serde(rename = "ref", default)]
    pub reference: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fetch: BTreeMap<String, FetchInfo>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub files: BTreeMap<String, FileInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditFileInfo {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_links: Vec<WebLinkInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeEditDetailOptions {
    /// Include the file list.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub list: bool,
    /// Compute the file list against this revision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(rename = "download-commands", skip_serializing_if = "std::ops::Not::not")]
    pub download_commands: bool,
}

/// Restores a file to its state in the base revision, or renames one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeEditInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeEditMessageInput {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishChangeEditInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub notify_details: BTreeMap<String, NotifyInfo>,
}

/// The caller's edit of a change.
#[derive(Debug, Clone, Copy)]
pub struct ChangeEdit<'a> {
    change: &'a Change,
}

impl<'a> ChangeEdit<'a> {
    pub(super) fn new(change: &'a Change) -> Self {
        Self { change }
    }

    fn file_endpoint(&self, file: &str) -> String {
        self.change.endpoint(&format!("edit/{}", escape(file)))
    }

    async fn send(&self, method: Method, endpoint: &str, payload: Payload<'_>) -> Result<()> {
        self.change
            .client()
            .requester()
            .call_empty(method, endpoint, payload)
            .await?;
        Ok(())
    }

    /// The edit, or `None` when the caller has no edit on this change.
    pub async fn get(&self, options: &ChangeEditDetailOptions) -> Result<Option<EditInfo>> {
        self.change
            .client()
            .requester()
            .call_json_opt(Method::GET, &self.change.endpoint("edit"), Payload::json(options))
            .await
    }

    /// Replaces the content of `file`, creating the edit if needed.
    pub async fn put_file(&self, file: &str, content: &str) -> Result<()> {
        self.send(Method::PUT, &self.file_endpoint(file), Payload::text(content))
            .await
    }

    pub async fn restore_or_rename(&self, input: &ChangeEditInput) -> Result<()> {
        self.send(Method::POST, &self.change.endpoint("edit"), Payload::json(input))
            .await
    }

    /// Commit message of the edit, base64 encoded.
    pub async fn message(&self) -> Result<String> {
        self.change
            .client()
            .requester()
            .call_text(Method::GET, &self.change.endpoint("edit:message"), Payload::Empty)
            .await
    }

    pub async fn set_message(&self, input: &ChangeEditMessageInput) -> Result<()> {
        self.send(Method::PUT, &self.change.endpoint("edit:message"), Payload::json(input))
            .await
    }

    pub async fn delete_file(&self, file: &str) -> Result<()> {
        self.send(Method::DELETE, &self.file_endpoint(file), Payload::Empty)
            .await
    }

    /// Base64 encoded content of `file`; `None` when the edit does not exist.
    pub async fn file(&self, file: &str) -> Result<Option<String>> {
        let text = self
            .change
            .client()
            .requester()
            .call_text(Method::GET, &self.file_endpoint(file), Payload::Empty)
            .await?;
        Ok(non_empty(text))
    }

    pub async fn meta(&self, file: &str) -> Result<EditFileInfo> {
        self.change
            .client()
            .requester()
            .call_json(
                Method::GET,
                &format!("{}/meta", self.file_endpoint(file)),
                Payload::Empty,
            )
            .await
    }

    /// Turns the edit into a new patch set.
    pub async fn publish(&self, input: &PublishChangeEditInput) -> Result<()> {
        self.send(Method::POST, &self.change.endpoint("edit:publish"), Payload::json(input))
            .await
    }

    /// Rebases the edit onto the latest patch set.
    pub async fn rebase(&self) -> Result<()> {
        self.send(Method::POST, &self.change.endpoint("edit:rebase"), Payload::Empty)
            .await
    }

    pub async fn delete(&self) -> Result<()> {
        self.send(Method::DELETE, &self.change.endpoint("edit"), Payload::Empty)
            .await
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use crate::api::client::GerritClient;

    use super::*;

    #[tokio::test]
    async fn test_put_file_sends_plain_text() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("PUT", "/changes/12/edit/docs%2FREADME.md")
            .match_header("content-type", Matcher::Regex("^text/plain".into()))
            .match_body("# Hello\n")
            .with_status(204)
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let change = client.changes().change("12");
        change
            .edit()
            .put_file("docs/README.md", "# Hello\n")
            .await
            .unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_edit_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/changes/12/edit")
            .match_query(Matcher::UrlEncoded("list".into(), "true".into()))
            .with_status(204)
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let change = client.changes().change("12");
        let options = ChangeEditDetailOptions {
            list: true,
            ..Default::default()
        };
        assert!(change.edit().get(&options).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rename_and_publish() {
        let mut server = mockito::Server::new_async().await;
        let rename = server
            .mock("POST", "/changes/12/edit")
            .match_body(Matcher::Json(
                serde_json::json!({"old_path": "a.txt", "new_path": "b.txt"}),
            ))
            .with_status(204)
            .create_async()
            .await;
        let publish = server
            .mock("POST", "/changes/12/edit:publish")
            .match_body(Matcher::Json(serde_json::json!({"notify": "NONE"})))
            .with_status(204)
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let change = client.changes().change("12");
        let edit = change.edit();
        edit.restore_or_rename(&ChangeEditInput {
            old_path: Some("a.txt".into()),
            new_path: Some("b.txt".into()),
            ..Default::default()
        })
        .await
        .unwrap();
        edit.publish(&PublishChangeEditInput {
            notify: Some("NONE".into()),
            ..Default::default()
        })
        .await
        .unwrap();
        rename.assert_async().await;
        publish.assert_async().await;
    }
}
