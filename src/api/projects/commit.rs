//
//  gerrit-cli
//  api/projects/commit.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Commit endpoints (`projects/{project}/commits/{commit}`).
//!
//! The commit id is a SHA-1 and is used in paths as-is.

use std::collections::BTreeMap;

use reqwest::Method;

use super::Project;
use crate::api::changes::{FileInfo, IncludedInInfo};
use crate::api::client::GerritClient;
use crate::api::common::{escape, CommitInfo, Payload, Result};

/// Handle on a commit of a project.
#[derive(Debug, Clone)]
pub struct Commit {
    client: GerritClient,
    id: String,
    path: String,
    raw: Option<CommitInfo>,
}

impl Commit {
    pub(super) fn new(project: &Project, id: &str) -> Self {
        Self {
            client: project.client().clone(),
            id: id.to_string(),
            path: project.endpoint(&format!("commits/{id}")),
            raw: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn raw(&self) -> Option<&CommitInfo> {
        self.raw.as_ref()
    }

    pub async fn poll(&mut self) -> Result<&CommitInfo> {
        let info: CommitInfo = self
            .client
            .requester()
            .call_json(Method::GET, &self.path, Payload::Empty)
            .await?;
        Ok(&*self.raw.insert(info))
    }

    /// Branches and tags containing the commit.
    pub async fn included_in(&self) -> Result<IncludedInInfo> {
        self.client
            .requester()
            .call_json(Method::GET, &format!("{}/in", self.path), Payload::Empty)
            .await
    }

    /// Base64 encoded content of `file` at this commit.
    pub async fn file_content(&self, file: &str) -> Result<String> {
        let endpoint = format!("{}/files/{}/content", self.path, escape(file));
        self.client
            .requester()
            .call_text(Method::GET, &endpoint, Payload::Empty)
            .await
    }

    /// Files modified by the commit, keyed by path.
    pub async fn files(&self) -> Result<BTreeMap<String, FileInfo>> {
        self.client
            .requester()
            .call_json(Method::GET, &format!("{}/files/", self.path), Payload::Empty)
            .await
    }
}
