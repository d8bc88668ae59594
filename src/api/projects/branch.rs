//
//  gerrit-cli
//  api/projects/branch.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Branch endpoints (`projects/{project}/branches/{branch}`).

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{Project, ReflogEntryInfo};
use crate::api::changes::MergeableInfo;
use crate::api::client::GerritClient;
use crate::api::common::{escape, Payload, Result, WebLinkInfo};

/// A branch of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchInfo {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub revision: String,
    #[serde(default)]
    pub can_delete: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_links: Vec<WebLinkInfo>,
}

/// Input for creating a branch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchInput {
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Base revision; defaults to `HEAD` on the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

/// Branches to delete in one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteBranchesInput {
    pub branches: Vec<String>,
}

/// Query options for [`Branches::list`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BranchOptions {
    #[serde(rename = "n", skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(rename = "S", skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(rename = "m", skip_serializing_if = "Option::is_none")]
    pub substring: Option<String>,
    #[serde(rename = "r", skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

/// Query options for [`Branch::mergeable`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeOptions {
    /// Anything resolving to a commit; always sent.
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_branch: Option<String>,
    /// `recursive`, `resolve`, `simple-two-way-in-core`, `ours` or `theirs`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub allow_conflicts: bool,
}

/// Branch operations on one project.
#[derive(Debug, Clone, Copy)]
pub struct Branches<'a> {
    project: &'a Project,
}

impl<'a> Branches<'a> {
    pub(super) fn new(project: &'a Project) -> Self {
        Self { project }
    }

    fn requester(&self) -> &crate::api::client::Requester {
        self.project.client().requester()
    }

    /// Lists the branches of the project.
    pub async fn list(&self, options: &BranchOptions) -> Result<Vec<BranchInfo>> {
        Ok(self
            .requester()
            .call_json_opt(Method::GET, &self.project.endpoint("branches/"), Payload::json(options))
            .await?
            .unwrap_or_default())
    }

    /// A handle on `name` without fetching it.
    pub fn branch(&self, name: &str) -> Branch {
        Branch::new(self.project.client().clone(), self.project, name)
    }

    /// Fetches a branch.
    pub async fn get(&self, name: &str) -> Result<Branch> {
        let mut branch = self.branch(name);
        branch.poll().await?;
        Ok(branch)
    }

    /// Creates a branch and fetches it.
    pub async fn create(&self, name: &str, input: &BranchInput) -> Result<Branch> {
        let mut branch = self.branch(name);
        self.requester()
            .call_empty(Method::PUT, &branch.path, Payload::json(input))
            .await?;
        branch.poll().await?;
        Ok(branch)
    }

    /// Deletes a branch.
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.branch(name).delete().await
    }

    /// Deletes several branches at once.
    ///
    /// Gerrit answers `409 Conflict` when some of them could not be deleted.
    pub async fn bulk_delete(&self, input: &DeleteBranchesInput) -> Result<()> {
        self.requester()
            .call_empty(
                Method::POST,
                &self.project.endpoint("branches:delete"),
                Payload::json(input),
            )
            .await?;
        Ok(())
    }
}

/// Handle on a single branch.
#[derive(Debug, Clone)]
pub struct Branch {
    client: GerritClient,
    name: String,
    path: String,
    raw: Option<BranchInfo>,
}

impl Branch {
    fn new(client: GerritClient, project: &Project, name: &str) -> Self {
        let path = project.endpoint(&format!("branches/{}", escape(name)));
        Self {
            client,
            name: name.to_string(),
            path,
            raw: None,
        }
    }

    /// The branch name as given by the caller.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raw(&self) -> Option<&BranchInfo> {
        self.raw.as_ref()
    }

    pub async fn poll(&mut self) -> Result<&BranchInfo> {
        let info: BranchInfo = self
            .client
            .requester()
            .call_json(Method::GET, &self.path, Payload::Empty)
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

    /// Base64 encoded content of `file` at the branch head.
    pub async fn file_content(&self, file: &str) -> Result<String> {
        let endpoint = format!("{}/files/{}/content", self.path, escape(file));
        self.client
            .requester()
            .call_text(Method::GET, &endpoint, Payload::Empty)
            .await
    }

    /// Whether `options.source` merges cleanly into this branch.
    pub async fn mergeable(&self, options: &MergeOptions) -> Result<MergeableInfo> {
        self.client
            .requester()
            .call_json(
                Method::GET,
                &format!("{}/mergeable", self.path),
                Payload::json(options),
            )
            .await
    }

    /// The branch reflog. Requires project ownership.
    pub async fn reflog(&self) -> Result<Vec<ReflogEntryInfo>> {
        self.client
            .requester()
            .call_json(Method::GET, &format!("{}/reflog", self.path), Payload::Empty)
            .await
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    #[tokio::test]
    async fn test_list_and_create_branch() {
        let mut server = mockito::Server::new_async().await;
        let _list = server
            .mock("GET", "/projects/demo/branches/")
            .match_query(Matcher::UrlEncoded("m".into(), "stable".into()))
            .with_body(
                ")]}'\n[{\"ref\":\"refs/heads/stable-1\",\"revision\":\"abc\",\"can_delete\":true}]",
            )
            .create_async()
            .await;
        let create = server
            .mock("PUT", "/projects/demo/branches/stable-2")
            .match_body(Matcher::Json(serde_json::json!({"revision": "abc"})))
            .with_status(201)
            .create_async()
            .await;
        let _get = server
            .mock("GET", "/projects/demo/branches/stable-2")
            .with_body(")]}'\n{\"ref\":\"refs/heads/stable-2\",\"revision\":\"abc\"}")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let project = client.projects().project("demo");
        let options = BranchOptions {
            substring: Some("stable".into()),
            ..Default::default()
        };
        let branches = project.branches().list(&options).await.unwrap();
        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0].reference, "refs/heads/stable-1");
        assert!(branches[0].can_delete);

        let input = BranchInput {
            revision: Some("abc".into()),
            ..Default::default()
        };
        let branch = project.branches().create("stable-2", &input).await.unwrap();
        create.assert_async().await;
        assert_eq!(branch.raw().unwrap().reference, "refs/heads/stable-2");
    }

    #[tokio::test]
    async fn test_bulk_delete_posts_input() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("POST", "/projects/demo/branches:delete")
            .match_body(Matcher::Json(
                serde_json::json!({"branches": ["stable-1", "stable-2"]}),
            ))
            .with_status(204)
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let input = DeleteBranchesInput {
            branches: vec!["stable-1".into(), "stable-2".into()],
        };
        client
            .projects()
            .project("demo")
            .branches()
            .bulk_delete(&input)
            .await
            .unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_branch_file_content_escapes_path() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/projects/demo/branches/refs%2Fheads%2Fmain/files/src%2Fmain.rs/content")
            .with_body("Zm4gbWFpbigpIHt9")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let project = client.projects().project("demo");
        let content = project
            .branches()
            .branch("refs/heads/main")
            .file_content("src/main.rs")
            .await
            .unwrap();
        assert_eq!(content, "Zm4gbWFpbigpIHt9");
    }
}
