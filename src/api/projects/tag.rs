//
//  gerrit-cli
//  api/projects/tag.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Tag endpoints (`projects/{project}/tags/{tag}`).

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::Project;
use crate::api::client::GerritClient;
use crate::api::common::{escape, GitPersonInfo, Payload, Result, Timestamp, WebLinkInfo};

/// A tag of a project. Annotated tags carry `object`, `message` and `tagger`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagInfo {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub revision: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagger: Option<GitPersonInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
    #[serde(default)]
    pub can_delete: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_links: Vec<WebLinkInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// Setting a message creates an annotated tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteTagsInput {
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TagOptions {
    #[serde(rename = "n", skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(rename = "S", skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(rename = "m", skip_serializing_if = "Option::is_none")]
    pub substring: Option<String>,
    #[serde(rename = "r", skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

/// Tag operations on one project.
#[derive(Debug, Clone, Copy)]
pub struct Tags<'a> {
    project: &'a Project,
}

impl<'a> Tags<'a> {
    pub(super) fn new(project: &'a Project) -> Self {
        Self { project }
    }

    pub async fn list(&self, options: &TagOptions) -> Result<Vec<TagInfo>> {
        Ok(self
            .project
            .client()
            .requester()
            .call_json_opt(Method::GET, &self.project.endpoint("tags/"), Payload::json(options))
            .await?
            .unwrap_or_default())
    }

    pub fn tag(&self, name: &str) -> Tag {
        Tag {
            client: self.project.client().clone(),
            name: name.to_string(),
            path: self.project.endpoint(&format!("tags/{}", escape(name))),
            raw: None,
        }
    }

    pub async fn get(&self, name: &str) -> Result<Tag> {
        let mut tag = self.tag(name);
        tag.poll().await?;
        Ok(tag)
    }

    pub async fn create(&self, name: &str, input: &TagInput) -> Result<Tag> {
        let mut tag = self.tag(name);
        self.project
            .client()
            .requester()
            .call_empty(Method::PUT, &tag.path, Payload::json(input))
            .await?;
        tag.poll().await?;
        Ok(tag)
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        self.tag(name).delete().await
    }

    /// Deletes several tags at once (`POST tags:delete`).
    pub async fn bulk_delete(&self, input: &DeleteTagsInput) -> Result<()> {
        self.project
            .client()
            .requester()
            .call_empty(
                Method::POST,
                &self.project.endpoint("tags:delete"),
                Payload::json(input),
            )
            .await?;
        Ok(())
    }
}

/// Handle on a single tag.
#[derive(Debug, Clone)]
pub struct Tag {
    client: GerritClient,
    name: String,
    path: String,
    raw: Option<TagInfo>,
}

impl Tag {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raw(&self) -> Option<&TagInfo> {
        self.raw.as_ref()
    }

    pub async fn poll(&mut self) -> Result<&TagInfo> {
        let info: TagInfo = self
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_annotated_tag() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/projects/demo/tags/v1.0")
            .with_body(
                r#")]}'
{"ref":"refs/tags/v1.0","revision":"49ce77fdcfd3398dc0dedbe016d1a425fd52d666","object":"1624f5af8ae89148d1a3730df8c290413e3dcf30","message":"Annotated tag","tagger":{"name":"David Pursehouse","email":"david.pursehouse@sonymobile.com","date":"2014-10-06 07:35:03.000000000","tz":540}}"#,
            )
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let tag = client
            .projects()
            .project("demo")
            .tags()
            .get("v1.0")
            .await
            .unwrap();
        let raw = tag.raw().unwrap();
        assert_eq!(raw.reference, "refs/tags/v1.0");
        assert_eq!(raw.message.as_deref(), Some("Annotated tag"));
        assert_eq!(raw.tagger.as_ref().unwrap().tz, 540);
        assert!(!raw.can_delete);
    }

    #[tokio::test]
    async fn test_empty_tag_list() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/projects/demo/tags/")
            .with_body(")]}'\n[]")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let tags = client
            .projects()
            .project("demo")
            .tags()
            .list(&TagOptions::default())
            .await
            .unwrap();
        assert!(tags.is_empty());
    }
}
