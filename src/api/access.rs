//
//  gerrit-cli
//  api/access.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Access rights of projects (`access/`).

use std::collections::BTreeMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::client::GerritClient;
use super::common::{Payload, Result};
use super::groups::GroupInfo;
use super::projects::ProjectInfo;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionRuleInfo {
    /// `ALLOW`, `DENY`, `BLOCK`, `INTERACTIVE` or `BATCH`.
    pub action: String,
    #[serde(default)]
    pub force: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub exclusive: bool,
    /// Group UUID to rule.
    #[serde(default)]
    pub rules: BTreeMap<String, PermissionRuleInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessSectionInfo {
    #[serde(default)]
    pub permissions: BTreeMap<String, PermissionInfo>,
}

/// Access rights of one project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectAccessInfo {
    pub revision: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits_from: Option<ProjectInfo>,
    /// Ref pattern to access section.
    #[serde(default)]
    pub local: BTreeMap<String, AccessSectionInfo>,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner_of: Vec<String>,
    #[serde(default)]
    pub can_upload: bool,
    #[serde(default)]
    pub can_add: bool,
    #[serde(default)]
    pub can_add_tags: bool,
    #[serde(default)]
    pub config_visible: bool,
    /// Group UUID to group, for every group the rules mention.
    #[serde(default)]
    pub groups: BTreeMap<String, GroupInfo>,
    #[serde(rename = "configWebLinks", default, skip_serializing_if = "Vec::is_empty")]
    pub config_web_links: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ListAccessOptions<'a> {
    project: Vec<&'a str>,
}

/// Access-rights listing reachable from a [`GerritClient`].
#[derive(Debug, Clone, Copy)]
pub struct Access<'a> {
    client: &'a GerritClient,
}

impl GerritClient {
    pub fn access(&self) -> Access<'_> {
        Access { client: self }
    }
}

impl Access<'_> {
    /// Access rights of `projects`, keyed by project name.
    pub async fn list<S: AsRef<str>>(
        &self,
        projects: &[S],
    ) -> Result<BTreeMap<String, ProjectAccessInfo>> {
        let options = ListAccessOptions {
            project: projects.iter().map(AsRef::as_ref).collect(),
        };
        Ok(self
            .client
            .requester()
            .call_json_opt(Method::GET, "access/", Payload::json(&options))
            .await?
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    #[tokio::test]
    async fn test_list_repeats_project_parameter() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/access/")
            .match_query(Matcher::Regex("^project=MyProject&project=All-Projects$".into()))
            .with_body(
                r#")]}'
{"MyProject":{"revision":"61157ed63e14d261b6dca40650472a9b0bd88474","inherits_from":{"id":"All-Projects","name":"All-Projects","description":"Access inherited by all other projects."},"local":{"refs/*":{"permissions":{"read":{"rules":{"c2ce4749a32ceb82cd6adcce65b8216e12afb41c":{"action":"ALLOW","force":false}}}}}},"is_owner":true,"owner_of":["refs/*"],"can_upload":true,"can_add":true,"can_add_tags":true,"config_visible":true,"groups":{"c2ce4749a32ceb82cd6adcce65b8216e12afb41c":{"id":"c2ce4749a32ceb82cd6adcce65b8216e12afb41c","name":"Registered Users","options":{}}}},"All-Projects":{"revision":"edd453d18e08640e67a8c9a150cec998ed0ac9aa","local":{}}}"#,
            )
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let access = client
            .access()
            .list(&["MyProject", "All-Projects"])
            .await
            .unwrap();
        let mine = &access["MyProject"];
        assert!(mine.is_owner);
        assert_eq!(
            mine.local["refs/*"].permissions["read"].rules["c2ce4749a32ceb82cd6adcce65b8216e12afb41c"].action,
            "ALLOW"
        );
        assert!(access["All-Projects"].inherits_from.is_none());
    }
}
