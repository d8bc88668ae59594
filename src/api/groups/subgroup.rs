//
//  gerrit-cli
//  api/groups/subgroup.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{Group, GroupInfo};
use crate::api::common::{escape, Payload, Result};

/// Groups to include or exclude in one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupsInput {
    #[serde(rename = "_one_group", default, skip_serializing_if = "Option::is_none")]
    pub one_group: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
}

/// Groups included in a group.
#[derive(Debug, Clone, Copy)]
pub struct Subgroups<'a> {
    group: &'a Group,
}

impl<'a> Subgroups<'a> {
    pub(super) fn new(group: &'a Group) -> Self {
        Self { group }
    }

    fn subgroup_endpoint(&self, group_id: &str) -> String {
        self.group.endpoint(&format!("groups/{}", escape(group_id)))
    }

    pub async fn list(&self) -> Result<Vec<GroupInfo>> {
        Ok(self
            .group
            .client()
            .requester()
            .call_json_opt(Method::GET, &self.group.endpoint("groups/"), Payload::Empty)
            .await?
            .unwrap_or_default())
    }

    pub async fn get(&self, group_id: &str) -> Result<GroupInfo> {
        self.group
            .client()
            .requester()
            .call_json(Method::GET, &self.subgroup_endpoint(group_id), Payload::Empty)
            .await
    }

    pub async fn add(&self, group_id: &str) -> Result<GroupInfo> {
        self.group
            .client()
            .requester()
            .call_json(Method::PUT, &self.subgroup_endpoint(group_id), Payload::Empty)
            .await
    }

    pub async fn add_many(&self, input: &GroupsInput) -> Result<Vec<GroupInfo>> {
        Ok(self
            .group
            .client()
            .requester()
            .call_json_opt(Method::POST, &self.group.endpoint("groups.add"), Payload::json(input))
            .await?
            .unwrap_or_default())
    }

    pub async fn remove(&self, group_id: &str) -> Result<()> {
        self.group
            .client()
            .requester()
            .call_empty(Method::DELETE, &self.subgroup_endpoint(group_id), Payload::Empty)
            .await?;
        Ok(())
    }

    /// Removes several subgroups of this group (`POST groups.delete`).
    pub async fn remove_many(&self, input: &GroupsInput) -> Result<()> {
        self.group
            .client()
            .requester()
            .call_empty(
                Method::POST,
                &self.group.endpoint("groups.delete"),
                Payload::json(input),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;
    use crate::api::client::GerritClient;

    #[tokio::test]
    async fn test_remove_many_targets_own_group() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("POST", "/groups/MyProject-Verifiers/groups.delete")
            .match_body(Matcher::Json(serde_json::json!({"groups": ["MyGroup", "MyOtherGroup"]})))
            .with_status(204)
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let group = client.groups().group("MyProject-Verifiers");
        group
            .subgroups()
            .remove_many(&GroupsInput {
                groups: vec!["MyGroup".into(), "MyOtherGroup".into()],
                ..Default::default()
            })
            .await
            .unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_add_subgroup() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("PUT", "/groups/MyProject-Verifiers/groups/MyOtherGroup")
            .with_status(201)
            .with_body(")]}'\n{\"id\":\"5057f3cbd3c4bd9a1d7e2d7d4d4e3c9ab4d8a1c2\",\"name\":\"MyOtherGroup\",\"options\":{}}")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let group = client.groups().group("MyProject-Verifiers");
        let added = group.subgroups().add("MyOtherGroup").await.unwrap();
        assert_eq!(added.name.as_deref(), Some("MyOtherGroup"));
    }
}
