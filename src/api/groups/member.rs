//
//  gerrit-cli
//  api/groups/member.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::Group;
use crate::api::accounts::AccountInfo;
use crate::api::common::{escape, Payload, Result};

/// Accounts to add or remove in one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MembersInput {
    #[serde(rename = "_one_member", default, skip_serializing_if = "Option::is_none")]
    pub one_member: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
struct ListMembersOptions {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    recursive: bool,
}

/// Direct (or, with `recursive`, transitive) members of a group.
#[derive(Debug, Clone, Copy)]
pub struct Members<'a> {
    group: &'a Group,
}

impl<'a> Members<'a> {
    pub(super) fn new(group: &'a Group) -> Self {
        Self { group }
    }

    fn member_endpoint(&self, account_id: &str) -> String {
        self.group.endpoint(&format!("members/{}", escape(account_id)))
    }

    pub async fn list(&self, recursive: bool) -> Result<Vec<AccountInfo>> {
        Ok(self
            .group
            .client()
            .requester()
            .call_json_opt(
                Method::GET,
                &self.group.endpoint("members/"),
                Payload::json(&ListMembersOptions { recursive }),
            )
            .await?
            .unwrap_or_default())
    }

    pub async fn get(&self, account_id: &str) -> Result<AccountInfo> {
        self.group
            .client()
            .requester()
            .call_json(Method::GET, &self.member_endpoint(account_id), Payload::Empty)
            .await
    }

    pub async fn add(&self, account_id: &str) -> Result<AccountInfo> {
        self.group
            .client()
            .requester()
            .call_json(Method::PUT, &self.member_endpoint(account_id), Payload::Empty)
            .await
    }

    pub async fn add_many(&self, input: &MembersInput) -> Result<Vec<AccountInfo>> {
        Ok(self
            .group
            .client()
            .requester()
            .call_json_opt(Method::POST, &self.group.endpoint("members.add"), Payload::json(input))
            .await?
            .unwrap_or_default())
    }

    pub async fn remove(&self, account_id: &str) -> Result<()> {
        self.group
            .client()
            .requester()
            .call_empty(Method::DELETE, &self.member_endpoint(account_id), Payload::Empty)
            .await?;
        Ok(())
    }

    pub async fn remove_many(&self, input: &MembersInput) -> Result<()> {
        self.group
            .client()
            .requester()
            .call_empty(
                Method::POST,
                &self.group.endpoint("members.delete"),
                Payload::json(input),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use crate::api::client::GerritClient;

    #[tokio::test]
    async fn test_recursive_member_list() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/groups/834ec36dd5e0ed21a2ff5d7e2255da082d63bbd7/members/")
            .match_query(Matcher::UrlEncoded("recursive".into(), "true".into()))
            .with_body(
                ")]}'\n[{\"_account_id\":1000097,\"name\":\"Jane Roe\"},{\"_account_id\":1000096,\"name\":\"John Doe\"}]",
            )
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let group = client.groups().group("834ec36dd5e0ed21a2ff5d7e2255da082d63bbd7");
        let members = group.members().list(true).await.unwrap();
        assert_eq!(members.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_many_posts_delete_form() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("POST", "/groups/MyProject-Committers/members.delete")
            .match_body(Matcher::Json(
                serde_json::json!({"members": ["jane.roe@example.com", "john.doe@example.com"]}),
            ))
            .with_status(204)
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let group = client.groups().group("MyProject-Committers");
        group
            .members()
            .remove_many(&super::MembersInput {
                members: vec!["jane.roe@example.com".into(), "john.doe@example.com".into()],
                ..Default::default()
            })
            .await
            .unwrap();
        m.assert_async().await;
    }
}
