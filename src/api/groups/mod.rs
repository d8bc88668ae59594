//
//  gerrit-cli
//  api/groups/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Group API
//!
//! Operations on `groups/{id}`, where `id` is the group UUID, the legacy
//! numeric id or, for groups visible to the caller, the group name.
//!
//! Creating a group is two-phase: [`Groups::pending`] names the group,
//! [`PendingGroup::create`] creates it and hands back a [`Group`] keyed by
//! the UUID the server assigned.

use std::collections::BTreeMap;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::accounts::AccountInfo;
use super::client::GerritClient;
use super::common::{escape, non_empty, Payload, Result, Timestamp};

mod member;
mod subgroup;

pub use member::*;
pub use subgroup::*;

/// Minimal group reference, as used in reviewer suggestions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupBaseInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupOptionsInfo {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub visible_to_all: bool,
}

pub type GroupOptionsInput = GroupOptionsInfo;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub options: GroupOptionsInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<Timestamp>,
    #[serde(rename = "_more_groups", default, skip_serializing_if = "std::ops::Not::not")]
    pub more_groups: bool,
    /// Only filled with the `MEMBERS` option or by [`Group::detail`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<AccountInfo>,
    /// Only filled with the `INCLUDES` option or by [`Group::detail`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<GroupInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub visible_to_all: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupNameInput {
    pub name: String,
}

/// An empty description deletes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupDescriptionInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupOwnerInput {
    /// Name or UUID of the owner group.
    pub owner: String,
}

/// Who was added to or removed from a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupAuditMember {
    Group(GroupInfo),
    Account(AccountInfo),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAuditEventInfo {
    /// `ADD_USER`, `REMOVE_USER`, `ADD_GROUP` or `REMOVE_GROUP`.
    #[serde(rename = "type")]
    pub event_type: String,
    pub member: GroupAuditMember,
    pub user: AccountInfo,
    pub date: Timestamp,
}

/// Query parameters for [`Groups::list`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListGroupOptions {
    /// `INCLUDES` and/or `MEMBERS`.
    #[serde(rename = "o", skip_serializing_if = "Vec::is_empty")]
    pub additional_fields: Vec<String>,
    /// Only groups the caller owns.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub owned: bool,
    /// Only groups this account is a member of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Check visibility of these groups.
    #[serde(rename = "q", skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    #[serde(rename = "n", skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(rename = "S", skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(rename = "m", skip_serializing_if = "Option::is_none")]
    pub substring: Option<String>,
    #[serde(rename = "r", skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

/// Group operations reachable from a [`GerritClient`].
#[derive(Debug, Clone, Copy)]
pub struct Groups<'a> {
    client: &'a GerritClient,
}

impl GerritClient {
    /// Group operations.
    pub fn groups(&self) -> Groups<'_> {
        Groups { client: self }
    }
}

impl Groups<'_> {
    /// Groups visible to the caller, keyed by name.
    pub async fn list(&self, options: &ListGroupOptions) -> Result<BTreeMap<String, GroupInfo>> {
        Ok(self
            .client
            .requester()
            .call_json_opt(Method::GET, "groups/", Payload::json(options))
            .await?
            .unwrap_or_default())
    }

    /// A handle on `id` without fetching it.
    pub fn group(&self, id: &str) -> Group {
        Group::new(self.client.clone(), id)
    }

    pub async fn get(&self, id: &str) -> Result<Group> {
        let mut group = self.group(id);
        group.poll().await?;
        Ok(group)
    }

    /// A group that does not exist yet. See [`PendingGroup::create`].
    pub fn pending(&self, name: &str) -> PendingGroup {
        PendingGroup {
            client: self.client.clone(),
            name: name.to_string(),
        }
    }
}

/// A group about to be created under `name`.
#[derive(Debug, Clone)]
pub struct PendingGroup {
    client: GerritClient,
    name: String,
}

impl PendingGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates the group and returns a handle keyed by its UUID.
    pub async fn create(self, input: &GroupInput) -> Result<Group> {
        let path = format!("groups/{}", escape(&self.name));
        let info: GroupInfo = self
            .client
            .requester()
            .call_json(Method::PUT, &path, Payload::json(input))
            .await?;
        debug!(name = %self.name, id = %info.id, "group created");

        let mut group = Group::new(self.client, &info.id);
        group.raw = Some(info);
        Ok(group)
    }
}

/// Handle on a single group.
#[derive(Debug, Clone)]
pub struct Group {
    client: GerritClient,
    id: String,
    path: String,
    raw: Option<GroupInfo>,
}

impl Group {
    fn new(client: GerritClient, id: &str) -> Self {
        Self {
            client,
            id: id.to_string(),
            path: format!("groups/{}", escape(id)),
            raw: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn raw(&self) -> Option<&GroupInfo> {
        self.raw.as_ref()
    }

    pub(crate) fn client(&self) -> &GerritClient {
        &self.client
    }

    pub(crate) fn endpoint(&self, suffix: &str) -> String {
        format!("{}/{}", self.path, suffix)
    }

    async fn call<T>(&self, method: Method, suffix: &str, payload: Payload<'_>) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        self.client
            .requester()
            .call_json(method, &self.endpoint(suffix), payload)
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

    pub async fn poll(&mut self) -> Result<&GroupInfo> {
        let info: GroupInfo = self
            .client
            .requester()
            .call_json(Method::GET, &self.path, Payload::Empty)
            .await?;
        Ok(&*self.raw.insert(info))
    }

    /// The group with its direct members and subgroups.
    pub async fn detail(&self) -> Result<GroupInfo> {
        self.call(Method::GET, "detail", Payload::Empty).await
    }

    pub async fn name(&self) -> Result<Option<String>> {
        self.text(Method::GET, "name", Payload::Empty).await
    }

    /// Renames the group and returns the new name.
    pub async fn rename(&self, input: &GroupNameInput) -> Result<Option<String>> {
        self.text(Method::PUT, "name", Payload::json(input)).await
    }

    pub async fn description(&self) -> Result<Option<String>> {
        self.text(Method::GET, "description", Payload::Empty).await
    }

    pub async fn set_description(&self, input: &GroupDescriptionInput) -> Result<Option<String>> {
        self.text(Method::PUT, "description", Payload::json(input))
            .await
    }

    pub async fn delete_description(&self) -> Result<()> {
        self.client
            .requester()
            .call_empty(Method::DELETE, &self.endpoint("description"), Payload::Empty)
            .await?;
        Ok(())
    }

    pub async fn options(&self) -> Result<GroupOptionsInfo> {
        self.call(Method::GET, "options", Payload::Empty).await
    }

    pub async fn set_options(&self, input: &GroupOptionsInput) -> Result<GroupOptionsInfo> {
        self.call(Method::PUT, "options", Payload::json(input)).await
    }

    /// The owner group.
    pub async fn owner(&self) -> Result<GroupInfo> {
        self.call(Method::GET, "owner", Payload::Empty).await
    }

    pub async fn set_owner(&self, input: &GroupOwnerInput) -> Result<GroupInfo> {
        self.call(Method::PUT, "owner", Payload::json(input)).await
    }

    pub async fn audit_log(&self) -> Result<Vec<GroupAuditEventInfo>> {
        Ok(self
            .client
            .requester()
            .call_json_opt(Method::GET, &self.endpoint("log.audit"), Payload::Empty)
            .await?
            .unwrap_or_default())
    }

    pub fn members(&self) -> Members<'_> {
        Members::new(self)
    }

    pub fn subgroups(&self) -> Subgroups<'_> {
        Subgroups::new(self)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    #[tokio::test]
    async fn test_list_groups_keyed_by_name() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/groups/")
            .match_query(Matcher::UrlEncoded("owned".into(), "true".into()))
            .with_body(
                r##")]}'
{"Administrators":{"id":"6a1e70e1a88782771a91808c8af9bbb7a9871389","url":"#/admin/groups/uuid-6a1e70e1a88782771a91808c8af9bbb7a9871389","options":{},"description":"Gerrit Site Administrators","group_id":1,"owner":"Administrators","owner_id":"6a1e70e1a88782771a91808c8af9bbb7a9871389","created_on":"2013-02-01 09:59:32.126000000"}}"##,
            )
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let groups = client
            .groups()
            .list(&ListGroupOptions {
                owned: true,
                ..Default::default()
            })
            .await
            .unwrap();
        let admins = &groups["Administrators"];
        assert_eq!(admins.group_id, Some(1));
        assert!(!admins.options.visible_to_all);
    }

    #[tokio::test]
    async fn test_pending_group_binds_to_uuid() {
        let mut server = mockito::Server::new_async().await;
        let create = server
            .mock("PUT", "/groups/My%20Group")
            .match_body(Matcher::Json(
                serde_json::json!({"description": "contains all committers", "visible_to_all": true}),
            ))
            .with_status(201)
            .with_body(
                ")]}'\n{\"id\":\"6a1e70e1a88782771a91808c8af9bbb7a9871389\",\"name\":\"My Group\",\"options\":{\"visible_to_all\":true},\"group_id\":551}",
            )
            .create_async()
            .await;
        let options = server
            .mock("GET", "/groups/6a1e70e1a88782771a91808c8af9bbb7a9871389/options")
            .with_body(")]}'\n{\"visible_to_all\":true}")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let group = client
            .groups()
            .pending("My Group")
            .create(&GroupInput {
                description: Some("contains all committers".into()),
                visible_to_all: true,
                ..Default::default()
            })
            .await
            .unwrap();
        create.assert_async().await;
        assert_eq!(group.id(), "6a1e70e1a88782771a91808c8af9bbb7a9871389");
        assert_eq!(group.raw().unwrap().name.as_deref(), Some("My Group"));

        assert!(group.options().await.unwrap().visible_to_all);
        options.assert_async().await;
    }

    #[tokio::test]
    async fn test_audit_log_members() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/groups/9999/log.audit")
            .with_body(
                r#")]}'
[{"member":{"id":"59b9c1f6f78ec1d7cc0de5a3abbb3ddb2e83d34c","name":"Lucky"},"type":"ADD_GROUP","user":{"_account_id":1000096},"date":"2015-07-03 09:22:51.000000000"},{"member":{"_account_id":1000097,"name":"Jane Roe"},"type":"ADD_USER","user":{"_account_id":1000096},"date":"2015-07-01 13:22:42.000000000"}]"#,
            )
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let log = client.groups().group("9999").audit_log().await.unwrap();
        assert!(matches!(&log[0].member, GroupAuditMember::Group(g) if g.name.as_deref() == Some("Lucky")));
        assert!(matches!(&log[1].member, GroupAuditMember::Account(a) if a.account_id == Some(1000097)));
        assert_eq!(log[1].event_type, "ADD_USER");
    }
}
