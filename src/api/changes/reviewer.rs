//
//  gerrit-cli
//  api/changes/reviewer.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Reviewer endpoints (`changes/{id}/reviewers/{account}`).

use std::collections::BTreeMap;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{Change, NotifyInfo};
use crate::api::accounts::AccountInfo;
use crate::api::common::{escape, Payload, Result};
use crate::api::groups::GroupBaseInfo;

/// A reviewer and their votes, label name to vote (`" 0"`, `"+2"`...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewerInfo {
    #[serde(flatten)]
    pub account: AccountInfo,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub approvals: BTreeMap<String, String>,
}

/// An account or a group that could be added as reviewer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestedReviewerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupBaseInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub confirm: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewerInput {
    /// Account id, email, username or group name.
    pub reviewer: String,
    /// `REVIEWER` (default) or `CC`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Confirms adding a large group.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub notify_details: BTreeMap<String, NotifyInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewerResult {
    #[serde(default)]
    pub input: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviewers: Vec<ReviewerInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ccs: Vec<AccountInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<AccountInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the reviewer is a large group and needs confirming.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub confirm: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteVoteInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub notify_details: BTreeMap<String, NotifyInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestReviewersOptions {
    #[serde(rename = "q")]
    pub query: String,
    #[serde(rename = "n", skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Reviewer operations on one change.
#[derive(Debug, Clone, Copy)]
pub struct Reviewers<'a> {
    change: &'a Change,
}

impl<'a> Reviewers<'a> {
    pub(super) fn new(change: &'a Change) -> Self {
        Self { change }
    }

    fn endpoint(&self, suffix: &str) -> String {
        self.change.endpoint(&format!("reviewers/{suffix}"))
    }

    async fn fetch<T>(&self, endpoint: &str, payload: Payload<'_>) -> Result<T>
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

    pub async fn list(&self) -> Result<Vec<ReviewerInfo>> {
        self.fetch(&self.endpoint(""), Payload::Empty).await
    }

    pub async fn suggest(
        &self,
        options: &SuggestReviewersOptions,
    ) -> Result<Vec<SuggestedReviewerInfo>> {
        self.fetch(
            &self.change.endpoint("suggest_reviewers"),
            Payload::json(options),
        )
        .await
    }

    pub async fn get(&self, account_id: &str) -> Result<Vec<ReviewerInfo>> {
        self.fetch(&self.endpoint(&escape(account_id)), Payload::Empty)
            .await
    }

    pub async fn add(&self, input: &ReviewerInput) -> Result<ReviewerResult> {
        self.change
            .client()
            .requester()
            .call_json(
                Method::POST,
                &self.change.endpoint("reviewers"),
                Payload::json(input),
            )
            .await
    }

    pub async fn delete(&self, account_id: &str) -> Result<()> {
        self.change
            .client()
            .requester()
            .call_empty(Method::DELETE, &self.endpoint(&escape(account_id)), Payload::Empty)
            .await?;
        Ok(())
    }

    /// Votes of a reviewer, label name to value.
    pub async fn votes(&self, account_id: &str) -> Result<BTreeMap<String, i32>> {
        self.fetch(
            &self.endpoint(&format!("{}/votes/", escape(account_id))),
            Payload::Empty,
        )
        .await
    }

    /// Removes a single vote. The reviewer stays on the change.
    pub async fn delete_vote(
        &self,
        account_id: &str,
        label: &str,
        input: Option<&DeleteVoteInput>,
    ) -> Result<()> {
        let endpoint = self.endpoint(&format!(
            "{}/votes/{}",
            escape(account_id),
            escape(label)
        ));
        self.change
            .client()
            .requester()
            .call_empty(Method::DELETE, &endpoint, Payload::optional(input))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use crate::api::client::GerritClient;

    use super::*;

    #[tokio::test]
    async fn test_list_reviewers_with_approvals() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/changes/5/reviewers/")
            .with_body(
                r#")]}'
[{"approvals":{"Verified":"+1","Code-Review":"+2"},"_account_id":1000096,"name":"John Doe","email":"john.doe@example.com"}]"#,
            )
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let change = client.changes().change("5");
        let reviewers = change.reviewers().list().await.unwrap();
        assert_eq!(reviewers.len(), 1);
        assert_eq!(reviewers[0].account.email.as_deref(), Some("john.doe@example.com"));
        assert_eq!(reviewers[0].approvals["Code-Review"], "+2");
    }

    #[tokio::test]
    async fn test_suggest_sends_query() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/changes/5/suggest_reviewers")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "J".into()),
                Matcher::UrlEncoded("n".into(), "5".into()),
            ]))
            .with_body(
                r#")]}'
[{"account":{"_account_id":1000097,"name":"Jane Roe"}},{"group":{"id":"4fd581c0657268f2bdcc26699fbf9ddb76e3a279","name":"Joiner"},"count":5}]"#,
            )
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let change = client.changes().change("5");
        let suggestions = change
            .reviewers()
            .suggest(&SuggestReviewersOptions {
                query: "J".into(),
                limit: Some(5),
            })
            .await
            .unwrap();
        assert!(suggestions[0].account.is_some());
        assert_eq!(suggestions[1].group.as_ref().unwrap().name, "Joiner");
        assert_eq!(suggestions[1].count, Some(5));
    }

    #[tokio::test]
    async fn test_delete_vote_path() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("DELETE", "/changes/5/reviewers/john/votes/Code-Review")
            .with_status(204)
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let change = client.changes().change("5");
        change
            .reviewers()
            .delete_vote("john", "Code-Review", None)
            .await
            .unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_add_reviewer_needing_confirmation() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/changes/5/reviewers")
            .match_body(Matcher::Json(serde_json::json!({"reviewer": "MyProjectVerifiers"})))
            .with_body(
                ")]}'\n{\"input\":\"MyProjectVerifiers\",\"error\":\"The group My Group has 15 members.\",\"confirm\":true}",
            )
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let change = client.changes().change("5");
        let result = change
            .reviewers()
            .add(&ReviewerInput {
                reviewer: "MyProjectVerifiers".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(result.confirm);
        assert!(result.reviewers.is_empty());
    }
}
