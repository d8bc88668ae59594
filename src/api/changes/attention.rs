//
//  gerrit-cli
//  api/changes/attention.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::collections::BTreeMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{Change, NotifyInfo};
use crate::api::accounts::AccountInfo;
use crate::api::common::{escape, Payload, Result, Timestamp};

/// A user in the attention set of a change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttentionSetInfo {
    pub account: AccountInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<Timestamp>,
    #[serde(default)]
    pub reason: String,
}

/// Adds a user to, or removes one from, the attention set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttentionSetInput {
    /// Only needed when adding; removal takes the user from the path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify: Option<String>,
    /// Keyed by `TO`, `CC` or `BCC`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub notify_details: BTreeMap<String, NotifyInfo>,
}

impl Change {
    pub async fn attention_set(&self) -> Result<Vec<AttentionSetInfo>> {
        self.fetch_list("attention").await
    }

    /// Adds `input.user` to the attention set and returns the account added.
    pub async fn add_to_attention_set(&self, input: &AttentionSetInput) -> Result<AccountInfo> {
        self.client()
            .requester()
            .call_json(Method::POST, &self.endpoint("attention"), Payload::json(input))
            .await
    }

    pub async fn remove_from_attention_set(
        &self,
        account_id: &str,
        input: &AttentionSetInput,
    ) -> Result<()> {
        self.send(
            Method::POST,
            &format!("attention/{}/delete", escape(account_id)),
            Payload::json(input),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use crate::api::client::GerritClient;

    use super::*;

    #[tokio::test]
    async fn test_attention_set_roundtrip() {
        let mut server = mockito::Server::new_async().await;
        let _list = server
            .mock("GET", "/changes/7/attention")
            .with_body(
                r#")]}'
[{"account":{"_account_id":1000096,"name":"John Doe"},"last_update":"2013-02-21 11:16:36.775000000","reason":"reviewer or cc replied"}]"#,
            )
            .create_async()
            .await;
        let add = server
            .mock("POST", "/changes/7/attention")
            .match_body(Matcher::Json(serde_json::json!({"user": "jane", "reason": "ping"})))
            .with_body(")]}'\n{\"_account_id\":1000097,\"name\":\"Jane Roe\"}")
            .create_async()
            .await;
        let remove = server
            .mock("POST", "/changes/7/attention/1000096/delete")
            .match_body(Matcher::Json(serde_json::json!({"reason": "done"})))
            .with_status(204)
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let change = client.changes().change("7");

        let set = change.attention_set().await.unwrap();
        assert_eq!(set[0].account.account_id, Some(1000096));
        assert_eq!(set[0].reason, "reviewer or cc replied");

        let added = change
            .add_to_attention_set(&AttentionSetInput {
                user: Some("jane".into()),
                reason: "ping".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        add.assert_async().await;
        assert_eq!(added.name.as_deref(), Some("Jane Roe"));

        change
            .remove_from_attention_set(
                "1000096",
                &AttentionSetInput {
                    reason: "done".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        remove.assert_async().await;
    }
}
