//
//  gerrit-cli
//  api/projects/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project API
//!
//! Operations on `projects/{name}` and the branches, tags and commits that
//! live below it.
//!
//! # Example
//!
//! ```rust,no_run
//! use gerrit_cli::api::GerritClient;
//! use gerrit_cli::api::projects::{ProjectInput, ProjectOptions};
//!
//! # async fn run() -> gerrit_cli::api::Result<()> {
//! let client = GerritClient::new("https://review.example.com")?;
//!
//! let projects = client
//!     .projects()
//!     .list(&ProjectOptions { limit: Some(25), description: true, ..Default::default() })
//!     .await?;
//! for (name, info) in &projects {
//!     println!("{name}: {}", info.description.as_deref().unwrap_or(""));
//! }
//!
//! let project = client
//!     .projects()
//!     .create("demo", &ProjectInput { create_empty_commit: true, ..Default::default() })
//!     .await?;
//! let branches = project.branches().list(&Default::default()).await?;
//! # let _ = branches;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::changes::ActionInfo;
use super::client::GerritClient;
use super::common::{escape, non_empty, GitPersonInfo, Payload, Result, WebLinkInfo};

mod branch;
mod commit;
mod tag;

pub use branch::*;
pub use commit::*;
pub use tag::*;

/// A project as returned by `GET projects/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `ACTIVE`, `READ_ONLY` or `HIDDEN`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Branch name to revision, present when listing with a branch filter.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub branches: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_links: Vec<WebLinkInfo>,
}

/// Input for creating a project.
///
/// `permissions_only` and `create_empty_commit` are always sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions_only: bool,
    #[serde(default)]
    pub create_empty_commit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_contributor_agreements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_signed_off_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_new_change_for_all_not_in_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_content_merge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_change_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_object_size_limit: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub plugin_config_values: BTreeMap<String, BTreeMap<String, String>>,
}

/// Options for deleting a project (delete-project plugin).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOptionsInfo {
    pub force: bool,
    pub preserve: bool,
}

/// Input for pointing `HEAD` at another branch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadInput {
    #[serde(rename = "ref")]
    pub reference: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

/// One entry of a branch reflog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflogEntryInfo {
    pub old_id: String,
    pub new_id: String,
    pub who: GitPersonInfo,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectParentInput {
    pub parent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
}

/// A boolean setting that may be inherited from the parent project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InheritedBooleanInfo {
    #[serde(default)]
    pub value: bool,
    /// `TRUE`, `FALSE` or `INHERIT`.
    #[serde(default)]
    pub configured_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited_value: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaxObjectSizeLimitInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configured_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited_value: Option<String>,
}

/// A plugin-defined project configuration parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigParameterInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permitted_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inheritable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configured_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited_value: Option<String>,
}

/// Input for setting a project description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDescriptionInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
}

/// The effective project configuration, including inherited values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub use_contributor_agreements: Option<InheritedBooleanInfo>,
    #[serde(default)]
    pub use_content_merge: Option<InheritedBooleanInfo>,
    #[serde(default)]
    pub use_signed_off_by: Option<InheritedBooleanInfo>,
    #[serde(default)]
    pub create_new_change_for_all_not_in_target: Option<InheritedBooleanInfo>,
    #[serde(default)]
    pub require_change_id: Option<InheritedBooleanInfo>,
    #[serde(default)]
    pub enable_signed_push: Option<InheritedBooleanInfo>,
    #[serde(default)]
    pub max_object_size_limit: MaxObjectSizeLimitInfo,
    #[serde(default)]
    pub submit_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub commentlinks: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeInfo>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub plugin_config: BTreeMap<String, BTreeMap<String, ConfigParameterInfo>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<String, ActionInfo>,
}

/// New project configuration values; unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_contributor_agreements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_content_merge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_signed_off_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_new_change_for_all_not_in_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_signed_push: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_signed_push: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_implicit_merges: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_change_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_object_size_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub plugin_config_values: BTreeMap<String, BTreeMap<String, String>>,
}

/// Query options for [`Projects::list`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectOptions {
    /// Maximum number of projects returned.
    #[serde(rename = "n", skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Number of projects skipped from the start of the list.
    #[serde(rename = "S", skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    /// Only projects having this branch; its revision is included.
    #[serde(rename = "b", skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Include project descriptions.
    #[serde(rename = "d", skip_serializing_if = "std::ops::Not::not")]
    pub description: bool,
    /// Only projects whose name starts with this prefix.
    #[serde(rename = "p", skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Only projects matching this regex (`^` and `$` are implicit).
    #[serde(rename = "r", skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    /// Only projects containing this substring.
    #[serde(rename = "m", skip_serializing_if = "Option::is_none")]
    pub substring: Option<String>,
    /// Return the inheritance tree. Cannot be combined with `branch`.
    #[serde(rename = "t", skip_serializing_if = "std::ops::Not::not")]
    pub tree: bool,
    /// `ALL`, `CODE` or `PERMISSIONS`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    /// `ACTIVE`, `READ_ONLY` or `HIDDEN`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Include hidden projects.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub all: bool,
}

/// Project operations reachable from a [`GerritClient`].
#[derive(Debug, Clone, Copy)]
pub struct Projects<'a> {
    client: &'a GerritClient,
}

impl GerritClient {
    /// Project operations.
    pub fn projects(&self) -> Projects<'_> {
        Projects { client: self }
    }
}

impl Projects<'_> {
    /// Lists the projects visible to the caller, keyed and sorted by name.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use gerrit_cli::api::GerritClient;
    /// # use gerrit_cli::api::projects::ProjectOptions;
    /// # async fn run(client: GerritClient) -> gerrit_cli::api::Result<()> {
    /// let options = ProjectOptions { prefix: Some("platform/".into()), ..Default::default() };
    /// let projects = client.projects().list(&options).await?;
    /// println!("{} projects", projects.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(&self, options: &ProjectOptions) -> Result<BTreeMap<String, ProjectInfo>> {
        Ok(self
            .client
            .requester()
            .call_json_opt(Method::GET, "projects/", Payload::json(options))
            .await?
            .unwrap_or_default())
    }

    /// A handle on `name` without fetching it.
    pub fn project(&self, name: &str) -> Project {
        Project::new(self.client.clone(), name)
    }

    /// Fetches a project.
    pub async fn get(&self, name: &str) -> Result<Project> {
        let mut project = self.project(name);
        project.poll().await?;
        Ok(project)
    }

    /// Creates a project and fetches it.
    pub async fn create(&self, name: &str, input: &ProjectInput) -> Result<Project> {
        self.project(name).create(input).await
    }

    /// Deletes a project through the delete-project plugin.
    pub async fn delete(&self, name: &str, options: &DeleteOptionsInfo) -> Result<()> {
        self.project(name).delete(options).await
    }
}

/// Handle on a single project.
#[derive(Debug, Clone)]
pub struct Project {
    client: GerritClient,
    name: String,
    path: String,
    raw: Option<ProjectInfo>,
}

impl Project {
    pub(crate) fn new(client: GerritClient, name: &str) -> Self {
        Self {
            client,
            name: name.to_string(),
            path: format!("projects/{}", escape(name)),
            raw: None,
        }
    }

    /// The project name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The last fetched representation, if any.
    pub fn raw(&self) -> Option<&ProjectInfo> {
        self.raw.as_ref()
    }

    pub(crate) fn client(&self) -> &GerritClient {
        &self.client
    }

    pub(crate) fn endpoint(&self, suffix: &str) -> String {
        format!("{}/{}", self.path, suffix)
    }

    /// Refreshes [`raw`](Self::raw) from the server.
    pub async fn poll(&mut self) -> Result<&ProjectInfo> {
        let info: ProjectInfo = self
            .client
            .requester()
            .call_json(Method::GET, &self.path, Payload::Empty)
            .await?;
        Ok(&*self.raw.insert(info))
    }

    /// Creates the project, then fetches it.
    pub async fn create(mut self, input: &ProjectInput) -> Result<Self> {
        self.client
            .requester()
            .call_empty(Method::PUT, &self.path, Payload::json(input))
            .await?;
        self.poll().await?;
        Ok(self)
    }

    /// Deletes the project (`POST delete-project~delete`).
    pub async fn delete(&self, options: &DeleteOptionsInfo) -> Result<()> {
        self.client
            .requester()
            .call_empty(
                Method::POST,
                &self.endpoint("delete-project~delete"),
                Payload::json(options),
            )
            .await?;
        Ok(())
    }

    /// The description, or `None` when it is not set.
    pub async fn description(&self) -> Result<Option<String>> {
        let text = self
            .client
            .requester()
            .call_text(Method::GET, &self.endpoint("description"), Payload::Empty)
            .await?;
        Ok(non_empty(text))
    }

    /// Sets the description and returns the stored value.
    pub async fn set_description(&self, input: &ProjectDescriptionInput) -> Result<Option<String>> {
        let text = self
            .client
            .requester()
            .call_text(Method::PUT, &self.endpoint("description"), Payload::json(input))
            .await?;
        Ok(non_empty(text))
    }

    /// Removes the description.
    pub async fn delete_description(&self) -> Result<()> {
        self.client
            .requester()
            .call_empty(Method::DELETE, &self.endpoint("description"), Payload::Empty)
            .await?;
        Ok(())
    }

    /// The parent project; empty for `All-Projects`.
    pub async fn parent(&self) -> Result<String> {
        self.client
            .requester()
            .call_text(Method::GET, &self.endpoint("parent"), Payload::Empty)
            .await
    }

    pub async fn set_parent(&self, input: &ProjectParentInput) -> Result<String> {
        self.client
            .requester()
            .call_text(Method::PUT, &self.endpoint("parent"), Payload::json(input))
            .await
    }

    /// The branch `HEAD` points to.
    pub async fn head(&self) -> Result<String> {
        self.client
            .requester()
            .call_text(Method::GET, &self.endpoint("HEAD"), Payload::Empty)
            .await
    }

    pub async fn set_head(&self, input: &HeadInput) -> Result<String> {
        self.client
            .requester()
            .call_text(Method::PUT, &self.endpoint("HEAD"), Payload::json(input))
            .await
    }

    /// The effective configuration, including inherited values.
    pub async fn config(&self) -> Result<ConfigInfo> {
        self.client
            .requester()
            .call_json(Method::GET, &self.endpoint("config"), Payload::Empty)
            .await
    }

    pub async fn set_config(&self, input: &ConfigInput) -> Result<ConfigInfo> {
        self.client
            .requester()
            .call_json(Method::PUT, &self.endpoint("config"), Payload::json(input))
            .await
    }

    /// Branch operations for this project.
    pub fn branches(&self) -> Branches<'_> {
        Branches::new(self)
    }

    /// Tag operations for this project.
    pub fn tags(&self) -> Tags<'_> {
        Tags::new(self)
    }

    /// A handle on one commit of this project, without fetching it.
    pub fn commit(&self, id: &str) -> Commit {
        Commit::new(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn project_body(name: &str) -> String {
        format!(")]}}'\n{{\"id\":\"{name}\",\"name\":\"{name}\",\"state\":\"ACTIVE\"}}")
    }

    #[tokio::test]
    async fn test_list_projects() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/projects/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("n".into(), "2".into()),
                Matcher::UrlEncoded("d".into(), "true".into()),
            ]))
            .with_body(
                ")]}'\n{\"All-Projects\":{\"id\":\"All-Projects\",\"description\":\"Root\"},\
                 \"demo\":{\"id\":\"demo\",\"state\":\"ACTIVE\"}}",
            )
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let options = ProjectOptions {
            limit: Some(2),
            description: true,
            ..Default::default()
        };
        let projects = client.projects().list(&options).await.unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects["All-Projects"].description.as_deref(), Some("Root"));
        assert_eq!(projects["demo"].state.as_deref(), Some("ACTIVE"));
    }

    #[tokio::test]
    async fn test_get_escapes_project_name() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/projects/platform%2Fbuild")
            .with_body(project_body("platform/build"))
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let project = client.projects().get("platform/build").await.unwrap();
        assert_eq!(project.name(), "platform/build");
        assert_eq!(project.raw().unwrap().id, "platform/build");
    }

    #[tokio::test]
    async fn test_create_then_poll() {
        let mut server = mockito::Server::new_async().await;
        let create = server
            .mock("PUT", "/projects/demo")
            .match_body(Matcher::Json(serde_json::json!({
                "description": "Demo project",
                "permissions_only": false,
                "create_empty_commit": true
            })))
            .with_status(201)
            .with_body(project_body("demo"))
            .create_async()
            .await;
        let poll = server
            .mock("GET", "/projects/demo")
            .with_body(project_body("demo"))
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let input = ProjectInput {
            description: Some("Demo project".into()),
            create_empty_commit: true,
            ..Default::default()
        };
        let project = client.projects().create("demo", &input).await.unwrap();

        create.assert_async().await;
        poll.assert_async().await;
        assert_eq!(project.raw().unwrap().state.as_deref(), Some("ACTIVE"));
    }

    #[tokio::test]
    async fn test_delete_uses_plugin_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("POST", "/projects/demo/delete-project~delete")
            .match_body(Matcher::Json(serde_json::json!({"force": true, "preserve": false})))
            .with_status(204)
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let options = DeleteOptionsInfo {
            force: true,
            preserve: false,
        };
        client.projects().delete("demo", &options).await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_unset_description_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/projects/demo/description")
            .with_status(204)
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let description = client.projects().project("demo").description().await.unwrap();
        assert_eq!(description, None);
    }

    #[tokio::test]
    async fn test_head_is_trimmed_text() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/projects/demo/HEAD")
            .with_body(")]}'\n\"refs/heads/main\"")
            .create_async()
            .await;

        let client = GerritClient::new(&server.url()).unwrap();
        let head = client.projects().project("demo").head().await.unwrap();
        assert_eq!(head, "refs/heads/main");
    }
}
