//
//  gerrit-cli
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Connection profile for `gerritctl`: which server to talk to and how to
//! authenticate.
//!
//! ## Configuration File Location
//!
//! Unless `--config` names a file, the profile is read from the platform
//! configuration directory:
//!
//! - **Linux**: `~/.config/gerritctl/config.json`
//! - **macOS**: `~/Library/Application Support/gerritctl/config.json`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\gerritctl\config\config.json`
//!
//! A `config.toml` next to it is used when no `config.json` exists.
//!
//! ## Example Configuration File
//!
//! ```json
//! {
//!   "url": "https://gerrit.example.com/",
//!   "username": "jane",
//!   "password": "http-password",
//!   "auth_type": "basic"
//! }
//! ```
//!
//! Command-line flags and `GERRIT_*` environment variables take precedence
//! over file values.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::APP_NAME;

/// Errors raised while resolving a connection profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in config file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid TOML in config file {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no Gerrit URL configured; pass --url, set GERRIT_URL or add \"url\" to the config file")]
    MissingUrl,
}

/// Connection settings for one Gerrit server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, alias = "Url", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, alias = "Username", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, alias = "Password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// `basic` (default), `digest` or `cookie`.
    #[serde(default, alias = "AuthType", skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
}

impl Profile {
    /// The platform configuration directory for `gerritctl`.
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// The profile file used when `--config` is not given.
    ///
    /// Prefers `config.json`; falls back to `config.toml` if only that one
    /// exists.
    pub fn default_path() -> Option<PathBuf> {
        let dir = Self::config_dir()?;
        let json = dir.join("config.json");
        let toml = dir.join("config.toml");
        if !json.exists() && toml.exists() {
            Some(toml)
        } else {
            Some(json)
        }
    }

    /// Loads the profile.
    ///
    /// An explicit `path` must exist. A missing default file yields an empty
    /// profile, so flags and environment alone can supply the connection.
    pub fn load(path: Option<&Path>) -> Result<Self, ProfileError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parses a profile file, TOML when the extension is `.toml`, JSON
    /// otherwise.
    pub fn from_file(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            toml::from_str(&content).map_err(|source| ProfileError::Toml {
                path: path.to_path_buf(),
                source,
            })
        } else {
            serde_json::from_str(&content).map_err(|source| ProfileError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Overlays non-empty values from `other`.
    pub fn merge(mut self, other: Profile) -> Self {
        fn pick(current: &mut Option<String>, value: Option<String>) {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                *current = Some(value);
            }
        }

        pick(&mut self.url, other.url);
        pick(&mut self.username, other.username);
        pick(&mut self.password, other.password);
        pick(&mut self.auth_type, other.auth_type);
        self
    }

    /// The configured URL.
    pub fn url(&self) -> Result<&str, ProfileError> {
        self.url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ProfileError::MissingUrl)
    }

    /// Username and password, when both are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }

    pub fn auth_type(&self) -> &str {
        self.auth_type.as_deref().unwrap_or("basic")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_load_json_profile() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"url": "https://gerrit.example.com/", "username": "jane", "password": "pw"}}"#
        )
        .unwrap();

        let profile = Profile::load(Some(file.path())).unwrap();
        assert_eq!(profile.url().unwrap(), "https://gerrit.example.com/");
        assert_eq!(profile.credentials(), Some(("jane", "pw")));
        assert_eq!(profile.auth_type(), "basic");
    }

    #[test]
    fn test_load_capitalized_keys() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"Url": "http://localhost:8080", "Username": "admin"}}"#).unwrap();

        let profile = Profile::load(Some(file.path())).unwrap();
        assert_eq!(profile.url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(profile.credentials(), None);
    }

    #[test]
    fn test_load_toml_profile() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "url = \"https://gerrit.example.com\"").unwrap();
        writeln!(file, "auth_type = \"cookie\"").unwrap();

        let profile = Profile::load(Some(file.path())).unwrap();
        assert_eq!(profile.auth_type(), "cookie");
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Profile::load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, ProfileError::Read { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{not json").unwrap();
        let err = Profile::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ProfileError::Json { .. }));
    }

    #[test]
    fn test_merge_prefers_non_empty_overrides() {
        let file = Profile {
            url: Some("https://a.example.com".into()),
            username: Some("jane".into()),
            ..Default::default()
        };
        let flags = Profile {
            url: Some("https://b.example.com".into()),
            username: Some(String::new()),
            ..Default::default()
        };

        let merged = file.merge(flags);
        assert_eq!(merged.url.as_deref(), Some("https://b.example.com"));
        assert_eq!(merged.username.as_deref(), Some("jane"));
    }

    #[test]
    fn test_missing_url() {
        assert!(matches!(
            Profile::default().url(),
            Err(ProfileError::MissingUrl)
        ));
    }
}
