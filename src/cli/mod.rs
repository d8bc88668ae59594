//
//  gerrit-cli
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod account;
mod change;
mod completion;
mod group;
mod project;
mod version;

pub use account::AccountCommand;
pub use change::ChangeCommand;
pub use completion::CompletionCommand;
pub use group::GroupCommand;
pub use project::ProjectCommand;
pub use version::VersionCommand;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::api::GerritClient;
use crate::config::Profile;
use crate::output::OutputWriter;

/// gerritctl - Manage Gerrit resources from the command line
#[derive(Parser, Debug)]
#[command(
    name = "gerritctl",
    version,
    about = "A client for Gerrit",
    long_about = "gerritctl manages changes, projects, groups and accounts on a Gerrit server.\n\n\
                  The connection is read from a JSON or TOML profile and can be overridden with flags \
                  or GERRIT_* environment variables.",
    propagate_version = true,
    after_help = "Use 'gerritctl <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Path to config file
    #[arg(long, global = true, env = "GERRITCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose output: print each result as JSON
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Gerrit server URL
    #[arg(long, global = true, env = "GERRIT_URL")]
    pub url: Option<String>,

    /// Username (or cookie name)
    #[arg(long, global = true, env = "GERRIT_USERNAME")]
    pub username: Option<String>,

    /// HTTP password (or cookie value)
    #[arg(long, global = true, env = "GERRIT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Authentication scheme
    #[arg(long, global = true, env = "GERRIT_AUTH_TYPE", value_parser = ["basic", "digest", "cookie"])]
    pub auth_type: Option<String>,
}

impl GlobalOptions {
    /// The config file profile with flag and environment overrides applied.
    pub fn profile(&self) -> Result<Profile> {
        let file = Profile::load(self.config.as_deref())?;
        Ok(file.merge(Profile {
            url: self.url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            auth_type: self.auth_type.clone(),
        }))
    }

    /// Builds an authenticated client from [`profile`](Self::profile).
    pub fn connect(&self) -> Result<(GerritClient, Profile)> {
        let profile = self.profile()?;
        let url = profile.url()?;
        let client = GerritClient::new(url)?;

        match profile.credentials() {
            Some((username, password)) => {
                client
                    .set_auth(profile.auth_type(), username, password)
                    .context("invalid credentials in profile")?;
                debug!(url, username, scheme = profile.auth_type(), "connecting");
            }
            None if profile.username.is_some() || profile.password.is_some() => {
                self.output()
                    .write_warning("username or password missing; continuing anonymously");
            }
            None => debug!(url, "connecting anonymously"),
        }

        Ok((client, profile))
    }

    pub fn output(&self) -> OutputWriter {
        OutputWriter::new(self.verbose)
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Change related commands
    Change(ChangeCommand),

    /// Project related commands
    #[command(visible_alias = "proj")]
    Project(ProjectCommand),

    /// Group related commands
    Group(GroupCommand),

    /// Account related commands
    Account(AccountCommand),

    /// Show the connected user, server URL and server version
    Version(VersionCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),
}

impl Commands {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match self {
            Commands::Change(cmd) => cmd.run(global).await,
            Commands::Project(cmd) => cmd.run(global).await,
            Commands::Group(cmd) => cmd.run(global).await,
            Commands::Account(cmd) => cmd.run(global).await,
            Commands::Version(cmd) => cmd.run(global).await,
            Commands::Completion(cmd) => cmd.run(global).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_profile() {
        let global = GlobalOptions {
            config: None,
            url: Some("https://gerrit.example.com".into()),
            username: Some("jane".into()),
            password: Some("pw".into()),
            ..Default::default()
        };
        let profile = global.profile().unwrap();
        assert_eq!(profile.url().unwrap(), "https://gerrit.example.com");
        assert_eq!(profile.credentials(), Some(("jane", "pw")));
    }

    #[test]
    fn test_digest_profile_is_rejected() {
        let global = GlobalOptions {
            url: Some("https://gerrit.example.com".into()),
            username: Some("jane".into()),
            password: Some("pw".into()),
            auth_type: Some("digest".into()),
            ..Default::default()
        };
        let err = global.connect().unwrap_err();
        assert!(format!("{err:#}").contains("digest"));
    }
}
