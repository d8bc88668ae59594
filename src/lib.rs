//
//  gerrit-cli
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Gerrit CLI Library
//!
//! A typed client for the Gerrit Code Review REST API, a companion Gitiles
//! client, and the `gerritctl` command-line tool built on both.
//!
//! ## Features
//!
//! - **One request pipeline**: URL building, `/a/` authenticated namespace,
//!   `)]}'` prefix stripping and JSON decoding live in
//!   [`api::Requester`]; resource modules only name paths and payloads
//! - **Resource handles**: accounts, changes (with edits, reviewers,
//!   revisions and attention set), projects (branches, tags, commits),
//!   groups (members, subgroups), access rights and server configuration
//! - **Typed failures**: [`api::GerritError`] keeps the status and response of
//!   a failed exchange; configuration mistakes are [`api::ConfigError`] values
//!
//! ## Module Structure
//!
//! - [`api`]: HTTP client and resource services
//! - [`auth`]: authentication schemes and credentials
//! - [`cli`]: command-line interface definitions using clap
//! - [`config`]: connection profile loading
//! - [`output`]: `✅` result lines and JSON dumps
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use gerrit_cli::api::GerritClient;
//!
//! # async fn demo() -> gerrit_cli::api::Result<()> {
//! let client = GerritClient::new("https://gerrit.example.com/")?;
//! println!("Gerrit {}", client.server().version().await?);
//!
//! let mut project = client.projects().get("platform/build").await?;
//! println!("{:?}", project.poll().await?.description);
//! # Ok(())
//! # }
//! ```

/// API client implementations for Gerrit and Gitiles.
pub mod api;

/// Authentication schemes and credentials.
///
/// Supports HTTP basic authentication and session cookies. Digest
/// authentication is recognised but rejected.
pub mod auth;

/// Command-line interface definitions.
///
/// Contains all CLI commands, arguments, and subcommands defined using the clap derive API.
pub mod cli;

/// Connection profile management.
///
/// Reads `url`, `username`, `password` and `auth_type` from a JSON or TOML
/// file in the platform configuration directory:
/// - Linux: `~/.config/gerritctl/config.json`
/// - macOS: `~/Library/Application Support/gerritctl/config.json`
pub mod config;

/// Output formatting for command results.
pub mod output;

/// Re-export of the main CLI struct for convenient access.
///
/// ```rust,no_run
/// use clap::Parser;
/// use gerrit_cli::Cli;
///
/// let cli = Cli::parse();
/// ```
pub use cli::Cli;

/// Re-export of the connection profile.
pub use config::Profile;

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes, the User-Agent
/// header and configuration paths.
pub const APP_NAME: &str = "gerritctl";

/// Application version constant.
///
/// ```rust
/// use gerrit_cli::VERSION;
///
/// println!("gerritctl version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Standardized exit codes following Unix conventions, allowing scripts
/// to programmatically detect the outcome of CLI operations.
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource-related issues
///
/// ```rust,no_run
/// use gerrit_cli::exit_codes;
/// use std::process;
///
/// process::exit(exit_codes::AUTH_ERROR);
/// ```
pub mod exit_codes {
    use crate::api::{ConfigError, GerritError};
    use crate::config::ProfileError;

    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error.
    ///
    /// An unspecified error occurred during execution.
    /// Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage, arguments or connection profile.
    pub const USAGE: i32 = 2;

    /// Authentication required or failed (HTTP 401 or 403).
    pub const AUTH_ERROR: i32 = 4;

    /// Resource not found (HTTP 404).
    pub const NOT_FOUND: i32 = 8;

    /// Picks the exit code for an error returned by a command.
    ///
    /// The whole context chain is searched, so wrapping a [`GerritError`]
    /// with `anyhow::Context` keeps its code.
    pub fn for_error(err: &anyhow::Error) -> i32 {
        for cause in err.chain() {
            if let Some(err) = cause.downcast_ref::<GerritError>() {
                if err.is_auth_failure() {
                    return AUTH_ERROR;
                }
                if err.is_not_found() {
                    return NOT_FOUND;
                }
                if matches!(err, GerritError::Config(_)) {
                    return USAGE;
                }
            }
            if cause.is::<ConfigError>() || cause.is::<ProfileError>() {
                return USAGE;
            }
        }
        ERROR
    }

}
