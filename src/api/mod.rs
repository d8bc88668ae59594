//
//  gerrit-cli
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! A typed client for the Gerrit Code Review REST API.
//!
//! ## Architecture
//!
//! - [`client`]: the [`Requester`] pipeline (URL building, authentication,
//!   magic-prefix stripping, decoding) and the [`GerritClient`] facade
//! - [`common`]: payloads, response targets, errors and shared JSON types
//! - [`accounts`], [`changes`], [`projects`], [`groups`], [`access`],
//!   [`server`]: resource services and handles
//! - [`gitiles`]: a separate client for the Gitiles browsing plugin
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gerrit_cli::api::GerritClient;
//! use gerrit_cli::api::changes::QueryChangeOptions;
//!
//! # async fn demo() -> gerrit_cli::api::Result<()> {
//! let client = GerritClient::new("https://gerrit.example.com/")?;
//! client.set_basic_auth("jane", "http-password")?;
//!
//! let options = QueryChangeOptions {
//!     query: vec!["is:open owner:self".into()],
//!     ..Default::default()
//! };
//! for change in client.changes().query(&options).await? {
//!     println!("{} {}", change.number, change.subject);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result`]. Non-2xx answers become
//! [`GerritError::Status`], which keeps the [`ResponseInfo`] of the failed
//! exchange; see [`GerritError::is_not_found`] and friends.

/// Request pipeline and the top-level client.
pub mod client;

/// Shared types, payloads and errors.
pub mod common;

pub mod access;
pub mod accounts;
pub mod changes;
pub mod gitiles;
pub mod groups;
pub mod projects;
pub mod server;

pub use client::{GerritClient, Requester, TransportConfig};
pub use common::{ConfigError, GerritError, Payload, ResponseInfo, Result, Target};
