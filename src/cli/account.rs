//
//  gerrit-cli
//  cli/account.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Account commands

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::api::accounts::{AccountInfo, AccountInput, QueryAccountOptions};

use super::GlobalOptions;

/// Manage accounts
#[derive(Args, Debug)]
pub struct AccountCommand {
    #[command(subcommand)]
    pub command: AccountSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AccountSubcommand {
    /// Query accounts
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Retrieve an account
    Show(ShowArgs),

    /// Create a new account
    Create(CreateArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Search query
    #[arg(long, short = 'q', default_value = "is:active")]
    pub query: String,

    /// Maximum number of accounts
    #[arg(long, short = 'l', default_value = "25")]
    pub limit: u32,

    /// Skip the first N accounts
    #[arg(long, short = 's')]
    pub start: Option<u32>,

    /// Additional fields such as DETAILS or ALL_EMAILS
    #[arg(long = "option", short = 'o')]
    pub options: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Account id, username, email or `self`
    pub account: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Username of the new account
    pub username: String,

    /// Full name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Preferred email
    #[arg(long, short = 'e')]
    pub email: Option<String>,
}

fn describe(info: &AccountInfo) -> String {
    let id = info
        .account_id
        .map_or_else(|| "?".to_string(), |id| id.to_string());
    match info.username.as_deref().or(info.name.as_deref()) {
        Some(who) => format!("Account {who}, AccountID: {id}."),
        None => format!("AccountID: {id}."),
    }
}

impl AccountCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AccountSubcommand::List(args) => self.list(args, global).await,
            AccountSubcommand::Show(args) => self.show(args, global).await,
            AccountSubcommand::Create(args) => self.create(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let (client, _) = global.connect()?;
        let options = QueryAccountOptions {
            query: Some(args.query.clone()),
            limit: Some(args.limit),
            start: args.start,
            additional_fields: args.options.clone(),
        };

        let accounts = client.accounts().query(&options).await?;
        let output = global.output();
        for account in &accounts {
            output.write_item(&describe(account), account)?;
        }
        Ok(())
    }

    async fn show(&self, args: &ShowArgs, global: &GlobalOptions) -> Result<()> {
        let (client, _) = global.connect()?;
        let account = client
            .accounts()
            .get(&args.account)
            .await
            .with_context(|| format!("unable to find account {}", args.account))?;

        let output = global.output();
        match account.raw() {
            Some(info) => output.write_item(&describe(info), info),
            None => {
                output.write_success(&format!("AccountID: {}.", account.id()));
                Ok(())
            }
        }
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let (client, _) = global.connect()?;
        let input = AccountInput {
            username: Some(args.username.clone()),
            name: args.name.clone(),
            email: args.email.clone(),
            ..Default::default()
        };

        let account = client
            .accounts()
            .pending(&args.username)
            .create(&input)
            .await
            .with_context(|| format!("failed to create account {}", args.username))?;
        let summary = format!("Created account {}, AccountID: {}.", args.username, account.id());
        match account.raw() {
            Some(info) => global.output().write_item(&summary, info),
            None => {
                global.output().write_success(&summary);
                Ok(())
            }
        }
    }
}
