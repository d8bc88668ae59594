//
//  gerrit-cli
//  cli/group.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Group commands

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::api::groups::{GroupInput, ListGroupOptions};

use super::GlobalOptions;

/// Manage groups
#[derive(Args, Debug)]
pub struct GroupCommand {
    #[command(subcommand)]
    pub command: GroupSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum GroupSubcommand {
    /// List the groups
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Create a new group
    Create(CreateArgs),

    /// Retrieve a group
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Maximum number of groups
    #[arg(long, short = 'l', default_value = "25")]
    pub limit: u32,

    /// Skip the first N groups
    #[arg(long, short = 's')]
    pub skip: Option<u32>,

    /// Only groups the caller owns
    #[arg(long)]
    pub owned: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Group name
    pub name: String,

    /// Group description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Make the group visible to all registered users
    #[arg(long)]
    pub visible_to_all: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Group UUID, legacy numeric id or name
    pub group: String,
}

impl GroupCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            GroupSubcommand::List(args) => self.list(args, global).await,
            GroupSubcommand::Create(args) => self.create(args, global).await,
            GroupSubcommand::Show(args) => self.show(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let (client, _) = global.connect()?;
        let options = ListGroupOptions {
            limit: Some(args.limit),
            skip: args.skip,
            owned: args.owned,
            ..Default::default()
        };

        let groups = client.groups().list(&options).await?;
        let output = global.output();
        for (name, info) in &groups {
            output.write_item(&format!("Group Name: {name}, GroupID: {}.", info.id), info)?;
        }
        Ok(())
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let (client, _) = global.connect()?;
        let input = GroupInput {
            name: Some(args.name.clone()),
            description: args.description.clone(),
            visible_to_all: args.visible_to_all,
            ..Default::default()
        };

        let group = client
            .groups()
            .pending(&args.name)
            .create(&input)
            .await
            .with_context(|| format!("failed to create group {}", args.name))?;
        let summary = format!("Created group {}, GroupID: {}.", args.name, group.id());
        match group.raw() {
            Some(info) => global.output().write_item(&summary, info),
            None => {
                global.output().write_success(&summary);
                Ok(())
            }
        }
    }

    async fn show(&self, args: &ShowArgs, global: &GlobalOptions) -> Result<()> {
        let (client, _) = global.connect()?;
        let group = client
            .groups()
            .get(&args.group)
            .await
            .with_context(|| format!("unable to find group {}", args.group))?;

        let output = global.output();
        match group.raw() {
            Some(info) => output.write_item(
                &format!(
                    "Group {}, GroupID: {}.",
                    info.name.as_deref().unwrap_or(&args.group),
                    info.id
                ),
                info,
            ),
            None => {
                output.write_success(&format!("GroupID: {}.", group.id()));
                Ok(())
            }
        }
    }
}
