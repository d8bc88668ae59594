//
//  gerrit-cli
//  cli/change.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Change commands

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::api::changes::{ChangeInput, ChangeOptions, QueryChangeOptions};

use super::GlobalOptions;

/// Manage changes
#[derive(Args, Debug)]
pub struct ChangeCommand {
    #[command(subcommand)]
    pub command: ChangeSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ChangeSubcommand {
    /// Query changes
    #[command(visible_alias = "ls")]
    Query(QueryArgs),

    /// Create a new change
    Create(CreateArgs),

    /// Retrieve a change
    Show(ShowArgs),

    /// Delete a change
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Search query; repeat for several queries
    #[arg(long, short = 'q', default_value = "is:open")]
    pub query: Vec<String>,

    /// Maximum number of changes
    #[arg(long, short = 'l', default_value = "25")]
    pub limit: u32,

    /// Skip the first N changes
    #[arg(long, short = 's')]
    pub start: Option<u32>,

    /// Additional fields such as LABELS or CURRENT_REVISION
    #[arg(long = "option", short = 'o')]
    pub options: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Project name
    #[arg(long, short = 'p')]
    pub project: String,

    /// Target branch
    #[arg(long, short = 'b')]
    pub branch: String,

    /// Commit subject
    #[arg(long, short = 's')]
    pub subject: String,

    /// Topic
    #[arg(long)]
    pub topic: Option<String>,

    /// Create as work in progress
    #[arg(long)]
    pub wip: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Change id (number, Change-Id or project~branch~Change-Id)
    pub change: String,

    /// Additional fields such as LABELS or CURRENT_REVISION
    #[arg(long = "option", short = 'o')]
    pub options: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Change id
    pub change: String,
}

impl ChangeCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ChangeSubcommand::Query(args) => self.query(args, global).await,
            ChangeSubcommand::Create(args) => self.create(args, global).await,
            ChangeSubcommand::Show(args) => self.show(args, global).await,
            ChangeSubcommand::Delete(args) => self.delete(args, global).await,
        }
    }

    async fn query(&self, args: &QueryArgs, global: &GlobalOptions) -> Result<()> {
        let (client, _) = global.connect()?;
        let options = QueryChangeOptions {
            query: args.query.clone(),
            limit: Some(args.limit),
            start: args.start,
            additional_fields: args.options.clone(),
            ..Default::default()
        };

        let changes = client.changes().query(&options).await?;
        let output = global.output();
        for change in &changes {
            output.write_item(
                &format!("Change {}: {} ({})", change.number, change.subject, change.status),
                change,
            )?;
        }
        Ok(())
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let (client, _) = global.connect()?;
        let input = ChangeInput {
            project: args.project.clone(),
            branch: args.branch.clone(),
            subject: args.subject.clone(),
            topic: args.topic.clone(),
            work_in_progress: args.wip,
            ..Default::default()
        };

        let change = client
            .changes()
            .create(&input)
            .await
            .with_context(|| format!("failed to create change on {}/{}", args.project, args.branch))?;
        let summary = format!("Created change {}", change.id());
        match change.raw() {
            Some(info) => global.output().write_item(&summary, info),
            None => {
                global.output().write_success(&summary);
                Ok(())
            }
        }
    }

    async fn show(&self, args: &ShowArgs, global: &GlobalOptions) -> Result<()> {
        let (client, _) = global.connect()?;
        let options = ChangeOptions {
            additional_fields: args.options.clone(),
        };
        let change = client
            .changes()
            .get(&args.change, &options)
            .await
            .with_context(|| format!("unable to find change {}", args.change))?;

        let output = global.output();
        match change.raw() {
            Some(info) => output.write_item(
                &format!(
                    "Change {}: {} [{} {} {}]",
                    info.number, info.subject, info.project, info.branch, info.status
                ),
                info,
            ),
            None => {
                output.write_success(&format!("Change {}", change.id()));
                Ok(())
            }
        }
    }

    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        let (client, _) = global.connect()?;
        client
            .changes()
            .delete(&args.change)
            .await
            .with_context(|| format!("failed to delete change {}", args.change))?;
        global
            .output()
            .write_success(&format!("Deleted change {}", args.change));
        Ok(())
    }
}
