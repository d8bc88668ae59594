//
//  gerrit-cli
//  cli/project.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project commands, including branch and tag listings.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::api::projects::{BranchOptions, DeleteOptionsInfo, ProjectInput, ProjectOptions, TagOptions};

use super::GlobalOptions;

/// Manage projects
#[derive(Args, Debug)]
pub struct ProjectCommand {
    #[command(subcommand)]
    pub command: ProjectSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProjectSubcommand {
    /// List projects
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Retrieve a project
    Show(ShowArgs),

    /// Create a new project
    Create(CreateArgs),

    /// Delete a project (requires the delete-project plugin)
    Delete(DeleteArgs),

    /// Branch related commands
    Branch(BranchCommand),

    /// Tag related commands
    Tag(TagCommand),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Maximum number of projects
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Skip the first N projects
    #[arg(long, short = 'S')]
    pub skip: Option<u32>,

    /// Only projects whose name starts with this prefix
    #[arg(long, short = 'p')]
    pub prefix: Option<String>,

    /// Only projects matching this regular expression
    #[arg(long, short = 'r')]
    pub regex: Option<String>,

    /// Only projects containing this substring
    #[arg(long = "match", short = 'm')]
    pub substring: Option<String>,

    /// Only projects having this branch
    #[arg(long, short = 'b')]
    pub branch: Option<String>,

    /// Include descriptions
    #[arg(long, short = 'd')]
    pub description: bool,

    /// Include the inheritance tree
    #[arg(long, short = 't', conflicts_with = "branch")]
    pub tree: bool,

    /// Project type
    #[arg(long = "type", short = 'T', value_parser = ["ALL", "CODE", "PERMISSIONS"])]
    pub project_type: Option<String>,

    /// Project state
    #[arg(long, short = 's', value_parser = ["ACTIVE", "READ_ONLY", "HIDDEN"])]
    pub state: Option<String>,

    /// Include hidden projects
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Project name
    pub name: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Project name
    pub name: String,

    /// Parent project
    #[arg(long, short = 'P')]
    pub parent: Option<String>,

    /// Project description
    #[arg(long, short = 'D')]
    pub description: Option<String>,

    /// Create an initial empty commit
    #[arg(long)]
    pub empty_commit: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Project name
    pub name: String,

    /// Delete even if the project has open changes
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Keep the git repository on disk
    #[arg(long)]
    pub preserve: bool,
}

#[derive(Args, Debug)]
pub struct BranchCommand {
    #[command(subcommand)]
    pub command: RefSubcommand,
}

#[derive(Args, Debug)]
pub struct TagCommand {
    #[command(subcommand)]
    pub command: RefSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RefSubcommand {
    /// List refs of a project
    #[command(visible_alias = "ls")]
    List(RefListArgs),
}

#[derive(Args, Debug)]
pub struct RefListArgs {
    /// Project name
    pub project: String,

    /// Maximum number of refs
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Skip the first N refs
    #[arg(long, short = 'S')]
    pub skip: Option<u32>,

    /// Only refs containing this substring
    #[arg(long = "match", short = 'm')]
    pub substring: Option<String>,

    /// Only refs matching this regular expression
    #[arg(long, short = 'r')]
    pub regex: Option<String>,
}

impl ProjectCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ProjectSubcommand::List(args) => self.list(args, global).await,
            ProjectSubcommand::Show(args) => self.show(args, global).await,
            ProjectSubcommand::Create(args) => self.create(args, global).await,
            ProjectSubcommand::Delete(args) => self.delete(args, global).await,
            ProjectSubcommand::Branch(cmd) => match &cmd.command {
                RefSubcommand::List(args) => self.branches(args, global).await,
            },
            ProjectSubcommand::Tag(cmd) => match &cmd.command {
                RefSubcommand::List(args) => self.tags(args, global).await,
            },
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let (client, _) = global.connect()?;
        let options = ProjectOptions {
            limit: args.limit,
            skip: args.skip,
            branch: args.branch.clone(),
            description: args.description,
            prefix: args.prefix.clone(),
            regex: args.regex.clone(),
            substring: args.substring.clone(),
            tree: args.tree,
            project_type: args.project_type.clone(),
            state: args.state.clone(),
            all: args.all,
        };

        let projects = client.projects().list(&options).await?;
        let output = global.output();
        for (name, info) in &projects {
            output.write_item(&format!("Project Name: {name}."), info)?;
        }
        Ok(())
    }

    async fn show(&self, args: &ShowArgs, global: &GlobalOptions) -> Result<()> {
        let (client, _) = global.connect()?;
        let project = client
            .projects()
            .get(&args.name)
            .await
            .with_context(|| format!("unable to find project {}", args.name))?;

        let output = global.output();
        match project.raw() {
            Some(info) => output.write_item(
                &format!(
                    "Project Name: {}, Id: {}, State: {}",
                    project.name(),
                    info.id,
                    info.state.as_deref().unwrap_or("ACTIVE")
                ),
                info,
            ),
            None => {
                output.write_success(&format!("Project Name: {}", project.name()));
                Ok(())
            }
        }
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let (client, _) = global.connect()?;
        let input = ProjectInput {
            parent: args.parent.clone(),
            description: args.description.clone(),
            create_empty_commit: args.empty_commit,
            ..Default::default()
        };

        let project = client
            .projects()
            .create(&args.name, &input)
            .await
            .with_context(|| format!("failed to create project {}", args.name))?;
        let summary = format!("Created project {}", project.name());
        match project.raw() {
            Some(info) => global.output().write_item(&summary, info),
            None => {
                global.output().write_success(&summary);
                Ok(())
            }
        }
    }

    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        let (client, _) = global.connect()?;
        let options = DeleteOptionsInfo {
            force: args.force,
            preserve: args.preserve,
        };
        client
            .projects()
            .delete(&args.name, &options)
            .await
            .with_context(|| format!("failed to delete project {}", args.name))?;
        global
            .output()
            .write_success(&format!("Deleted project {}", args.name));
        Ok(())
    }

    async fn branches(&self, args: &RefListArgs, global: &GlobalOptions) -> Result<()> {
        let (client, _) = global.connect()?;
        let options = BranchOptions {
            limit: args.limit,
            skip: args.skip,
            substring: args.substring.clone(),
            regex: args.regex.clone(),
        };

        let project = client.projects().project(&args.project);
        let branches = project.branches().list(&options).await?;
        let output = global.output();
        for branch in &branches {
            output.write_item(
                &format!("Branch Name: {} ({})", branch.reference, branch.revision),
                branch,
            )?;
        }
        Ok(())
    }

    async fn tags(&self, args: &RefListArgs, global: &GlobalOptions) -> Result<()> {
        let (client, _) = global.connect()?;
        let options = TagOptions {
            limit: args.limit,
            skip: args.skip,
            substring: args.substring.clone(),
            regex: args.regex.clone(),
        };

        let project = client.projects().project(&args.project);
        let tags = project.tags().list(&options).await?;
        let output = global.output();
        for tag in &tags {
            output.write_item(&format!("Tag Name: {}", tag.reference), tag)?;
        }
        Ok(())
    }
}
