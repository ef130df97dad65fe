//
//  bitbucket-server-client
//  cli/repo.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository commands

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::api::server::{
    CreateRepositoryRequest, DeleteRepositoryRequest, GetRepositoryRequest,
    UpdateRepositoryRequest,
};

use super::GlobalOptions;

/// Manage repositories
#[derive(Args, Debug)]
pub struct RepoCommand {
    #[command(subcommand)]
    pub command: RepoSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RepoSubcommand {
    /// View repository details
    View(ViewArgs),

    /// Create a repository
    Create(CreateArgs),

    /// Edit a repository
    Edit(EditArgs),

    /// Delete a repository
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Repository in PROJECT/SLUG format
    pub repo: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Key of the project that will contain the repository
    pub project: String,

    /// Repository name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Repository slug (derived from the name when omitted)
    #[arg(long, short = 's')]
    pub slug: Option<String>,

    /// Repository description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Make repository public
    #[arg(long)]
    pub public: bool,

    /// Disallow forking
    #[arg(long)]
    pub no_fork: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Repository in PROJECT/SLUG format
    pub repo: String,

    /// New name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Whether the repository is public
    #[arg(long)]
    pub public: Option<bool>,

    /// Whether the repository can be forked
    #[arg(long)]
    pub forkable: Option<bool>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Repository in PROJECT/SLUG format
    pub repo: String,

    /// Confirm the deletion
    #[arg(long)]
    pub confirm: bool,
}

/// Splits a `PROJECT/SLUG` reference.
fn parse_repo_ref(repo: &str) -> Result<(String, String)> {
    match repo.trim().split_once('/') {
        Some((project, slug))
            if !project.is_empty() && !slug.is_empty() && !slug.contains('/') =>
        {
            Ok((project.to_string(), slug.to_string()))
        }
        _ => bail!("Invalid repository '{}'. Expected PROJECT/SLUG format.", repo),
    }
}

impl RepoCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            RepoSubcommand::View(args) => self.view(args, global).await,
            RepoSubcommand::Create(args) => self.create(args, global).await,
            RepoSubcommand::Edit(args) => self.edit(args, global).await,
            RepoSubcommand::Delete(args) => self.delete(args, global).await,
        }
    }

    /// View repository details
    async fn view(&self, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
        let (project, slug) = parse_repo_ref(&args.repo)?;

        let ctx = global.request_context();
        let client = global.connect(&ctx).await?;

        let repo = client
            .repositories()
            .get_repository(&ctx, &GetRepositoryRequest::new(project, slug))
            .await?;

        global.writer().write(&repo)
    }

    /// Create a repository
    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = global.request_context();
        let client = global.connect(&ctx).await?;

        let request = CreateRepositoryRequest {
            project_key: args.project.clone(),
            name: args.name.clone(),
            slug: args.slug.clone(),
            description: args.description.clone(),
            forkable: Some(!args.no_fork),
            is_public: Some(args.public),
        };

        let repo = client.repositories().create_repository(&ctx, &request).await?;

        let writer = global.writer();
        if !global.json {
            writer.write_success(&format!(
                "Created repository {}/{}",
                style(&repo.project.key).cyan(),
                style(&repo.slug).cyan().bold()
            ));
            println!();
        }
        writer.write(&repo)
    }

    /// Edit a repository
    async fn edit(&self, args: &EditArgs, global: &GlobalOptions) -> Result<()> {
        let (project, slug) = parse_repo_ref(&args.repo)?;

        if args.name.is_none()
            && args.description.is_none()
            && args.public.is_none()
            && args.forkable.is_none()
        {
            bail!("No changes specified. Use --name, --description, --public, or --forkable.");
        }

        let ctx = global.request_context();
        let client = global.connect(&ctx).await?;

        let request = UpdateRepositoryRequest {
            project_key: project,
            slug,
            name: args.name.clone(),
            description: args.description.clone(),
            forkable: args.forkable,
            is_public: args.public,
        };

        let repo = client.repositories().update_repository(&ctx, &request).await?;

        let writer = global.writer();
        if !global.json {
            writer.write_success(&format!(
                "Updated repository {}/{}",
                style(&repo.project.key).cyan(),
                style(&repo.slug).cyan().bold()
            ));
            println!();
        }
        writer.write(&repo)
    }

    /// Delete a repository
    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        let (project, slug) = parse_repo_ref(&args.repo)?;

        if !args.confirm {
            bail!(
                "Deleting repository '{}' cannot be undone. Re-run with --confirm to proceed.",
                args.repo
            );
        }

        let ctx = global.request_context();
        let client = global.connect(&ctx).await?;

        client
            .repositories()
            .delete_repository(&ctx, &DeleteRepositoryRequest::new(project, slug))
            .await?;

        global.writer().write_outcome(
            &format!("Deleted repository {}", style(&args.repo).red()),
            serde_json::json!({
                "success": true,
                "deleted": args.repo,
            }),
        )
    }
}
