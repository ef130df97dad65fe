//
//  bitbucket-server-client
//  cli/project.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project commands
//!
//! Projects are the primary organizational unit on Bitbucket Server. These
//! commands view, create, edit and delete them and manage the permissions
//! groups hold on them.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::api::server::{
    AddPermissionRequest, CreateProjectRequest, DeleteProjectRequest, GetProjectRequest,
    PermissionLevel, RevokePermissionRequest, UpdateProjectRequest,
};

use super::GlobalOptions;

/// Manage projects
#[derive(Args, Debug)]
pub struct ProjectCommand {
    #[command(subcommand)]
    pub command: ProjectSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProjectSubcommand {
    /// View project details
    View(ViewArgs),

    /// Create a project
    Create(CreateArgs),

    /// Edit a project
    Edit(EditArgs),

    /// Delete a project
    Delete(DeleteArgs),

    /// Grant a group a permission on a project
    Grant(GrantArgs),

    /// Revoke all of a group's permissions on a project
    Revoke(RevokeArgs),
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Project key
    pub project: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Project key (uppercase)
    #[arg(long, short = 'k')]
    pub key: String,

    /// Project name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Project description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Make project public
    #[arg(long)]
    pub public: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Project key
    pub project: String,

    /// New name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Whether the project is public
    #[arg(long)]
    pub public: Option<bool>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Project key
    pub project: String,

    /// Confirm the deletion
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Args, Debug)]
pub struct GrantArgs {
    /// Project key
    pub project: String,

    /// Group name
    #[arg(long, short = 'g')]
    pub group: String,

    /// Permission level: PROJECT_READ, PROJECT_WRITE or PROJECT_ADMIN
    #[arg(long, short = 'p', default_value = "PROJECT_READ")]
    pub permission: PermissionLevel,
}

#[derive(Args, Debug)]
pub struct RevokeArgs {
    /// Project key
    pub project: String,

    /// Group name
    #[arg(long, short = 'g')]
    pub group: String,
}

impl ProjectCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ProjectSubcommand::View(args) => self.view(args, global).await,
            ProjectSubcommand::Create(args) => self.create(args, global).await,
            ProjectSubcommand::Edit(args) => self.edit(args, global).await,
            ProjectSubcommand::Delete(args) => self.delete(args, global).await,
            ProjectSubcommand::Grant(args) => self.grant(args, global).await,
            ProjectSubcommand::Revoke(args) => self.revoke(args, global).await,
        }
    }

    /// View project details
    async fn view(&self, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = global.request_context();
        let client = global.connect(&ctx).await?;

        let project = client
            .projects()
            .get_project(&ctx, &GetProjectRequest::new(&args.project))
            .await?;

        global.writer().write(&project)
    }

    /// Create a project
    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = global.request_context();
        let client = global.connect(&ctx).await?;

        let request = CreateProjectRequest {
            key: args.key.to_uppercase(),
            name: args.name.clone(),
            description: args.description.clone(),
            is_public: Some(args.public),
        };

        let project = client.projects().create_project(&ctx, &request).await?;

        let writer = global.writer();
        if !global.json {
            writer.write_success(&format!(
                "Created project {}",
                style(&project.key).cyan().bold()
            ));
            println!();
        }
        writer.write(&project)
    }

    /// Edit a project
    async fn edit(&self, args: &EditArgs, global: &GlobalOptions) -> Result<()> {
        if args.name.is_none() && args.description.is_none() && args.public.is_none() {
            bail!("No changes specified. Use --name, --description, or --public.");
        }

        let ctx = global.request_context();
        let client = global.connect(&ctx).await?;

        let request = UpdateProjectRequest {
            key: args.project.clone(),
            name: args.name.clone(),
            description: args.description.clone(),
            is_public: args.public,
        };

        let project = client.projects().update_project(&ctx, &request).await?;

        let writer = global.writer();
        if !global.json {
            writer.write_success(&format!(
                "Updated project {}",
                style(&project.key).cyan().bold()
            ));
            println!();
        }
        writer.write(&project)
    }

    /// Delete a project
    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        if !args.confirm {
            bail!(
                "Deleting project '{}' cannot be undone. Re-run with --confirm to proceed.",
                args.project
            );
        }

        let ctx = global.request_context();
        let client = global.connect(&ctx).await?;

        client
            .projects()
            .delete_project(&ctx, &DeleteProjectRequest::new(&args.project))
            .await?;

        global.writer().write_outcome(
            &format!("Deleted project {}", style(&args.project).red()),
            serde_json::json!({
                "success": true,
                "deleted": args.project,
            }),
        )
    }

    /// Grant a group a permission
    async fn grant(&self, args: &GrantArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = global.request_context();
        let client = global.connect(&ctx).await?;

        let request = AddPermissionRequest {
            project_key: args.project.clone(),
            group: args.group.clone(),
            permission: args.permission,
        };
        client.projects().add_permission(&ctx, &request).await?;

        global.writer().write_outcome(
            &format!(
                "Granted {} on {} to group {}",
                style(args.permission).yellow(),
                style(&args.project).cyan().bold(),
                style(&args.group).cyan()
            ),
            serde_json::json!({
                "success": true,
                "project": args.project,
                "group": args.group,
                "permission": args.permission,
            }),
        )
    }

    /// Revoke a group's permissions
    async fn revoke(&self, args: &RevokeArgs, global: &GlobalOptions) -> Result<()> {
        let ctx = global.request_context();
        let client = global.connect(&ctx).await?;

        let request = RevokePermissionRequest {
            project_key: args.project.clone(),
            group: args.group.clone(),
        };
        client.projects().revoke_permission(&ctx, &request).await?;

        global.writer().write_outcome(
            &format!(
                "Revoked permissions on {} from group {}",
                style(&args.project).cyan().bold(),
                style(&args.group).red()
            ),
            serde_json::json!({
                "success": true,
                "project": args.project,
                "group": args.group,
            }),
        )
    }
}
