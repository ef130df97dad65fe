//
//  bitbucket-server-client
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod config;
mod project;
mod repo;

pub use config::ConfigCommand;
pub use project::ProjectCommand;
pub use repo::RepoCommand;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::api::{BitbucketClient, RequestContext};
use crate::config::{ClientConfig, Scheme, Settings};
use crate::output::{OutputFormat, OutputWriter};

/// bbs - Manage Bitbucket Server projects and repositories from the command line
#[derive(Parser, Debug)]
#[command(
    name = "bbs",
    version,
    about = "Manage Bitbucket Server projects and repositories from the command line",
    long_about = "bbs drives the Bitbucket Server/Data Center REST API.\n\n\
                  Credentials are read from BITBUCKET_USERNAME and BITBUCKET_PASSWORD.",
    propagate_version = true,
    after_help = "Use 'bbs <command> --help' for more information about a command."
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
    /// Bitbucket Server host, e.g. bitbucket.example.com or localhost:7990
    #[arg(long, global = true, env = "BBS_HOST")]
    pub host: Option<String>,

    /// URL scheme (http or https)
    #[arg(long, global = true, env = "BBS_SCHEME")]
    pub scheme: Option<Scheme>,

    /// Username for Basic authentication
    #[arg(long, short = 'u', global = true, env = "BITBUCKET_USERNAME")]
    pub username: Option<String>,

    /// Password or personal access token for Basic authentication
    #[arg(long, global = true, env = "BITBUCKET_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Settings file to use instead of the default location
    #[arg(long, global = true, env = "BBS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Give up on a request after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl GlobalOptions {
    /// Returns the output writer for the selected format.
    pub fn writer(&self) -> OutputWriter {
        OutputWriter::new(OutputFormat::from_json_flag(self.json))
    }

    /// Returns the settings file path.
    pub fn settings_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Settings::config_path(),
        }
    }

    /// Loads the settings file, returning defaults when it does not exist.
    pub fn load_settings(&self) -> Result<Settings> {
        Settings::load_from(&self.settings_path()?)
    }

    /// Resolves connection parameters from flags, environment and settings,
    /// in that order.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let settings = self.load_settings()?;

        let host = self.host.clone().or(settings.server.host).ok_or_else(|| {
            anyhow!("No Bitbucket host configured. Use --host, BBS_HOST or 'bbs config set host <HOST>'.")
        })?;
        let username = self
            .username
            .clone()
            .or(settings.server.username)
            .ok_or_else(|| anyhow!("No username configured. Use --username or BITBUCKET_USERNAME."))?;
        let password = self
            .password
            .clone()
            .ok_or_else(|| anyhow!("No password configured. Set BITBUCKET_PASSWORD."))?;

        let mut config = ClientConfig::new(host, username, password);
        if let Some(scheme) = self.scheme.or(settings.server.scheme) {
            config = config.with_scheme(scheme);
        }
        Ok(config)
    }

    /// Builds the context for one command: cancelled by Ctrl-C and bounded
    /// by `--timeout` when given.
    pub fn request_context(&self) -> RequestContext {
        let token = CancellationToken::new();
        let on_interrupt = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });

        let ctx = RequestContext::background().with_cancellation(token);
        match self.timeout {
            Some(secs) => ctx.with_timeout(Duration::from_secs(secs)),
            None => ctx,
        }
    }

    /// Connects to the configured server.
    pub async fn connect(&self, ctx: &RequestContext) -> Result<BitbucketClient> {
        let config = self.client_config()?;
        Ok(BitbucketClient::connect_with(config, ctx).await?)
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage projects
    #[command(visible_alias = "proj")]
    Project(ProjectCommand),

    /// Manage repositories
    #[command(visible_alias = "r")]
    Repo(RepoCommand),

    /// Manage CLI configuration
    Config(ConfigCommand),

    /// Print version information
    Version,
}
