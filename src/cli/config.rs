//
//  bitbucket-server-client
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI configuration commands
//!
//! Reads and writes the connection defaults kept in the settings file.
//! Passwords are never stored; use `BITBUCKET_PASSWORD`.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use crate::config::Settings;
use crate::output::TableBuilder;

use super::GlobalOptions;

/// Manage CLI configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset a configuration value
    Unset(UnsetArgs),

    /// Show all configuration values
    #[command(visible_alias = "list")]
    Show,

    /// Show configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key (host, scheme or username)
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key (host, scheme or username)
    pub key: String,

    /// Configuration value
    pub value: String,
}

#[derive(Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key (host, scheme or username)
    pub key: String,
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => self.get(args, global),
            ConfigSubcommand::Set(args) => self.set(args, global),
            ConfigSubcommand::Unset(args) => self.unset(args, global),
            ConfigSubcommand::Show => self.show(global),
            ConfigSubcommand::Path => self.path(global),
        }
    }

    fn get(&self, args: &GetArgs, global: &GlobalOptions) -> Result<()> {
        if !Settings::KEYS.contains(&args.key.as_str()) {
            anyhow::bail!(
                "Unknown setting '{}'. Valid keys: {}",
                args.key,
                Settings::KEYS.join(", ")
            );
        }

        let settings = global.load_settings()?;
        match settings.get(&args.key) {
            Some(value) => println!("{}", value),
            None => eprintln!("{} is not set", args.key),
        }
        Ok(())
    }

    fn set(&self, args: &SetArgs, global: &GlobalOptions) -> Result<()> {
        let path = global.settings_path()?;
        let mut settings = Settings::load_from(&path)?;
        settings.set(&args.key, &args.value)?;
        settings.save_to(&path)?;

        global.writer().write_outcome(
            &format!(
                "Set {} to {}",
                style(&args.key).cyan(),
                style(settings.get(&args.key).unwrap_or_default()).green()
            ),
            serde_json::json!({ "key": args.key, "value": settings.get(&args.key) }),
        )
    }

    fn unset(&self, args: &UnsetArgs, global: &GlobalOptions) -> Result<()> {
        let path = global.settings_path()?;
        let mut settings = Settings::load_from(&path)?;
        if settings.unset(&args.key)? {
            settings.save_to(&path)?;
        }

        global.writer().write_outcome(
            &format!("Unset {}", style(&args.key).cyan()),
            serde_json::json!({ "key": args.key, "value": null }),
        )
    }

    fn show(&self, global: &GlobalOptions) -> Result<()> {
        let settings = global.load_settings()?;

        if global.json {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            return Ok(());
        }

        let mut table = TableBuilder::new().headers(["KEY", "VALUE"]);
        for key in Settings::KEYS {
            table = table.row([
                key.to_string(),
                settings.get(key).unwrap_or_else(|| "-".to_string()),
            ]);
        }
        table.print();
        Ok(())
    }

    fn path(&self, global: &GlobalOptions) -> Result<()> {
        println!("{}", global.settings_path()?.display());
        Ok(())
    }
}
