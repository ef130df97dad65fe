//
//  bitbucket-server-client
//  config/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Settings File
//!
//! The `bbs` binary keeps connection defaults in a TOML file stored in the
//! platform configuration directory:
//!
//! - **Linux**: `~/.config/bbs/config.toml`
//! - **macOS**: `~/Library/Application Support/bbs/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\bbs\config.toml`
//!
//! ```toml
//! [server]
//! host = "bitbucket.example.com"
//! scheme = "https"
//! username = "jsmith"
//! ```
//!
//! Passwords are never written to or read from this file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::{normalize_host, Scheme};

/// Persisted CLI settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Defaults for the target server.
    #[serde(default)]
    pub server: ServerSettings,
}

/// Server connection defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Default host, e.g. `bitbucket.example.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Default scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<Scheme>,

    /// Default username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Settings {
    /// Keys accepted by [`Settings::get`] and [`Settings::set`].
    pub const KEYS: [&'static str; 3] = ["host", "scheme", "username"];

    /// Loads settings from the default location.
    ///
    /// A missing file is not an error; defaults are returned instead.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads settings from `path`, returning defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Saves settings to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves settings to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the path of the settings file.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns a setting by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "host" => self.server.host.clone(),
            "scheme" => self.server.scheme.map(|s| s.to_string()),
            "username" => self.server.username.clone(),
            _ => None,
        }
    }

    /// Sets a setting by key.
    ///
    /// Hosts are normalized before being stored.
    ///
    /// # Errors
    ///
    /// Fails for unknown keys and for schemes other than `http`/`https`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "host" => self.server.host = Some(normalize_host(value)),
            "scheme" => self.server.scheme = Some(value.parse()?),
            "username" => self.server.username = Some(value.trim().to_string()),
            other => anyhow::bail!(
                "Unknown setting '{}'. Valid keys: {}",
                other,
                Self::KEYS.join(", ")
            ),
        }
        Ok(())
    }

    /// Clears a setting by key, returning whether it had a value.
    pub fn unset(&mut self, key: &str) -> Result<bool> {
        let had_value = match key {
            "host" => self.server.host.take().is_some(),
            "scheme" => self.server.scheme.take().is_some(),
            "username" => self.server.username.take().is_some(),
            other => anyhow::bail!(
                "Unknown setting '{}'. Valid keys: {}",
                other,
                Self::KEYS.join(", ")
            ),
        };
        Ok(had_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.set("host", "https://Bitbucket.Example.com/").unwrap();
        settings.set("scheme", "http").unwrap();
        settings.set("username", "jsmith").unwrap();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.get("host").as_deref(), Some("bitbucket.example.com"));
        assert_eq!(loaded.server.scheme, Some(Scheme::Http));
        assert_eq!(loaded.get("username").as_deref(), Some("jsmith"));
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        let mut settings = Settings::default();
        assert!(settings.set("password", "x").is_err());
        assert!(settings.set("scheme", "gopher").is_err());
    }

    #[test]
    fn test_unset() {
        let mut settings = Settings::default();
        settings.set("username", "jsmith").unwrap();
        assert!(settings.unset("username").unwrap());
        assert!(!settings.unset("username").unwrap());
        assert!(settings.unset("password").is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nhost = ").unwrap();
        assert!(Settings::load_from(&path).is_err());
    }
}
