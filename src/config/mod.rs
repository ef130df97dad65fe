//
//  bitbucket-server-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! This module holds the transport configuration of a client (where the
//! Bitbucket Server lives and how to authenticate against it) and the
//! on-disk settings file used by the `bbs` binary.
//!
//! ## Overview
//!
//! - [`ClientConfig`]: host, scheme and credentials; immutable once a client
//!   has been built from it
//! - [`Scheme`]: `http` or `https` (the default)
//! - [`Settings`]: persisted CLI defaults, stored as TOML
//!
//! ## Base URL
//!
//! Every request is resolved against `{scheme}://{host}/rest/api/1.0/`:
//!
//! ```rust
//! use bitbucket_server_client::config::{ClientConfig, Scheme};
//!
//! let config = ClientConfig::new("localhost:7990", "admin", "admin")
//!     .with_scheme(Scheme::Http);
//!
//! let base = config.base_url().unwrap();
//! assert_eq!(base.as_str(), "http://localhost:7990/rest/api/1.0/");
//! ```
//!
//! ## Submodules
//!
//! - `file`: The CLI settings file ([`Settings`])
//! - `hosts`: Host normalization ([`normalize_host`], [`split_host`])

mod file;
mod hosts;

pub use file::*;
pub use hosts::*;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::common::ApiError;
use crate::auth::BasicCredentials;

/// Root path of the Bitbucket Server REST API.
pub const API_PATH: &str = "/rest/api/1.0/";

/// Ceiling applied to every request, whatever the caller's own deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// URL scheme used to reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plain HTTP, mostly useful against local test instances.
    Http,
    /// HTTPS.
    #[default]
    Https,
}

impl Scheme {
    /// Returns the scheme as it appears in a URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(ApiError::Config(format!(
                "unsupported scheme '{other}', expected 'http' or 'https'"
            ))),
        }
    }
}

/// Connection parameters for a Bitbucket Server instance.
///
/// # Fields
///
/// * `host` - Host name, optionally with port and context path
///   (e.g. `bitbucket.example.com`, `localhost:7990`, `example.com/bitbucket`)
/// * `scheme` - Explicit scheme; when `None` the scheme embedded in `host`
///   is used, falling back to [`Scheme::Https`]
/// * `credentials` - Basic credentials sent with every request
///
/// # Example
///
/// ```rust
/// use bitbucket_server_client::config::{ClientConfig, Scheme};
///
/// let config = ClientConfig::new("https://bitbucket.example.com/", "jsmith", "secret");
/// assert_eq!(config.effective_scheme(), Scheme::Https);
/// assert_eq!(
///     config.base_url().unwrap().as_str(),
///     "https://bitbucket.example.com/rest/api/1.0/"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// The server host.
    pub host: String,
    /// The scheme, if set explicitly.
    pub scheme: Option<Scheme>,
    /// The credentials used for Basic authentication.
    pub credentials: BasicCredentials,
}

impl ClientConfig {
    /// Creates a configuration with the default scheme.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            scheme: None,
            credentials: BasicCredentials::new(username, password),
        }
    }

    /// Sets the scheme explicitly.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    /// Returns the scheme that requests will use.
    pub fn effective_scheme(&self) -> Scheme {
        self.scheme
            .or_else(|| split_host(&self.host).0)
            .unwrap_or_default()
    }

    /// Derives the base endpoint every relative API path is resolved against.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the host is empty or does not form a
    /// valid URL.
    pub fn base_url(&self) -> Result<Url, ApiError> {
        let host = normalize_host(&self.host);
        if host.is_empty() {
            return Err(ApiError::Config("host is required".to_string()));
        }

        let raw = format!("{}://{}{}", self.effective_scheme(), host, API_PATH);
        Url::parse(&raw).map_err(|e| ApiError::Config(format!("invalid host '{host}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scheme_is_https() {
        let config = ClientConfig::new("bitbucket.example.com", "u", "p");
        assert_eq!(config.effective_scheme(), Scheme::Https);
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://bitbucket.example.com/rest/api/1.0/"
        );
    }

    #[test]
    fn test_explicit_scheme_wins_over_host_prefix() {
        let config = ClientConfig::new("https://localhost:7990", "u", "p").with_scheme(Scheme::Http);
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "http://localhost:7990/rest/api/1.0/"
        );
    }

    #[test]
    fn test_scheme_from_host_prefix() {
        let config = ClientConfig::new("http://localhost:7990/", "u", "p");
        assert_eq!(config.effective_scheme(), Scheme::Http);
    }

    #[test]
    fn test_context_path_is_kept() {
        let config = ClientConfig::new("example.com/bitbucket", "u", "p");
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://example.com/bitbucket/rest/api/1.0/"
        );

        let config = ClientConfig::new("Example.COM/Bitbucket", "u", "p");
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://example.com/Bitbucket/rest/api/1.0/"
        );
    }

    #[test]
    fn test_empty_host_is_rejected() {
        let err = ClientConfig::new("  ", "u", "p").base_url().unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_scheme_parse() {
        assert_eq!("HTTP".parse::<Scheme>().unwrap(), Scheme::Http);
        assert_eq!("https".parse::<Scheme>().unwrap(), Scheme::Https);
        assert!("ftp".parse::<Scheme>().is_err());
    }
}
