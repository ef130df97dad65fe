//
//  bitbucket-server-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Server Client Library
//!
//! A typed async client for the Bitbucket Server / Data Center REST API,
//! plus the `bbs` command-line tool built on it.
//!
//! ## Overview
//!
//! The library exposes create, read, update and delete operations for
//! projects and repositories, and group permission management for
//! projects. Requests are authenticated with HTTP Basic credentials,
//! validated locally before anything is sent, and every HTTP outcome is
//! translated into a small typed error taxonomy.
//!
//! ## Module Structure
//!
//! - [`api`]: Request builder, response interpreter, dispatcher and operation sets
//! - [`auth`]: Basic credentials
//! - [`config`]: Connection configuration and the CLI settings file
//! - [`cli`]: Command-line interface definitions using clap
//! - [`output`]: Output formatting (Table, JSON)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bitbucket_server_client::api::server::{CreateProjectRequest, DeleteProjectRequest};
//! use bitbucket_server_client::api::{BitbucketClient, RequestContext};
//! use bitbucket_server_client::config::{ClientConfig, Scheme};
//!
//! # async fn example() -> Result<(), bitbucket_server_client::api::ApiError> {
//! let config = ClientConfig::new("localhost:7990", "admin", "admin").with_scheme(Scheme::Http);
//! let client = BitbucketClient::connect(config).await?;
//! let ctx = RequestContext::background();
//!
//! let project = client
//!     .projects()
//!     .create_project(
//!         &ctx,
//!         &CreateProjectRequest {
//!             key: "TPO".to_string(),
//!             name: "TestProject".to_string(),
//!             is_public: Some(true),
//!             ..Default::default()
//!         },
//!     )
//!     .await?;
//!
//! client
//!     .projects()
//!     .delete_project(&ctx, &DeleteProjectRequest::new(project.key))
//!     .await?;
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
///
/// Contains the `bbs` commands, arguments, and subcommands defined using the
/// clap derive API.
pub mod cli;

/// The Bitbucket Server REST API client.
///
/// Builds authenticated requests, dispatches them, and maps responses to
/// typed results or typed errors.
pub mod api;

/// HTTP Basic credentials.
pub mod auth;

/// Connection configuration and the settings file.
///
/// The settings file lives in a platform-specific location:
/// - Linux: `~/.config/bbs/config.toml`
/// - macOS: `~/Library/Application Support/bbs/config.toml`
/// - Windows: `%APPDATA%\bbs\config.toml`
pub mod config;

/// Output formatting for the CLI.
pub mod output;

/// Re-export of the main CLI struct for convenient access.
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use bitbucket_server_client::Cli;
///
/// let cli = Cli::parse();
/// // Handle cli.command...
/// ```
pub use cli::Cli;

/// Re-export of the client, its configuration and the error type.
pub use api::{ApiError, BitbucketClient, ErrorKind};
pub use config::ClientConfig;

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes and configuration paths.
pub const APP_NAME: &str = "bbs";

/// Application version constant, taken from Cargo.toml at compile time.
///
/// # Example
///
/// ```rust
/// use bitbucket_server_client::VERSION;
///
/// println!("bbs version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Standardized exit codes following Unix conventions, allowing scripts
/// to programmatically detect the outcome of CLI operations.
///
/// # Exit Code Ranges
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource-related issues
/// - `16-31`: Operation-related issues
///
/// # Example
///
/// ```rust,no_run
/// use bitbucket_server_client::exit_codes;
/// use std::process;
///
/// // Exit with authentication error
/// process::exit(exit_codes::AUTH_ERROR);
/// ```
pub mod exit_codes {
    use crate::api::{ApiError, ErrorKind};

    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error.
    ///
    /// An unspecified error occurred during execution.
    /// Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage, arguments or request parameters.
    ///
    /// Use `--help` to see correct usage.
    pub const USAGE: i32 = 2;

    /// Authentication failed.
    ///
    /// The server rejected the credentials (HTTP 401).
    pub const AUTH_ERROR: i32 = 4;

    /// Resource not found.
    ///
    /// The requested project or repository does not exist (HTTP 404).
    pub const NOT_FOUND: i32 = 8;

    /// Resource already exists or is in a conflicting state (HTTP 409).
    pub const CONFLICT: i32 = 9;

    /// Operation cancelled, typically by pressing Ctrl+C.
    pub const CANCELLED: i32 = 16;

    /// Picks the exit code for an error returned by a command.
    ///
    /// The first [`ApiError`] in the error chain decides; errors that did
    /// not come from the API map to [`ERROR`].
    pub fn for_error(err: &anyhow::Error) -> i32 {
        let kind = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<ApiError>())
            .map(ApiError::kind);

        match kind {
            Some(ErrorKind::Permission) => AUTH_ERROR,
            Some(ErrorKind::NotFound) => NOT_FOUND,
            Some(ErrorKind::Conflict) => CONFLICT,
            Some(ErrorKind::Parameters) => USAGE,
            Some(ErrorKind::Cancelled) => CANCELLED,
            _ => ERROR,
        }
    }

}
