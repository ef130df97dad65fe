//
//  bitbucket-server-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the request/response pipeline for the Bitbucket
//! Server REST API and the resource operations built on it.
//!
//! ## Architecture
//!
//! The API layer is organized as follows:
//!
//! - [`request`]: Builds authenticated requests from typed inputs
//! - [`response`]: Maps status codes and bodies to results or typed errors
//! - [`client`]: The [`Dispatcher`] and the [`BitbucketClient`] facade
//! - [`context`]: Per-call cancellation and deadlines
//! - [`validate`]: Local request validation
//! - [`server`]: Project and repository operation sets
//! - [`common`]: The error taxonomy
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbucket_server_client::api::{BitbucketClient, ErrorKind, RequestContext};
//! use bitbucket_server_client::api::server::GetProjectRequest;
//! use bitbucket_server_client::config::ClientConfig;
//!
//! # async fn example() -> Result<(), bitbucket_server_client::api::ApiError> {
//! let client = BitbucketClient::connect(ClientConfig::new("bitbucket.example.com", "admin", "secret")).await?;
//!
//! match client
//!     .projects()
//!     .get_project(&RequestContext::background(), &GetProjectRequest::new("TPO"))
//!     .await
//! {
//!     Ok(project) => println!("{}", project.name),
//!     Err(e) if e.is(ErrorKind::NotFound) => println!("no such project"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! API errors are returned as [`ApiError`] variants. The sentinel statuses
//! map as follows:
//!
//! - `Permission`: 401 Unauthorized
//! - `NotFound`: 404 Not Found
//! - `Conflict`: 409 Conflict
//!
//! Every other non-2xx status is `UnexpectedStatus`.

/// Dispatcher and client facade.
pub mod client;

/// Error taxonomy shared by every layer.
pub mod common;

/// Cancellation tokens and deadlines for individual calls.
pub mod context;

/// Request building.
pub mod request;

/// Response interpretation.
pub mod response;

/// Bitbucket Server/Data Center API v1.0 operation sets.
///
/// - [`server::projects`]: Project operations
/// - [`server::repositories`]: Repository operations
pub mod server;

/// Local request validation.
pub mod validate;

pub use client::{BitbucketClient, Dispatcher};
pub use common::{ApiError, ApiResult, ErrorKind, ResultExt};
pub use context::RequestContext;
pub use request::{OutboundRequest, RequestBuilder};
pub use response::InboundResponse;
pub use validate::Validate;
