//
//  bitbucket-server-client
//  api/server/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Server/DC Repository API
//!
//! This module provides the types and operations for working with
//! repositories in Bitbucket Server/Data Center. Repositories are the core
//! unit of code storage and are always associated with a project.
//!
//! ## Repository Structure
//!
//! In Bitbucket Server/DC, repositories:
//! - Belong to exactly one project (identified by project key)
//! - Have a unique slug within their project
//! - Support Git as the primary SCM
//! - Can be public or private
//! - May or may not allow forking
//!
//! ## API Endpoint
//!
//! ```text
//! POST           /rest/api/1.0/projects/{projectKey}/repos
//! GET/PUT/DELETE /rest/api/1.0/projects/{projectKey}/repos/{repoSlug}
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_server_client::api::{BitbucketClient, RequestContext};
//! use bitbucket_server_client::api::server::repositories::CreateRepositoryRequest;
//! # async fn example(client: BitbucketClient) -> Result<(), bitbucket_server_client::api::ApiError> {
//! let request = CreateRepositoryRequest {
//!     project_key: "PROJECT".to_string(),
//!     name: "my-new-repo".to_string(),
//!     description: Some("A sample repository".to_string()),
//!     ..Default::default()
//! };
//!
//! let repo = client
//!     .repositories()
//!     .create_repository(&RequestContext::background(), &request)
//!     .await?;
//! println!("Created: {} with ID {}", repo.name, repo.id);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::projects::Project;
use crate::api::client::Dispatcher;
use crate::api::common::{ApiResult, ResultExt};
use crate::api::context::RequestContext;
use crate::api::validate::{require, require_if_present, require_segment, Validate};

/// Represents a repository in Bitbucket Server/Data Center.
///
/// # Fields
///
/// * `id` - Unique numeric identifier for the repository
/// * `slug` - URL-safe identifier used in API paths and clone URLs
/// * `name` - Human-readable display name of the repository
/// * `project` - The parent project containing this repository
/// * `scm_id` - Source control management type (typically "git")
/// * `state` - Current state of the repository (e.g., "AVAILABLE", "INITIALISING")
/// * `status_message` - Optional message about the current state
/// * `forkable` - Whether the repository allows forking
/// * `is_public` - Whether the repository is publicly accessible
///
/// # Example
///
/// ```rust,ignore
/// let repo: Repository = serde_json::from_str(json_response)?;
///
/// println!("Repository: {} ({})", repo.name, repo.slug);
/// println!("Project: {}", repo.project.key);
/// println!("Public: {}", repo.is_public);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    /// The project that contains this repository.
    pub project: Project,

    /// URL-friendly identifier, derived from the name and unique within the project.
    pub slug: String,

    /// Human-readable display name of the repository.
    pub name: String,

    /// Optional description of the repository's contents.
    pub description: Option<String>,

    /// Identifier shared by a repository and all of its forks.
    #[serde(rename = "hierarchyId")]
    pub hierarchy_id: String,

    /// Human-readable form of `state`, e.g. "Available".
    #[serde(rename = "statusMessage")]
    pub status_message: String,

    /// Whether the repository has been archived and is read-only.
    pub archived: bool,

    /// Whether users may fork the repository.
    pub forkable: bool,

    /// Default branch, when the server reports one.
    #[serde(rename = "defaultBranch")]
    pub default_branch: Option<String>,

    /// Source control system identifier, typically "git".
    #[serde(rename = "scmId")]
    pub scm_id: String,

    /// Scope of the repository, when the server reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Unique numeric identifier assigned by Bitbucket Server.
    pub id: u64,

    /// Lifecycle state: "AVAILABLE", "INITIALISING" or "INITIALISATION_FAILED".
    pub state: String,

    /// Whether the repository is publicly accessible.
    #[serde(rename = "public")]
    pub is_public: bool,
}

/// Identifies a repository to fetch.
#[derive(Debug, Clone, Default)]
pub struct GetRepositoryRequest {
    pub project_key: String,
    pub slug: String,
}

impl GetRepositoryRequest {
    pub fn new(project_key: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            slug: slug.into(),
        }
    }
}

impl Validate for GetRepositoryRequest {
    fn validate(&self) -> ApiResult<()> {
        require_segment("project key", &self.project_key)?;
        require_segment("slug", &self.slug)
    }
}

/// Request body for creating a new repository.
///
/// The repository is created in the project identified by `project_key`,
/// which only appears in the path. When `slug` is left out the server
/// derives one from the name.
///
/// # Example
///
/// ```rust,ignore
/// let request = CreateRepositoryRequest {
///     project_key: "PROJ".to_string(),
///     name: "my-service".to_string(),
///     forkable: Some(false),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateRepositoryRequest {
    /// Key of the project that will contain the repository.
    #[serde(skip)]
    pub project_key: String,

    /// Repository name.
    pub name: String,

    /// Explicit slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether forking is allowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forkable: Option<bool>,

    /// Whether the repository is public.
    #[serde(rename = "public")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl Validate for CreateRepositoryRequest {
    fn validate(&self) -> ApiResult<()> {
        require_segment("project key", &self.project_key)?;
        require("name", &self.name)?;
        match &self.slug {
            Some(slug) => require_segment("slug", slug),
            None => Ok(()),
        }
    }
}

/// Request body for updating an existing repository.
///
/// Only non-`None` fields change. Renaming a repository may change its slug;
/// the returned [`Repository`] carries the new one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateRepositoryRequest {
    #[serde(skip)]
    pub project_key: String,

    /// Current slug of the repository.
    pub slug: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub forkable: Option<bool>,

    #[serde(rename = "public")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl Validate for UpdateRepositoryRequest {
    fn validate(&self) -> ApiResult<()> {
        require_segment("project key", &self.project_key)?;
        require_segment("slug", &self.slug)?;
        require_if_present("name", self.name.as_deref())
    }
}

/// Identifies a repository to delete.
#[derive(Debug, Clone, Default)]
pub struct DeleteRepositoryRequest {
    pub project_key: String,
    pub slug: String,
}

impl DeleteRepositoryRequest {
    pub fn new(project_key: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            slug: slug.into(),
        }
    }
}

impl Validate for DeleteRepositoryRequest {
    fn validate(&self) -> ApiResult<()> {
        require_segment("project key", &self.project_key)?;
        require_segment("slug", &self.slug)
    }
}

/// Operations on Bitbucket Server repositories.
#[async_trait]
pub trait RepositoryService: Send + Sync {
    /// Fetches a repository by project key and slug.
    async fn get_repository(
        &self,
        ctx: &RequestContext,
        req: &GetRepositoryRequest,
    ) -> ApiResult<Repository>;

    /// Creates a repository inside a project.
    async fn create_repository(
        &self,
        ctx: &RequestContext,
        req: &CreateRepositoryRequest,
    ) -> ApiResult<Repository>;

    /// Updates a repository and returns its new state.
    async fn update_repository(
        &self,
        ctx: &RequestContext,
        req: &UpdateRepositoryRequest,
    ) -> ApiResult<Repository>;

    /// Deletes a repository.
    async fn delete_repository(
        &self,
        ctx: &RequestContext,
        req: &DeleteRepositoryRequest,
    ) -> ApiResult<()>;
}

/// [`RepositoryService`] backed by the REST API.
#[derive(Debug, Clone)]
pub struct ServerRepositories {
    dispatcher: Arc<Dispatcher>,
}

impl ServerRepositories {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

fn repos_path(project_key: &str) -> String {
    format!("projects/{}/repos", project_key.trim())
}

fn repo_path(project_key: &str, slug: &str) -> String {
    format!("{}/{}", repos_path(project_key), slug.trim())
}

#[async_trait]
impl RepositoryService for ServerRepositories {
    async fn get_repository(
        &self,
        ctx: &RequestContext,
        req: &GetRepositoryRequest,
    ) -> ApiResult<Repository> {
        req.validate()?;
        self.dispatcher
            .get(ctx, &repo_path(&req.project_key, &req.slug))
            .await
            .context("error fetching repository")
    }

    async fn create_repository(
        &self,
        ctx: &RequestContext,
        req: &CreateRepositoryRequest,
    ) -> ApiResult<Repository> {
        req.validate()?;
        self.dispatcher
            .post(ctx, &repos_path(&req.project_key), req)
            .await
            .context("error creating repository")
    }

    async fn update_repository(
        &self,
        ctx: &RequestContext,
        req: &UpdateRepositoryRequest,
    ) -> ApiResult<Repository> {
        req.validate()?;
        self.dispatcher
            .put(ctx, &repo_path(&req.project_key, &req.slug), req)
            .await
            .context("error updating repository")
    }

    async fn delete_repository(
        &self,
        ctx: &RequestContext,
        req: &DeleteRepositoryRequest,
    ) -> ApiResult<()> {
        req.validate()?;
        self.dispatcher
            .delete(ctx, &repo_path(&req.project_key, &req.slug))
            .await
            .context("error deleting repository")
    }
}
