//
//  bitbucket-server-client
//  api/server/projects.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Server/DC Project API
//!
//! This module provides the types and operations for working with projects
//! in Bitbucket Server/Data Center. Projects are containers that group
//! related repositories together and provide shared access control.
//!
//! ## Project Structure
//!
//! In Bitbucket Server/DC, projects:
//! - Have a unique key (short uppercase identifier used in URLs)
//! - Contain one or more repositories
//! - Define access permissions for all contained repositories
//! - Can be public or private
//! - Have a type indicating their purpose (NORMAL or PERSONAL)
//!
//! ## API Endpoints
//!
//! ```text
//! POST           /rest/api/1.0/projects
//! GET/PUT/DELETE /rest/api/1.0/projects/{projectKey}
//! PUT/DELETE     /rest/api/1.0/projects/{projectKey}/permissions/groups?name={group}[&permission={level}]
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_server_client::api::{BitbucketClient, RequestContext};
//! use bitbucket_server_client::api::server::projects::CreateProjectRequest;
//! # async fn example(client: BitbucketClient) -> Result<(), bitbucket_server_client::api::ApiError> {
//! let ctx = RequestContext::background();
//!
//! let request = CreateProjectRequest {
//!     key: "MYPROJ".to_string(),
//!     name: "My Project".to_string(),
//!     description: Some("A sample project for demonstration".to_string()),
//!     is_public: Some(false),
//! };
//!
//! let project = client.projects().create_project(&ctx, &request).await?;
//! println!("Created project: {} ({})", project.name, project.key);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::api::client::Dispatcher;
use crate::api::common::{ApiError, ApiResult, ResultExt};
use crate::api::context::RequestContext;
use crate::api::validate::{require, require_if_present, require_segment, Validate};

/// Represents a project in Bitbucket Server/Data Center.
///
/// Fields the server leaves out fall back to their defaults, so a partial
/// response still decodes.
///
/// # Notes
///
/// - Personal projects have keys starting with "~" (e.g., "~jsmith")
/// - Project keys are case-insensitive but typically uppercase
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    /// Human-readable display name of the project.
    pub name: String,

    /// Short uppercase key used in URLs and API paths.
    pub key: String,

    /// Unique numeric identifier assigned by Bitbucket Server.
    pub id: u64,

    /// Optional description explaining the project's purpose.
    pub description: Option<String>,

    /// Scope of the project, when the server reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Type of the project: "NORMAL" or "PERSONAL".
    #[serde(rename = "type")]
    pub project_type: String,

    /// Whether the project is publicly accessible.
    #[serde(rename = "public")]
    pub is_public: bool,
}

/// Identifies a project to fetch.
#[derive(Debug, Clone, Default)]
pub struct GetProjectRequest {
    /// The project key.
    pub key: String,
}

impl GetProjectRequest {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Validate for GetProjectRequest {
    fn validate(&self) -> ApiResult<()> {
        require_segment("key", &self.key)
    }
}

/// Request body for creating a new project.
///
/// # Notes
///
/// - Project keys must be unique and typically use uppercase letters
/// - The key cannot be changed after project creation
/// - Optional fields use `skip_serializing_if` to omit `None` values from JSON
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateProjectRequest {
    /// Unique key for the new project.
    pub key: String,

    /// Human-readable name for the project.
    pub name: String,

    /// Optional description of the project's purpose.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the project should be publicly accessible.
    #[serde(rename = "public")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl Validate for CreateProjectRequest {
    fn validate(&self) -> ApiResult<()> {
        require_segment("key", &self.key)?;
        require("name", &self.name)
    }
}

/// Request body for updating an existing project.
///
/// Only non-`None` fields are sent, so only they change. The key selects
/// the project and cannot itself be changed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProjectRequest {
    /// Key of the project to update.
    pub key: String,

    /// New name for the project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New description. Use `Some("")` to clear it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// New public visibility setting.
    #[serde(rename = "public")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl Validate for UpdateProjectRequest {
    fn validate(&self) -> ApiResult<()> {
        require_segment("key", &self.key)?;
        require_if_present("name", self.name.as_deref())
    }
}

/// Identifies a project to delete.
#[derive(Debug, Clone, Default)]
pub struct DeleteProjectRequest {
    /// The project key.
    pub key: String,
}

impl DeleteProjectRequest {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Validate for DeleteProjectRequest {
    fn validate(&self) -> ApiResult<()> {
        require_segment("key", &self.key)
    }
}

/// Permission level a group can hold on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionLevel {
    ProjectRead,
    ProjectWrite,
    ProjectAdmin,
}

impl PermissionLevel {
    /// All levels, weakest first.
    pub const ALL: [PermissionLevel; 3] = [Self::ProjectRead, Self::ProjectWrite, Self::ProjectAdmin];

    /// Returns the level as the server spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectRead => "PROJECT_READ",
            Self::ProjectWrite => "PROJECT_WRITE",
            Self::ProjectAdmin => "PROJECT_ADMIN",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionLevel {
    type Err = ApiError;

    /// Accepts `PROJECT_READ`, `project-read`, `read` and similar spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        let normalized = normalized.strip_prefix("PROJECT_").unwrap_or(&normalized);
        match normalized {
            "READ" => Ok(Self::ProjectRead),
            "WRITE" => Ok(Self::ProjectWrite),
            "ADMIN" => Ok(Self::ProjectAdmin),
            _ => {
                let allowed: Vec<&str> = Self::ALL.iter().map(|level| level.as_str()).collect();
                Err(ApiError::parameters(format!(
                    "permission must be one of {}, got '{}'",
                    allowed.join(", "),
                    s.trim()
                )))
            }
        }
    }
}

/// Grants a group a permission level on a project.
#[derive(Debug, Clone)]
pub struct AddPermissionRequest {
    /// Key of the project.
    pub project_key: String,
    /// Name of the group.
    pub group: String,
    /// Level to grant.
    pub permission: PermissionLevel,
}

impl Validate for AddPermissionRequest {
    fn validate(&self) -> ApiResult<()> {
        require_segment("project key", &self.project_key)?;
        require("group", &self.group)
    }
}

/// Removes every permission a group holds on a project.
#[derive(Debug, Clone, Default)]
pub struct RevokePermissionRequest {
    /// Key of the project.
    pub project_key: String,
    /// Name of the group.
    pub group: String,
}

impl Validate for RevokePermissionRequest {
    fn validate(&self) -> ApiResult<()> {
        require_segment("project key", &self.project_key)?;
        require("group", &self.group)
    }
}

/// Operations on Bitbucket Server projects.
#[async_trait]
pub trait ProjectService: Send + Sync {
    /// Fetches a project by key.
    async fn get_project(&self, ctx: &RequestContext, req: &GetProjectRequest) -> ApiResult<Project>;

    /// Creates a project.
    async fn create_project(
        &self,
        ctx: &RequestContext,
        req: &CreateProjectRequest,
    ) -> ApiResult<Project>;

    /// Updates a project and returns its new state.
    async fn update_project(
        &self,
        ctx: &RequestContext,
        req: &UpdateProjectRequest,
    ) -> ApiResult<Project>;

    /// Deletes a project. The project must not contain repositories.
    async fn delete_project(&self, ctx: &RequestContext, req: &DeleteProjectRequest) -> ApiResult<()>;

    /// Grants a group a permission on a project.
    async fn add_permission(&self, ctx: &RequestContext, req: &AddPermissionRequest) -> ApiResult<()>;

    /// Revokes all of a group's permissions on a project.
    async fn revoke_permission(
        &self,
        ctx: &RequestContext,
        req: &RevokePermissionRequest,
    ) -> ApiResult<()>;
}

/// [`ProjectService`] backed by the REST API.
#[derive(Debug, Clone)]
pub struct ServerProjects {
    dispatcher: Arc<Dispatcher>,
}

impl ServerProjects {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

fn project_path(key: &str) -> String {
    format!("projects/{}", key.trim())
}

fn group_permissions_path(project_key: &str, pairs: &[(&str, &str)]) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("{}/permissions/groups?{}", project_path(project_key), query)
}

#[async_trait]
impl ProjectService for ServerProjects {
    async fn get_project(&self, ctx: &RequestContext, req: &GetProjectRequest) -> ApiResult<Project> {
        req.validate()?;
        self.dispatcher
            .get(ctx, &project_path(&req.key))
            .await
            .context("error fetching project")
    }

    async fn create_project(
        &self,
        ctx: &RequestContext,
        req: &CreateProjectRequest,
    ) -> ApiResult<Project> {
        req.validate()?;
        self.dispatcher
            .post(ctx, "projects", req)
            .await
            .context("error creating project")
    }

    async fn update_project(
        &self,
        ctx: &RequestContext,
        req: &UpdateProjectRequest,
    ) -> ApiResult<Project> {
        req.validate()?;
        self.dispatcher
            .put(ctx, &project_path(&req.key), req)
            .await
            .context("error updating project")
    }

    async fn delete_project(&self, ctx: &RequestContext, req: &DeleteProjectRequest) -> ApiResult<()> {
        req.validate()?;
        self.dispatcher
            .delete(ctx, &project_path(&req.key))
            .await
            .context("error deleting project")
    }

    async fn add_permission(&self, ctx: &RequestContext, req: &AddPermissionRequest) -> ApiResult<()> {
        req.validate()?;
        let path = group_permissions_path(
            &req.project_key,
            &[("name", req.group.as_str()), ("permission", req.permission.as_str())],
        );
        self.dispatcher
            .send_empty(ctx, Method::PUT, &path)
            .await
            .context("error adding permission to project")
    }

    async fn revoke_permission(
        &self,
        ctx: &RequestContext,
        req: &RevokePermissionRequest,
    ) -> ApiResult<()> {
        req.validate()?;
        let path = group_permissions_path(&req.project_key, &[("name", req.group.as_str())]);
        self.dispatcher
            .delete(ctx, &path)
            .await
            .context("error revoking permission from project")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::ErrorKind;

    #[test]
    fn test_create_request_omits_empty_optionals() {
        let request = CreateProjectRequest {
            key: "TPO".to_string(),
            name: "TestProject".to_string(),
            description: None,
            is_public: Some(true),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"key": "TPO", "name": "TestProject", "public": true})
        );
    }

    #[test]
    fn test_update_request_body() {
        let request = UpdateProjectRequest {
            key: "TPO".to_string(),
            description: Some("X".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"key": "TPO", "description": "X"})
        );
    }

    #[test]
    fn test_project_decodes_partial_body() {
        let project: Project =
            serde_json::from_str(r#"{"key":"TPO","name":"TestProject","id":3,"public":true,"type":"NORMAL"}"#)
                .unwrap();
        assert_eq!(project.key, "TPO");
        assert_eq!(project.project_type, "NORMAL");
        assert!(project.is_public);
        assert_eq!(project.description, None);
    }

    #[test]
    fn test_validation() {
        let err = CreateProjectRequest {
            key: "TPO".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(err.is(ErrorKind::Parameters));
        assert!(GetProjectRequest::new("").validate().is_err());
        assert!(DeleteProjectRequest::new("TPO").validate().is_ok());
        assert!(UpdateProjectRequest {
            key: "TPO".to_string(),
            name: Some(" ".to_string()),
            ..Default::default()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_permission_level_parse() {
        assert_eq!("PROJECT_READ".parse::<PermissionLevel>().unwrap(), PermissionLevel::ProjectRead);
        assert_eq!("project-write".parse::<PermissionLevel>().unwrap(), PermissionLevel::ProjectWrite);
        assert_eq!("admin".parse::<PermissionLevel>().unwrap(), PermissionLevel::ProjectAdmin);

        let err = "REPO_READ".parse::<PermissionLevel>().unwrap_err();
        assert!(err.is(ErrorKind::Parameters));
        assert!(err
            .to_string()
            .contains("one of PROJECT_READ, PROJECT_WRITE, PROJECT_ADMIN, got 'REPO_READ'"));

        for level in PermissionLevel::ALL {
            assert_eq!(level.to_string().parse::<PermissionLevel>().unwrap(), level);
        }
    }

    #[test]
    fn test_group_permissions_path_encodes_query() {
        assert_eq!(
            group_permissions_path("TPO", &[("name", "dev team"), ("permission", "PROJECT_ADMIN")]),
            "projects/TPO/permissions/groups?name=dev+team&permission=PROJECT_ADMIN"
        );
    }
}
