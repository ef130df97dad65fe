//
//  bitbucket-server-client
//  api/server/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Server/Data Center API v1.0
//!
//! Resource operation sets for the Bitbucket Server (also known as
//! Bitbucket Data Center) REST API v1.0.
//!
//! ## Module Organization
//!
//! - [`projects`] - Project management (get, create, update, delete, group permissions)
//! - [`repositories`] - Repository management (get, create, update, delete)
//!
//! Each operation set is an async trait with one REST-backed
//! implementation that owns a handle to the shared
//! [`Dispatcher`](crate::api::Dispatcher). Callers that want to substitute
//! their own implementation (for example in tests) can program against the
//! traits.
//!
//! ## Notes
//!
//! - Entities implement `Debug`, `Clone`, `Default`, `Serialize` and `Deserialize`
//! - Fields missing from a response decode to their defaults

pub mod projects;
pub mod repositories;

pub use projects::{
    AddPermissionRequest, CreateProjectRequest, DeleteProjectRequest, GetProjectRequest,
    PermissionLevel, Project, ProjectService, RevokePermissionRequest, ServerProjects,
    UpdateProjectRequest,
};
pub use repositories::{
    CreateRepositoryRequest, DeleteRepositoryRequest, GetRepositoryRequest, Repository,
    RepositoryService, ServerRepositories, UpdateRepositoryRequest,
};
