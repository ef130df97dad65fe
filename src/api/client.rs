//
//  bitbucket-server-client
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client for the Bitbucket Server API
//!
//! This module provides the [`Dispatcher`], which sends requests built by
//! the [`RequestBuilder`] and hands responses to the response interpreter,
//! and the [`BitbucketClient`], which owns a dispatcher and exposes the
//! resource operation sets.
//!
//! ## Features
//!
//! - Basic authentication header injection
//! - JSON serialization/deserialization
//! - Per-call cancellation and deadlines through [`RequestContext`]
//! - A fixed 10 second ceiling on every call
//! - A connectivity check when the client is created

use std::sync::Arc;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use super::common::{ApiError, ApiResult, ResultExt};
use super::context::RequestContext;
use super::request::{OutboundRequest, RequestBuilder};
use super::response::InboundResponse;
use super::server::projects::{ProjectService, ServerProjects};
use super::server::repositories::{RepositoryService, ServerRepositories};
use crate::config::{ClientConfig, DEFAULT_TIMEOUT};

/// Sends requests and interprets their responses.
///
/// A dispatcher holds no per-request state; one instance is shared by every
/// operation set of a client and may be used from many tasks at once.
#[derive(Debug)]
pub struct Dispatcher {
    /// The underlying HTTP client
    http: Client,
    /// Resolves paths and applies the static headers
    builder: RequestBuilder,
}

impl Dispatcher {
    /// Creates a dispatcher for the given transport configuration.
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not produce a valid base URL or the
    /// HTTP client cannot be created.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        Ok(Self {
            http: Client::builder()
                .user_agent(format!("bbs/{}", crate::VERSION))
                .timeout(DEFAULT_TIMEOUT)
                .build()?,
            builder: RequestBuilder::from_config(config)?,
        })
    }

    /// Returns the request builder.
    pub fn request_builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Sends a request and checks the response status, ignoring the body.
    pub async fn send(&self, ctx: &RequestContext, request: OutboundRequest) -> ApiResult<()> {
        self.execute(ctx, request).await?.interpret()
    }

    /// Sends a request and decodes the response body into `T`.
    pub async fn send_json<T: DeserializeOwned + Default>(
        &self,
        ctx: &RequestContext,
        request: OutboundRequest,
    ) -> ApiResult<T> {
        self.execute(ctx, request).await?.interpret_json()
    }

    /// Makes a GET request and decodes the response.
    pub async fn get<T: DeserializeOwned + Default>(
        &self,
        ctx: &RequestContext,
        path: &str,
    ) -> ApiResult<T> {
        let request = self.builder.build_empty(Method::GET, path)?;
        self.send_json(ctx, request).await
    }

    /// Makes a POST request with a JSON body and decodes the response.
    pub async fn post<T: DeserializeOwned + Default, B: Serialize + ?Sized>(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let request = self.builder.build(Method::POST, path, Some(body))?;
        self.send_json(ctx, request).await
    }

    /// Makes a PUT request with a JSON body and decodes the response.
    pub async fn put<T: DeserializeOwned + Default, B: Serialize + ?Sized>(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let request = self.builder.build(Method::PUT, path, Some(body))?;
        self.send_json(ctx, request).await
    }

    /// Makes a request without a body whose response body is not needed.
    pub async fn send_empty(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
    ) -> ApiResult<()> {
        let request = self.builder.build_empty(method, path)?;
        self.send(ctx, request).await
    }

    /// Makes a DELETE request.
    pub async fn delete(&self, ctx: &RequestContext, path: &str) -> ApiResult<()> {
        self.send_empty(ctx, Method::DELETE, path).await
    }

    async fn execute(
        &self,
        ctx: &RequestContext,
        request: OutboundRequest,
    ) -> ApiResult<InboundResponse> {
        let OutboundRequest {
            method,
            url,
            headers,
            body,
        } = request;

        ctx.run(async {
            debug!(%method, %url, "Sending request");

            let mut request = self.http.request(method, url).headers(headers);
            if let Some(body) = body {
                request = request.body(body);
            }

            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;

            debug!(%status, bytes = body.len(), "Received response");
            Ok::<_, ApiError>(InboundResponse::new(status, body))
        })
        .await
    }
}

/// The main client for the Bitbucket Server REST API.
///
/// A client can only be obtained through [`BitbucketClient::connect`], which
/// verifies that the server is reachable and accepts the credentials.
///
/// # Example
///
/// ```rust,no_run
/// use bitbucket_server_client::api::{BitbucketClient, RequestContext};
/// use bitbucket_server_client::api::server::projects::GetProjectRequest;
/// use bitbucket_server_client::config::{ClientConfig, Scheme};
///
/// # async fn example() -> Result<(), bitbucket_server_client::api::ApiError> {
/// let config = ClientConfig::new("localhost:7990", "admin", "admin").with_scheme(Scheme::Http);
/// let client = BitbucketClient::connect(config).await?;
///
/// let ctx = RequestContext::background();
/// let project = client
///     .projects()
///     .get_project(&ctx, &GetProjectRequest::new("TPO"))
///     .await?;
/// println!("{} ({})", project.name, project.key);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BitbucketClient {
    dispatcher: Arc<Dispatcher>,
    projects: Arc<dyn ProjectService>,
    repositories: Arc<dyn RepositoryService>,
}

impl BitbucketClient {
    /// Creates a client and checks connectivity.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or `GET projects` does not
    /// succeed, e.g. [`ErrorKind::Permission`](super::ErrorKind::Permission)
    /// for bad credentials.
    pub async fn connect(config: ClientConfig) -> ApiResult<Self> {
        Self::connect_with(config, &RequestContext::background()).await
    }

    /// Like [`BitbucketClient::connect`], bounding the check with `ctx`.
    pub async fn connect_with(config: ClientConfig, ctx: &RequestContext) -> ApiResult<Self> {
        let dispatcher = Arc::new(
            Dispatcher::new(&config).context("error creating bitbucket client")?,
        );

        let client = Self {
            projects: Arc::new(ServerProjects::new(Arc::clone(&dispatcher))),
            repositories: Arc::new(ServerRepositories::new(Arc::clone(&dispatcher))),
            dispatcher,
        };

        if let Err(e) = client.ping(ctx).await {
            warn!(base_url = %client.base_url(), "Connectivity check failed: {}", e);
            return Err(e.context("error creating bitbucket client"));
        }

        Ok(client)
    }

    /// Checks that the server answers `GET projects` successfully.
    pub async fn ping(&self, ctx: &RequestContext) -> ApiResult<()> {
        self.dispatcher
            .send_empty(ctx, Method::GET, "projects")
            .await
            .context("error fetching projects")
    }

    /// Returns the base URL all paths are resolved against.
    pub fn base_url(&self) -> &Url {
        self.dispatcher.request_builder().base_url()
    }

    /// Project operations.
    pub fn projects(&self) -> &dyn ProjectService {
        self.projects.as_ref()
    }

    /// Repository operations.
    pub fn repositories(&self) -> &dyn RepositoryService {
        self.repositories.as_ref()
    }
}
