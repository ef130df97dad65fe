//
//  bitbucket-server-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types
//!
//! This module provides the error taxonomy shared by every layer of the
//! client: the request builder, the response interpreter, the dispatcher and
//! the resource operation sets.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`ErrorKind`] - The identity of an error, independent of any context
//!   added while it propagated
//! - [`ResultExt`] - Adds descriptive context to a failing result
//!
//! # Example
//!
//! ```rust
//! use bitbucket_server_client::api::common::{ApiError, ErrorKind, ResultExt};
//!
//! fn fetch() -> Result<(), ApiError> {
//!     Err(ApiError::NotFound).context("error fetching project")
//! }
//!
//! let err = fetch().unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::NotFound);
//! assert!(err.is(ErrorKind::NotFound));
//! assert_eq!(err.to_string(), "error fetching project");
//! ```
//!
//! # Notes
//!
//! - Callers should compare errors with [`ApiError::kind`], never by message
//! - Context wrapping never hides the underlying kind
//! - A context layer displays only its own description; the wrapped error is
//!   reachable through [`std::error::Error::source`]

use reqwest::StatusCode;
use thiserror::Error;

/// Unified error type for all Bitbucket Server API operations.
///
/// # Variants
///
/// | Variant | Description | Origin |
/// |---------|-------------|--------|
/// | `Permission` | Missing or rejected credentials | HTTP 401 |
/// | `NotFound` | Requested resource does not exist | HTTP 404 |
/// | `Conflict` | Resource already exists | HTTP 409 |
/// | `ResponseMalformed` | Response body is not valid JSON | decode |
/// | `Parameters` | Request failed local validation | local |
/// | `UnexpectedStatus` | Any other non-success status | HTTP |
/// | `Decode` | Valid JSON of an unexpected shape | decode |
/// | `Encode` | Request payload could not be serialized | local |
/// | `InvalidPath` | Relative path could not be resolved | local |
/// | `Network` | Transport failure, including the client timeout | network |
/// | `Timeout` | The caller's deadline elapsed | context |
/// | `Cancelled` | The caller cancelled the call | context |
/// | `Config` | Invalid client configuration | local |
/// | `Context` | Any of the above, wrapped with a description | any |
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered 401 Unauthorized.
    #[error("permission denied")]
    Permission,

    /// The server answered 404 Not Found.
    #[error("resource not found")]
    NotFound,

    /// The server answered 409 Conflict, usually for a duplicate key or slug.
    #[error("resource already exists")]
    Conflict,

    /// The response body was expected to be JSON but could not be parsed.
    #[error("response body is not valid JSON")]
    ResponseMalformed,

    /// A required request field was missing or invalid.
    ///
    /// Raised before any network activity takes place.
    ///
    /// # Parameters
    ///
    /// - `0` - Description of the offending field
    #[error("invalid parameters: {0}")]
    Parameters(String),

    /// The server answered with a status outside the known set.
    #[error("unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// The HTTP status returned by the server
        status: StatusCode,
        /// The server's error message, or the raw body
        message: String,
    },

    /// The response was well-formed JSON that did not match the expected shape.
    #[error("failed to decode response body")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("failed to encode request body")]
    Encode(#[source] serde_json::Error),

    /// The relative request path could not be resolved against the base URL.
    #[error("invalid request path '{path}'")]
    InvalidPath {
        /// The path that failed to resolve
        path: String,
        /// The underlying parse failure
        #[source]
        source: url::ParseError,
    },

    /// A network-level error occurred during the request.
    ///
    /// Covers connection failures, DNS errors and the fixed client timeout.
    #[error("network error")]
    Network(#[from] reqwest::Error),

    /// The deadline carried by the request context elapsed.
    #[error("request deadline exceeded")]
    Timeout,

    /// The request context was cancelled while the call was in flight.
    #[error("request cancelled")]
    Cancelled,

    /// The client configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Another error, described by the operation that was being attempted.
    #[error("{context}")]
    Context {
        /// What was being attempted
        context: String,
        /// The original error
        #[source]
        source: Box<ApiError>,
    },
}

/// The identity of an [`ApiError`].
///
/// Kinds compare by value, which lets callers branch on the error a server
/// produced without matching on messages or unwrapping context layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Permission,
    NotFound,
    Conflict,
    ResponseMalformed,
    Parameters,
    UnexpectedStatus,
    Decode,
    Encode,
    InvalidPath,
    Network,
    Timeout,
    Cancelled,
    Config,
}

impl ApiError {
    /// Returns the kind of this error, looking through any context wrappers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Permission => ErrorKind::Permission,
            Self::NotFound => ErrorKind::NotFound,
            Self::Conflict => ErrorKind::Conflict,
            Self::ResponseMalformed => ErrorKind::ResponseMalformed,
            Self::Parameters(_) => ErrorKind::Parameters,
            Self::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Encode(_) => ErrorKind::Encode,
            Self::InvalidPath { .. } => ErrorKind::InvalidPath,
            Self::Network(_) => ErrorKind::Network,
            Self::Timeout => ErrorKind::Timeout,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Config(_) => ErrorKind::Config,
            Self::Context { source, .. } => source.kind(),
        }
    }

    /// Returns `true` if this error, or the error it wraps, is of `kind`.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }

    /// Returns the innermost error, without any context wrappers.
    pub fn root(&self) -> &ApiError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Wraps this error with a description of the failed operation.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Convenience constructor for validation failures.
    pub(crate) fn parameters(message: impl Into<String>) -> Self {
        Self::Parameters(message.into())
    }
}

/// Adds context to the error side of a `Result<T, ApiError>`.
pub trait ResultExt<T> {
    /// Wraps an error with a description of the operation that failed.
    fn context(self, context: &str) -> Result<T, ApiError>;
}

impl<T> ResultExt<T> for Result<T, ApiError> {
    fn context(self, context: &str) -> Result<T, ApiError> {
        self.map_err(|e| e.context(context))
    }
}

/// Result alias used throughout the API layer.
pub type ApiResult<T> = Result<T, ApiError>;
