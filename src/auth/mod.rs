//
//  bitbucket-server-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Bitbucket Server HTTP access tokens only permit operations inside existing
//! projects, so creating projects requires a real user. This client therefore
//! always authenticates with HTTP Basic credentials.
//!
//! The `Authorization` header value is computed once, when the client is
//! built, and attached to every request afterwards.
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_server_client::auth::BasicCredentials;
//!
//! let credentials = BasicCredentials::new("admin", "admin");
//! let header = credentials.authorization_header().unwrap();
//! assert_eq!(header.to_str().unwrap(), "Basic YWRtaW46YWRtaW4=");
//! ```

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::HeaderValue;

use crate::api::common::ApiError;

/// Username and password for HTTP Basic authentication.
///
/// The `Debug` implementation never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// The Bitbucket username.
    pub username: String,
    /// The user's password.
    pub password: String,
}

impl BasicCredentials {
    /// Creates a new set of credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns `base64(username:password)`.
    pub fn encoded(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.username, self.password))
    }

    /// Builds the `Authorization` header value for these credentials.
    ///
    /// The value is marked sensitive so it is redacted from reqwest's debug
    /// output.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the encoded value is not a valid
    /// header value. Base64 output always is, so this only guards the
    /// `HeaderValue` constructor contract.
    pub fn authorization_header(&self) -> Result<HeaderValue, ApiError> {
        let mut value = HeaderValue::from_str(&format!("Basic {}", self.encoded()))
            .map_err(|e| ApiError::Config(format!("invalid credentials: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
