//
//  bitbucket-server-client
//  api/response.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Response Interpreter
//!
//! Maps a fully-read response to a result. The status code is inspected
//! before the body, so an error body is never parsed as a success payload.
//!
//! | Status | Outcome |
//! |--------|---------|
//! | 401 | [`ApiError::Permission`] |
//! | 404 | [`ApiError::NotFound`] |
//! | 409 | [`ApiError::Conflict`] |
//! | 204 | success, the body is never decoded |
//! | other 2xx | success, the body is decoded when a value is expected |
//! | anything else | [`ApiError::UnexpectedStatus`] |
//!
//! A body that is not JSON at all becomes [`ApiError::ResponseMalformed`];
//! JSON of the wrong shape becomes [`ApiError::Decode`].

use bytes::Bytes;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use super::common::{ApiError, ApiResult};

/// A response whose body has been read to completion.
#[derive(Debug, Clone)]
pub struct InboundResponse {
    /// The HTTP status.
    pub status: StatusCode,
    /// The raw body.
    pub body: Bytes,
}

impl InboundResponse {
    /// Creates a response from a status and body.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Checks the status without decoding the body.
    pub fn interpret(&self) -> ApiResult<()> {
        check_status(self.status, &self.body)
    }

    /// Checks the status and decodes the body into `T`.
    ///
    /// A 204 response yields `T::default()` without looking at the body.
    pub fn interpret_json<T: DeserializeOwned + Default>(&self) -> ApiResult<T> {
        check_status(self.status, &self.body)?;

        if self.status == StatusCode::NO_CONTENT {
            return Ok(T::default());
        }

        decode(&self.body)
    }
}

fn check_status(status: StatusCode, body: &[u8]) -> ApiResult<()> {
    match status {
        StatusCode::UNAUTHORIZED => Err(ApiError::Permission),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        StatusCode::CONFLICT => Err(ApiError::Conflict),
        s if s.is_success() => Ok(()),
        s => Err(ApiError::UnexpectedStatus {
            status: s,
            message: server_message(body),
        }),
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| match e.classify() {
        Category::Syntax | Category::Eof => ApiError::ResponseMalformed,
        Category::Data | Category::Io => ApiError::Decode(e),
    })
}

/// Extracts a human-readable message from a Bitbucket Server error body.
///
/// Bitbucket Server returns errors in the format:
/// ```json
/// {"errors": [{"message": "Human readable message"}]}
/// ```
///
/// Bare `{"message": "..."}` bodies are accepted too. Anything else falls
/// back to the raw body text.
pub fn server_message(body: &[u8]) -> String {
    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Some(message) = json
            .get("errors")
            .and_then(|e| e.as_array())
            .and_then(|arr| arr.first())
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }

        if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }

    String::from_utf8_lossy(body).trim().to_string()
}
