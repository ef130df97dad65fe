//
//  bitbucket-server-client
//  api/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Builder
//!
//! Turns a method, a path relative to the API root and an optional payload
//! into a fully-formed [`OutboundRequest`]:
//!
//! - the path is resolved against `{scheme}://{host}/rest/api/1.0/`
//! - GET requests never carry a body
//! - other methods carry the JSON encoding of the payload, when there is one
//! - `Accept: application/json` is always set, `Content-Type:
//!   application/json` only alongside a body
//! - the static headers (Basic `Authorization`) are applied last, so nothing
//!   set per call can shadow them
//!
//! Both failure modes (an unresolvable path, an unserializable payload) are
//! reported before any network activity.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use super::common::{ApiError, ApiResult};
use crate::config::ClientConfig;

/// Media type used for request and response bodies.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// A request ready to be sent.
///
/// Built fresh for every call and consumed by the dispatcher.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// The HTTP method.
    pub method: Method,
    /// The absolute request URL.
    pub url: Url,
    /// Request headers; names are case-insensitive and the last write wins.
    pub headers: HeaderMap,
    /// The encoded body, if any.
    pub body: Option<Vec<u8>>,
}

impl OutboundRequest {
    /// Returns the body as UTF-8 text, if there is one.
    pub fn body_text(&self) -> Option<&str> {
        self.body
            .as_deref()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }
}

/// Builds [`OutboundRequest`]s against a fixed base endpoint.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: Url,
    headers: HeaderMap,
}

impl RequestBuilder {
    /// Creates a builder from the transport configuration.
    ///
    /// The Basic `Authorization` header is computed here, once.
    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, config.credentials.authorization_header()?);

        Ok(Self {
            base_url: config.base_url()?,
            headers,
        })
    }

    /// Returns the base endpoint.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` against the base endpoint.
    ///
    /// Paths are relative (`projects/KEY`); a leading slash would discard
    /// the API root, so it is stripped.
    pub fn resolve(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| ApiError::InvalidPath {
                path: path.to_string(),
                source,
            })
    }

    /// Builds a request without a payload.
    pub fn build_empty(&self, method: Method, path: &str) -> ApiResult<OutboundRequest> {
        self.build::<()>(method, path, None)
    }

    /// Builds a request.
    ///
    /// # Parameters
    ///
    /// * `method` - The HTTP method
    /// * `path` - Path relative to the API root, optionally with a query
    /// * `payload` - Serialized as the JSON body; ignored for GET
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidPath`] if the path cannot be resolved
    /// - [`ApiError::Encode`] if the payload cannot be serialized
    pub fn build<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&B>,
    ) -> ApiResult<OutboundRequest> {
        let url = self.resolve(path)?;

        let body = match payload {
            Some(payload) if method != Method::GET => {
                Some(serde_json::to_vec(payload).map_err(ApiError::Encode)?)
            }
            _ => None,
        };

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
        }

        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.clone());
        }

        Ok(OutboundRequest {
            method,
            url,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Scheme;
    use serde::ser::Error as _;

    fn builder() -> RequestBuilder {
        let config = ClientConfig::new("localhost:7990", "admin", "admin").with_scheme(Scheme::Http);
        RequestBuilder::from_config(&config).unwrap()
    }

    #[derive(Serialize)]
    struct Payload {
        name: &'static str,
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("not today"))
        }
    }

    #[test]
    fn test_resolves_relative_paths() {
        let b = builder();
        assert_eq!(
            b.resolve("projects/TPO/repos").unwrap().as_str(),
            "http://localhost:7990/rest/api/1.0/projects/TPO/repos"
        );
        assert_eq!(
            b.resolve("/projects").unwrap().as_str(),
            "http://localhost:7990/rest/api/1.0/projects"
        );
    }

    #[test]
    fn test_get_has_no_body() {
        let req = builder()
            .build(Method::GET, "projects", Some(&Payload { name: "x" }))
            .unwrap();
        assert!(req.body.is_none());
        assert!(req.headers.get(CONTENT_TYPE).is_none());
        assert_eq!(req.headers[ACCEPT], JSON_MEDIA_TYPE);
        assert_eq!(req.headers[AUTHORIZATION], "Basic YWRtaW46YWRtaW4=");
    }

    #[test]
    fn test_post_carries_json_body() {
        let req = builder()
            .build(Method::POST, "projects", Some(&Payload { name: "TestProject" }))
            .unwrap();
        assert_eq!(req.body_text(), Some(r#"{"name":"TestProject"}"#));
        assert_eq!(req.headers[CONTENT_TYPE], JSON_MEDIA_TYPE);
        assert_eq!(req.headers[ACCEPT], JSON_MEDIA_TYPE);
    }

    #[test]
    fn test_delete_without_payload() {
        let req = builder().build_empty(Method::DELETE, "projects/TPO").unwrap();
        assert!(req.body.is_none());
        assert!(req.headers.get(CONTENT_TYPE).is_none());
        assert!(req.headers.contains_key(AUTHORIZATION));
    }

    #[test]
    fn test_query_is_preserved() {
        let req = builder()
            .build_empty(
                Method::PUT,
                "projects/TPO/permissions/groups?name=devs&permission=PROJECT_READ",
            )
            .unwrap();
        assert_eq!(req.url.path(), "/rest/api/1.0/projects/TPO/permissions/groups");
        assert_eq!(req.url.query(), Some("name=devs&permission=PROJECT_READ"));
    }

    #[test]
    fn test_encode_failure_is_local() {
        let err = builder()
            .build(Method::PUT, "projects/TPO", Some(&Unserializable))
            .unwrap_err();
        assert!(matches!(err, ApiError::Encode(_)));
    }

    #[test]
    fn test_invalid_path() {
        let err = builder().build_empty(Method::GET, "http://[::1").unwrap_err();
        assert!(matches!(err, ApiError::InvalidPath { .. }));
    }
}
