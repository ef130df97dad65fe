//
//  bitbucket-server-client
//  api/validate.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Local request validation.
//!
//! Each request type implements [`Validate`] with its own rules. Validation
//! is a pure function of the request and always runs before any network
//! activity; a failure is reported as [`ApiError::Parameters`].

use super::common::{ApiError, ApiResult};

/// Validation rules for a request type.
pub trait Validate {
    /// Checks required fields and allowed values.
    fn validate(&self) -> ApiResult<()>;
}

/// Fails unless `value` contains something other than whitespace.
pub fn require(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::parameters(format!("{field} is required")));
    }
    Ok(())
}

/// Like [`require`], for optional fields that must not be blank when present.
pub fn require_if_present(field: &str, value: Option<&str>) -> ApiResult<()> {
    match value {
        Some(value) => require(field, value),
        None => Ok(()),
    }
}

/// Like [`require`], for identifiers interpolated into a URL path.
///
/// The value must stay a single path segment: no `/`, `\`, `?`, `#` or
/// `%`, and not `.` or `..`.
pub fn require_segment(field: &str, value: &str) -> ApiResult<()> {
    require(field, value)?;
    let value = value.trim();
    if value == "." || value == ".." || value.contains(['/', '\\', '?', '#', '%']) {
        return Err(ApiError::parameters(format!(
            "{field} '{value}' is not a valid path segment"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::ErrorKind;

    #[test]
    fn test_require() {
        assert!(require("key", "TPO").is_ok());

        let err = require("key", "   ").unwrap_err();
        assert!(err.is(ErrorKind::Parameters));
        assert_eq!(err.to_string(), "invalid parameters: key is required");
    }

    #[test]
    fn test_require_if_present() {
        assert!(require_if_present("slug", None).is_ok());
        assert!(require_if_present("slug", Some("repo")).is_ok());
        assert!(require_if_present("slug", Some("")).is_err());
    }

    #[test]
    fn test_require_segment() {
        assert!(require_segment("key", "TPO").is_ok());
        assert!(require_segment("key", "~admin").is_ok());
        assert!(require_segment("slug", "my-repo.git").is_ok());

        for bad in ["TPO/repos/victim", "../admin/users", "..", ".", "a?b", "a#b", "a%2Fb", "a\\b"] {
            let err = require_segment("key", bad).unwrap_err();
            assert!(err.is(ErrorKind::Parameters), "{bad} should be rejected");
        }
        assert!(require_segment("key", " ").unwrap_err().is(ErrorKind::Parameters));
    }
}
