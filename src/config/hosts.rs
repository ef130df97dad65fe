//
//  bitbucket-server-client
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Host Normalization
//!
//! Users paste hosts in many shapes: `bitbucket.example.com`,
//! `https://bitbucket.example.com/`, `HTTP://localhost:7990`. These helpers
//! reduce all of them to the bare `host[:port][/context]` form used to build
//! the API base URL, remembering the scheme when one was given.
//!
//! ```rust
//! use bitbucket_server_client::config::{normalize_host, split_host, Scheme};
//!
//! assert_eq!(normalize_host("https://BITBUCKET.example.com/"), "bitbucket.example.com");
//! assert_eq!(
//!     split_host("http://localhost:7990"),
//!     (Some(Scheme::Http), "localhost:7990".to_string())
//! );
//! ```

use super::Scheme;

/// Splits an optional `http://` / `https://` prefix off a host string.
///
/// # Returns
///
/// The scheme found in the prefix, if any, and the normalized host.
pub fn split_host(host: &str) -> (Option<Scheme>, String) {
    let trimmed = host.trim();
    let lower = trimmed.to_ascii_lowercase();

    let (scheme, rest) = if lower.starts_with("https://") {
        (Some(Scheme::Https), &trimmed["https://".len()..])
    } else if lower.starts_with("http://") {
        (Some(Scheme::Http), &trimmed["http://".len()..])
    } else {
        (None, trimmed)
    };

    let rest = rest.trim_end_matches('/');
    let host = match rest.split_once('/') {
        Some((authority, path)) => format!("{}/{}", authority.to_ascii_lowercase(), path),
        None => rest.to_ascii_lowercase(),
    };

    (scheme, host)
}

/// Normalizes a host string for consistent storage and URL building.
///
/// Strips the scheme prefix and trailing slashes and lowercases the
/// authority. A context path keeps its case.
pub fn normalize_host(host: &str) -> String {
    split_host(host).1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("bitbucket.example.com"), "bitbucket.example.com");
        assert_eq!(normalize_host(" https://Bitbucket.Example.com// "), "bitbucket.example.com");
        assert_eq!(normalize_host("localhost:7990"), "localhost:7990");
    }

    #[test]
    fn test_split_host() {
        assert_eq!(
            split_host("HTTPS://git.internal.net"),
            (Some(Scheme::Https), "git.internal.net".to_string())
        );
        assert_eq!(split_host("git.internal.net"), (None, "git.internal.net".to_string()));
    }

    #[test]
    fn test_context_path_keeps_case() {
        assert_eq!(
            split_host("HTTP://Git.Internal.NET:7990/Bitbucket/"),
            (Some(Scheme::Http), "git.internal.net:7990/Bitbucket".to_string())
        );
        assert_eq!(normalize_host("example.com/Bitbucket"), "example.com/Bitbucket");
    }
}
