//
//  bitbucket-server-client
//  api/context.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Context
//!
//! Every operation takes a [`RequestContext`] that lets the caller bound or
//! abort the call:
//!
//! - a deadline, after which the call fails with [`ApiError::Timeout`]
//! - a [`CancellationToken`], which aborts the in-flight call with
//!   [`ApiError::Cancelled`] when triggered
//!
//! The client's own 10 second timeout applies in addition; whichever is
//! tighter wins.
//!
//! ```rust
//! use std::time::Duration;
//! use bitbucket_server_client::api::RequestContext;
//! use tokio_util::sync::CancellationToken;
//!
//! let token = CancellationToken::new();
//! let ctx = RequestContext::background()
//!     .with_timeout(Duration::from_secs(3))
//!     .with_cancellation(token.clone());
//!
//! // Somewhere else: token.cancel();
//! # let _ = ctx;
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::common::ApiError;

/// Cancellation and deadline scope for a single call.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancel: Option<CancellationToken>,
}

impl RequestContext {
    /// A context with no deadline that is never cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    /// Fails the call once `timeout` has elapsed from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Fails the call once `deadline` is reached.
    ///
    /// If a deadline is already set, the earlier one is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Aborts the call when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` if the context was cancelled or its deadline passed.
    pub fn is_done(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
            || self.deadline.is_some_and(|d| d <= Instant::now())
    }

    /// Runs `fut` within this context.
    ///
    /// Whichever completes first wins: the future, the cancellation token or
    /// the deadline. Losing futures are dropped, which aborts any in-flight
    /// request they own.
    pub(crate) async fn run<F, T>(&self, fut: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let cancelled = async {
            match &self.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(ApiError::Cancelled),
            _ = expired => Err(ApiError::Timeout),
            result = fut => result,
        }
    }
}
