//! Fixed-window request limiter over a shared counter store.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::error::AppError;
use crate::infrastructure::rate_limit::{RateLimitStore, window_key};
use serde_json::json;
use tracing::warn;

/// Per-subject fixed-window limiter.
///
/// Counters live in a [`RateLimitStore`] so several instances share them.
/// A failing store lets the request through.
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    scope: &'static str,
    limit: u64,
    window: Duration,
}

impl RateLimiter {
    /// Creates a limiter allowing `limit` hits per `window` for each subject.
    pub fn new(
        store: Arc<dyn RateLimitStore>,
        scope: &'static str,
        limit: u64,
        window: Duration,
    ) -> Self {
        Self {
            store,
            scope,
            limit,
            window,
        }
    }

    /// Counts a hit for `subject` and rejects it once the window is full.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RateLimited`] when `subject` exceeded the limit in
    /// the window containing `now`.
    pub async fn check(&self, subject: &str, now: DateTime<Utc>) -> Result<(), AppError> {
        let key = window_key(self.scope, subject, self.window, now);

        let count = match self.store.hit(&key, self.window).await {
            Ok(count) => count,
            Err(e) => {
                warn!(
                    backend = self.store.backend_name(),
                    "Rate limit store unavailable, allowing request: {}", e
                );
                return Ok(());
            }
        };

        if count > self.limit {
            return Err(AppError::rate_limited(
                "Too many requests",
                json!({
                    "limit": self.limit,
                    "window_seconds": self.window.as_secs(),
                }),
            ));
        }

        Ok(())
    }
}
