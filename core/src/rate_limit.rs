//! Rate-limit bookkeeping read from response headers.
//!
//! Purely informational: nothing here delays or rejects calls. Each update
//! swaps the whole snapshot in a single write, so concurrent responses
//! resolve as last-writer-wins.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::http::HttpResponse;

pub const LIMIT_HEADER: &str = "X-RateLimit-Limit";
pub const REMAINING_HEADER: &str = "X-RateLimit-Remaining";
pub const RESET_HEADER: &str = "X-RateLimit-Reset";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
    pub reset: Option<DateTime<Utc>>,
}

impl RateLimitSnapshot {
    /// Read the rate-limit headers; `None` when the response carries none.
    pub fn from_response(response: &HttpResponse) -> Option<Self> {
        let limit = response.header(LIMIT_HEADER).and_then(|v| v.trim().parse().ok());
        let remaining = response
            .header(REMAINING_HEADER)
            .and_then(|v| v.trim().parse().ok());
        let reset = response.header(RESET_HEADER).and_then(parse_reset);

        if limit.is_none() && remaining.is_none() && reset.is_none() {
            return None;
        }
        Some(Self {
            limit,
            remaining,
            reset,
        })
    }
}

fn parse_reset(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Shared rate-limit state. Callers only ever see copies.
#[derive(Debug, Default)]
pub struct RateLimit {
    current: RwLock<RateLimitSnapshot>,
}

impl RateLimit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the headers of `response`, if it has any.
    pub fn update(&self, response: &HttpResponse) {
        let Some(snapshot) = RateLimitSnapshot::from_response(response) else {
            return;
        };
        tracing::trace!(?snapshot, "rate limit updated");
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    pub fn snapshot(&self) -> RateLimitSnapshot {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }
}
