// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Projection of rate limit state into `X-RateLimit-*` response headers.
//!
//! The three headers are published on every governed response, allowed or
//! denied, so well-behaved clients can pace themselves before hitting the
//! limit.

use axum::http::{HeaderMap, HeaderValue};
use chrono::{DateTime, SecondsFormat, Utc};

/// Requests admitted per window.
pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
/// Requests left in the current window, never negative.
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
/// ISO-8601 instant at which the current window resets.
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// The three `X-RateLimit-*` values for one decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitHeaders {
    /// `X-RateLimit-Limit` value
    pub limit: String,
    /// `X-RateLimit-Remaining` value
    pub remaining: String,
    /// `X-RateLimit-Reset` value
    pub reset: String,
}

impl RateLimitHeaders {
    /// Project header values from a decision's parts.
    pub fn project(limit: u32, remaining: u32, reset_time_ms: i64) -> Self {
        Self {
            limit: limit.to_string(),
            remaining: remaining.to_string(),
            reset: format_reset(reset_time_ms),
        }
    }

    /// Insert the three headers into `headers`, replacing any present.
    pub fn apply(&self, headers: &mut HeaderMap) {
        for (name, value) in self.pairs() {
            if let Ok(value) = HeaderValue::from_str(value) {
                headers.insert(name, value);
            }
        }
    }

    /// Header pairs in axum's response-tuple shape.
    pub fn to_array(&self) -> [(&'static str, String); 3] {
        [
            (LIMIT_HEADER, self.limit.clone()),
            (REMAINING_HEADER, self.remaining.clone()),
            (RESET_HEADER, self.reset.clone()),
        ]
    }

    fn pairs(&self) -> [(&'static str, &str); 3] {
        [
            (LIMIT_HEADER, &self.limit),
            (REMAINING_HEADER, &self.remaining),
            (RESET_HEADER, &self.reset),
        ]
    }
}

/// Render an epoch-ms instant as ISO-8601 with millisecond precision in
/// UTC, e.g. `2026-03-01T12:00:00.000Z`.
fn format_reset(reset_time_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(reset_time_ms)
        .map(|instant| instant.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}
