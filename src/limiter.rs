// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Admission policy: route plus client identity against configured limits.
//!
//! The policy composes a window key from the route path and the resolved
//! client identity, counts the request in the shared [`WindowStore`], and
//! renders the outcome as an [`Enforcement`]: headers for the response
//! plus either an admission or a [`Rejection`] the host surfaces as
//! HTTP 429.

use crate::config::RateLimitConfig;
use crate::headers::RateLimitHeaders;
use crate::identity::resolve_client;
use crate::store::WindowStore;
use axum::http::HeaderMap;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};

/// Message sent to denied clients when the config does not set one.
const DEFAULT_MESSAGE: &str = "Too many requests";

/// Borrowed view of the request parts the policy needs.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// Route path, the first half of the window key
    pub route_path: &'a str,
    /// Request headers, consulted for proxy-forwarded identity
    pub headers: &'a HeaderMap,
    /// Transport peer, the identity of last resort
    pub peer_addr: Option<SocketAddr>,
}

/// What happened to a governed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Request fits inside the current window
    Allowed {
        /// Requests left in the window after this one
        remaining: u32,
    },
    /// Request exceeded the window's limit
    Denied(Rejection),
}

impl Admission {
    /// True when the request was admitted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Denial details, rendered by hosts as an HTTP 429 response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// Human-readable refusal message
    pub error: String,
    /// Whole seconds until the window resets, rounded up
    pub retry_after_secs: u64,
}

/// One decision plus the headers describing it.
///
/// Headers are projected on every outcome, so callers attach them to
/// allowed responses as well as denials.
#[derive(Debug, Clone)]
pub struct Enforcement {
    /// `X-RateLimit-*` values for this decision
    pub headers: RateLimitHeaders,
    /// Allowed or denied
    pub outcome: Admission,
}

impl Enforcement {
    /// True when the request was admitted.
    pub fn is_allowed(&self) -> bool {
        self.outcome.is_allowed()
    }
}

/// Admission policy over a shared [`WindowStore`].
///
/// Handles are cheap to clone; every clone counts against the same
/// windows. Hosts typically build one per process and derive per-route
/// [`RateLimitGuard`]s from it.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<WindowStore>,
}

impl RateLimiter {
    /// Create a policy handle over `store`.
    pub fn new(store: Arc<WindowStore>) -> Self {
        Self { store }
    }

    /// The store backing this policy.
    pub fn store(&self) -> &Arc<WindowStore> {
        &self.store
    }

    /// Govern one request: resolve its client identity, count it against
    /// the `route:client` window, and project response headers.
    pub fn enforce(&self, ctx: &RequestContext<'_>, config: &RateLimitConfig) -> Enforcement {
        let identity = resolve_client(ctx.headers, ctx.peer_addr);
        let key = window_key(ctx.route_path, &identity);
        self.enforce_key(&key, config)
    }

    /// Govern one request under a caller-derived key, for hosts that
    /// bucket by something other than route and IP (user ids, API
    /// tokens).
    pub fn check_key(&self, key: &str, config: &RateLimitConfig) -> Enforcement {
        self.enforce_key(key, config)
    }

    /// Bind `config` to this policy as a single-route-class checker.
    pub fn guard(&self, config: RateLimitConfig) -> RateLimitGuard {
        RateLimitGuard {
            limiter: self.clone(),
            config,
        }
    }

    /// Clear one client's window on one route, as if it had never made a
    /// request. For admin endpoints and tests.
    pub fn reset(&self, identity: &str, route_path: &str) {
        self.store.reset(&window_key(route_path, identity));
    }

    fn enforce_key(&self, key: &str, config: &RateLimitConfig) -> Enforcement {
        let decision = self.store.check(key, config);
        let remaining = config.max_requests.saturating_sub(decision.count);
        let headers =
            RateLimitHeaders::project(config.max_requests, remaining, decision.reset_time_ms);

        let outcome = if decision.allowed {
            self.store.metrics().requests_admitted.inc();
            debug!(%key, count = decision.count, remaining, "Request admitted");
            Admission::Allowed { remaining }
        } else {
            let retry_after_secs = secs_until(decision.reset_time_ms, self.store.now_ms());
            let error = config
                .message
                .clone()
                .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());
            self.store.metrics().requests_denied.inc();
            info!(%key, count = decision.count, retry_after_secs, "Rate limit exceeded");
            Admission::Denied(Rejection {
                error,
                retry_after_secs,
            })
        };

        Enforcement { headers, outcome }
    }
}

/// A policy bound to one route class's limits.
///
/// This is the handle hosts keep per route group and hand to the
/// middleware as state.
#[derive(Clone)]
pub struct RateLimitGuard {
    limiter: RateLimiter,
    config: RateLimitConfig,
}

impl RateLimitGuard {
    /// Govern one request against the bound limits.
    pub fn enforce(&self, ctx: &RequestContext<'_>) -> Enforcement {
        self.limiter.enforce(ctx, &self.config)
    }

    /// The limits this guard applies.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

/// Compose the store key for a route/client pair.
fn window_key(route_path: &str, identity: &str) -> String {
    format!("{}:{}", route_path, identity)
}

/// Whole seconds until `reset_time_ms`, rounded up, floored at zero.
fn secs_until(reset_time_ms: i64, now_ms: i64) -> u64 {
    let delta = reset_time_ms.saturating_sub(now_ms);
    if delta <= 0 {
        0
    } else {
        (delta.saturating_add(999) / 1000) as u64
    }
}
