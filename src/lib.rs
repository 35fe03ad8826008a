// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Endpoint Rate Limiter
//!
//! Single-process, in-memory request-rate governance for axum services:
//! a keyed fixed-window counter deciding, per route and client, whether a
//! request is admitted, plus the bookkeeping for `X-RateLimit-*` response
//! headers.
//!
//! - Fixed windows keyed by `route:client`, expired lazily on read and
//!   evicted by a background sweep
//! - Client identity from `X-Forwarded-For` / `X-Real-IP` /
//!   `CF-Connecting-IP` with transport-peer fallback
//! - Denials as values (HTTP 429 + `Retry-After`), never errors
//! - Route-class presets (`auth`, `api`, `form`, `general`)
//! - Drop-in axum middleware, prometheus counters, injectable clock
//!
//! State lives in one process. Every instance of the service counts
//! independently; put a shared store behind the same API if that ever
//! stops being acceptable.
//!
//! ```no_run
//! use endpoint_rate_limiter::{presets, RateLimiter, WindowStore};
//! use std::sync::Arc;
//!
//! # async fn compose() {
//! let store = Arc::new(WindowStore::new());
//! store.start_sweeper();
//!
//! let limiter = RateLimiter::new(store.clone());
//! let api_guard = Arc::new(limiter.guard(presets::api()));
//!
//! let app: axum::Router = axum::Router::new()
//!     .layer(axum::middleware::from_fn_with_state(
//!         api_guard,
//!         endpoint_rate_limiter::middleware::rate_limit,
//!     ));
//!
//! // on graceful exit:
//! store.shutdown().await;
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod headers;
pub mod identity;
pub mod limiter;
pub mod metrics;
pub mod middleware;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{presets, ConfigError, RateLimitConfig};
pub use headers::RateLimitHeaders;
pub use identity::resolve_client;
pub use limiter::{Admission, Enforcement, RateLimitGuard, RateLimiter, Rejection, RequestContext};
pub use metrics::LimiterMetrics;
pub use store::{Decision, WindowStore};
