// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Axum integration for route-group rate limiting.
//!
//! Hosts wrap a route group with
//! [`axum::middleware::from_fn_with_state`] and an
//! [`Arc<RateLimitGuard>`] as the state. Admitted requests flow through
//! with `X-RateLimit-*` headers stamped on the response; denied requests
//! short-circuit into an HTTP 429.

use crate::limiter::{Admission, RateLimitGuard, Rejection, RequestContext};
use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::net::SocketAddr;
use std::sync::Arc;

/// Enforce the guard's limits around the inner handler.
///
/// The window key is the request path plus the resolved client identity,
/// so each route the middleware wraps gets its own per-client windows.
/// Headers are applied to allowed and denied responses alike.
pub async fn rate_limit(
    State(guard): State<Arc<RateLimitGuard>>,
    request: Request,
    next: Next,
) -> Response {
    let peer_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let enforcement = guard.enforce(&RequestContext {
        route_path: request.uri().path(),
        headers: request.headers(),
        peer_addr,
    });

    match enforcement.outcome {
        Admission::Allowed { .. } => {
            let mut response = next.run(request).await;
            enforcement.headers.apply(response.headers_mut());
            response
        }
        Admission::Denied(rejection) => {
            let mut response = rejection.into_response();
            enforcement.headers.apply(response.headers_mut());
            response
        }
    }
}

impl IntoResponse for Rejection {
    /// HTTP 429 with a `Retry-After` header and the rejection as a JSON
    /// body. Hosts composing responses by hand add the `X-RateLimit-*`
    /// headers from the surrounding [`Enforcement`](crate::Enforcement).
    fn into_response(self) -> Response {
        let retry_after = self.retry_after_secs.to_string();
        (
            StatusCode::TOO_MANY_REQUESTS,
            [("Retry-After", retry_after)],
            Json(self),
        )
            .into_response()
    }
}
