// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for limiter activity.

use prometheus::{IntCounter, Registry};

/// Counters tracking admissions, denials and sweeper health.
///
/// Each [`WindowStore`](crate::store::WindowStore) owns its own set instead
/// of registering into the process-global registry, so independent stores
/// and parallel tests never collide on counter state. Hosts that scrape
/// metrics call [`register`](Self::register) with their registry.
#[derive(Debug, Clone)]
pub struct LimiterMetrics {
    /// Requests admitted within their window
    pub requests_admitted: IntCounter,
    /// Requests denied over the window limit
    pub requests_denied: IntCounter,
    /// Expired windows evicted by sweep passes
    pub entries_swept: IntCounter,
    /// Sweep cycles that panicked and were skipped
    pub sweep_failures: IntCounter,
}

impl LimiterMetrics {
    /// Create a fresh, unregistered counter set.
    pub fn new() -> Self {
        Self {
            requests_admitted: counter(
                "ratelimit_requests_admitted_total",
                "Requests admitted by the rate limiter",
            ),
            requests_denied: counter(
                "ratelimit_requests_denied_total",
                "Requests denied by the rate limiter",
            ),
            entries_swept: counter(
                "ratelimit_entries_swept_total",
                "Expired rate limit windows removed by the sweeper",
            ),
            sweep_failures: counter(
                "ratelimit_sweep_failures_total",
                "Sweep cycles that failed and were skipped",
            ),
        }
    }

    /// Register every counter on `registry`.
    pub fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.requests_admitted.clone()))?;
        registry.register(Box::new(self.requests_denied.clone()))?;
        registry.register(Box::new(self.entries_swept.clone()))?;
        registry.register(Box::new(self.sweep_failures.clone()))?;
        Ok(())
    }
}

impl Default for LimiterMetrics {
    fn default() -> Self {
        Self::new()
    }
}

// Counter names are compile-time constants, so construction cannot fail at
// runtime.
fn counter(name: &str, help: &str) -> IntCounter {
    IntCounter::new(name, help).expect("static counter name and help are valid")
}
