// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Time source abstraction for the window store.
//!
//! Window arithmetic works on milliseconds since the Unix epoch so reset
//! instants survive serialization into headers. The store takes its notion
//! of "now" from [`Clock`], which lets tests and replay tooling drive time
//! by hand instead of sleeping.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Millisecond-resolution time source.
pub trait Clock: Send + Sync {
    /// Current time as milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

/// Wall clock backed by [`chrono::Utc`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for tests and deterministic simulations.
///
/// Starts at the Unix epoch unless built with [`starting_at`]; only moves
/// when told to.
///
/// [`starting_at`]: ManualClock::starting_at
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    /// Clock pinned to the Unix epoch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock pinned to `now_ms`.
    pub fn starting_at(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    /// Move the clock forward by `delta`, clamped to the epoch-ms range.
    pub fn advance(&self, delta: Duration) {
        let delta_ms = i64::try_from(delta.as_millis()).unwrap_or(i64::MAX);
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
