// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Keyed fixed-window counters with lazy expiry and a periodic sweep.
//!
//! The store maps opaque keys to counting windows. Expired windows are
//! replaced lazily the next time their key is checked, and a background
//! sweep evicts the ones nobody asks about again so abandoned keys do not
//! accumulate. Correctness never depends on the sweep; it is memory
//! housekeeping only.

use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitConfig;
use crate::metrics::LimiterMetrics;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How often the background sweep runs unless configured otherwise.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// One live counting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowEntry {
    /// Requests observed in this window, denied ones included
    pub count: u32,
    /// Epoch-ms instant at which this window expires
    pub reset_time_ms: i64,
}

/// Outcome of one counted check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the request fit inside the window's limit
    pub allowed: bool,
    /// Post-increment count for the window
    pub count: u32,
    /// Epoch-ms instant at which the window resets
    pub reset_time_ms: i64,
}

/// Running sweep task plus its stop signal.
struct Sweeper {
    handle: JoinHandle<()>,
    stop: watch::Sender<bool>,
}

/// Shared fixed-window counter store.
///
/// All map mutation happens under a single mutex, so a check-and-increment
/// for one key is atomic with respect to concurrent checks, resets and
/// sweeps. Every critical section is short and free of I/O.
///
/// The store is an explicitly constructed instance: the composition root
/// builds one, wraps it in an [`Arc`], and hands it to whichever policies
/// and tasks need it. Nothing here is process-global.
pub struct WindowStore {
    entries: Mutex<HashMap<String, WindowEntry>>,
    clock: Arc<dyn Clock>,
    sweep_interval: Duration,
    sweeper: Mutex<Option<Sweeper>>,
    metrics: LimiterMetrics,
}

impl WindowStore {
    /// Create a store sweeping at [`DEFAULT_SWEEP_INTERVAL`].
    pub fn new() -> Self {
        Self::with_sweep_interval(DEFAULT_SWEEP_INTERVAL)
    }

    /// Create a store sweeping at a custom interval.
    pub fn with_sweep_interval(sweep_interval: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock: Arc::new(SystemClock),
            sweep_interval,
            sweeper: Mutex::new(None),
            metrics: LimiterMetrics::new(),
        }
    }

    /// Replace the time source, e.g. with a
    /// [`ManualClock`](crate::clock::ManualClock) in tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Count one request against `key` and decide whether it fits.
    ///
    /// A missing or expired entry starts a fresh window at `now + window`
    /// with this request as its first count. A live entry is incremented
    /// in place; the count keeps rising on denied checks, so rollover and
    /// [`reset`](Self::reset) are the only ways a count goes down.
    ///
    /// Fixed windows admit bursts across a boundary: a client can spend a
    /// full limit at the end of one window and another at the start of the
    /// next. Callers needing smoother pacing should shorten the window.
    pub fn check(&self, key: &str, config: &RateLimitConfig) -> Decision {
        let now = self.clock.now_ms();
        let mut entries = self.lock_entries();

        let entry = match entries.get_mut(key) {
            // Live window: count this request against it.
            Some(entry) if now < entry.reset_time_ms => {
                entry.count = entry.count.saturating_add(1);
                *entry
            }
            // Missing or expired: start a fresh window. Oversized windows
            // clamp to the far future instead of wrapping negative into an
            // always-expired entry.
            _ => {
                let window = i64::try_from(config.window_ms).unwrap_or(i64::MAX);
                let fresh = WindowEntry {
                    count: 1,
                    reset_time_ms: now.saturating_add(window),
                };
                entries.insert(key.to_string(), fresh);
                fresh
            }
        };

        Decision {
            allowed: entry.count <= config.max_requests,
            count: entry.count,
            reset_time_ms: entry.reset_time_ms,
        }
    }

    /// Forget the window for `key`, if any. The next check starts fresh.
    pub fn reset(&self, key: &str) {
        self.lock_entries().remove(key);
    }

    /// Evict every expired window and return how many were removed.
    ///
    /// Public so hosts without a running sweeper (or without a tokio
    /// runtime at all) can reclaim memory on their own schedule. A sweep
    /// can never change an admission outcome; checks already ignore
    /// expired entries.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now_ms();
        let mut entries = self.lock_entries();
        let before = entries.len();
        entries.retain(|_, entry| entry.reset_time_ms >= now);
        let removed = before - entries.len();
        drop(entries);

        if removed > 0 {
            self.metrics.entries_swept.inc_by(removed as u64);
        }
        removed
    }

    /// Number of tracked windows, expired-but-unswept ones included.
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    /// True when no windows are tracked.
    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    /// Counters recording store and policy activity.
    pub fn metrics(&self) -> &LimiterMetrics {
        &self.metrics
    }

    /// Current time from the store's clock.
    pub(crate) fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Spawn the periodic sweep task on the current tokio runtime.
    ///
    /// No-op when a sweeper is already running. A sweep cycle that panics
    /// is caught, logged and counted, and the task keeps its schedule;
    /// only [`shutdown`](Self::shutdown) stops it.
    pub fn start_sweeper(self: &Arc<Self>) {
        let mut slot = lock_ignoring_poison(&self.sweeper);
        if slot.is_some() {
            debug!("sweeper already running");
            return;
        }

        let (stop, mut stopped) = watch::channel(false);
        let store = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(store.sweep_interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match panic::catch_unwind(AssertUnwindSafe(|| store.sweep())) {
                            Ok(removed) => {
                                if removed > 0 {
                                    debug!(removed, live = store.len(), "swept expired windows");
                                }
                            }
                            Err(_) => {
                                store.metrics.sweep_failures.inc();
                                warn!("sweep cycle panicked, continuing on schedule");
                            }
                        }
                    }
                    _ = stopped.changed() => break,
                }
            }
        });

        *slot = Some(Sweeper { handle, stop });
    }

    /// Stop the sweep task and wait for it to exit.
    ///
    /// Idempotent: calling it again, or without a sweeper started, is a
    /// no-op. The store stays usable afterwards; only the background
    /// eviction stops. Dropping the store without calling this leaves the
    /// task running until the runtime shuts down.
    pub async fn shutdown(&self) {
        let sweeper = lock_ignoring_poison(&self.sweeper).take();

        if let Some(Sweeper { handle, stop }) = sweeper {
            // A send failure means the task already exited on its own.
            let _ = stop.send(true);
            if let Err(error) = handle.await {
                warn!(%error, "sweeper task did not exit cleanly");
            }
            debug!("sweeper stopped");
        }
    }

    /// Lock the entry map, recovering from poisoning so one panicked
    /// holder cannot wedge admission control for the whole process.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, WindowEntry>> {
        lock_ignoring_poison(&self.entries)
    }
}

impl Default for WindowStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_ignoring_poison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
