// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Flood traffic patterns for behavioral testing.
//!
//! Each pattern describes a synthetic request stream. Pacing is expressed
//! as clock advancement between requests and replayed against a
//! [`ManualClock`](endpoint_rate_limiter::ManualClock), so the suites are
//! deterministic and run in milliseconds regardless of the simulated
//! duration.

/// Flood pattern configuration.
#[derive(Debug, Clone)]
pub struct FloodConfig {
    /// Total number of requests to replay
    pub total_requests: usize,
    /// Number of distinct client identities
    pub unique_clients: usize,
    /// Number of distinct route paths
    pub unique_routes: usize,
    /// Simulated milliseconds between consecutive requests
    pub advance_between_ms: u64,
    /// Rotate a fabricated X-Forwarded-For identity on every request
    pub spoof_identities: bool,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            unique_clients: 1,
            unique_routes: 1,
            advance_between_ms: 0,
            spoof_identities: false,
        }
    }
}

/// Predefined flood patterns.
impl FloodConfig {
    /// One client hammering one route as fast as it can.
    pub fn single_client_flood() -> Self {
        Self {
            total_requests: 200,
            ..Default::default()
        }
    }

    /// Many clients, few requests each: legitimate-looking load.
    pub fn distributed_low_rate() -> Self {
        Self {
            total_requests: 200,
            unique_clients: 100,
            advance_between_ms: 5,
            ..Default::default()
        }
    }

    /// One client spreading requests across many routes.
    pub fn route_hopping() -> Self {
        Self {
            total_requests: 40,
            unique_routes: 20,
            ..Default::default()
        }
    }

    /// One transport peer rotating fabricated forwarded identities.
    pub fn spoofed_header_rotation() -> Self {
        Self {
            total_requests: 50,
            spoof_identities: true,
            ..Default::default()
        }
    }

    /// One client pacing itself under the limit.
    pub fn slow_drip() -> Self {
        Self {
            total_requests: 50,
            advance_between_ms: 7_000,
            ..Default::default()
        }
    }

    /// Simulated duration of the whole replay.
    pub fn simulated_duration_ms(&self) -> u64 {
        self.total_requests as u64 * self.advance_between_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slow_drip_simulates_minutes_of_traffic() {
        let config = FloodConfig::slow_drip();
        assert!(config.simulated_duration_ms() > 5 * 60 * 1000);
    }
}
