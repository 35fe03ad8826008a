// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Rate limit configuration and the route-class presets.
//!
//! A [`RateLimitConfig`] describes one class of routes: how many requests
//! fit in a window, how long the window is, and what denied clients are
//! told. Limits are plain data; the same config can back any number of
//! guards and stores.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Validation failure for a [`RateLimitConfig`].
///
/// Invalid limits are programmer errors and surface at construction, not
/// as silent always-allow or always-deny behavior at check time.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A window that admits nothing denies every request unconditionally
    #[error("max_requests must be at least 1")]
    ZeroMaxRequests,

    /// A zero-length window expires instantly and admits everything
    #[error("window must be at least 1 millisecond")]
    ZeroWindow,

    /// A window beyond the epoch-millisecond range would wrap into the
    /// past and admit everything
    #[error("window exceeds the representable range of milliseconds")]
    OversizedWindow,
}

/// Limits applied to one class of routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests admitted per window (must be >= 1)
    pub max_requests: u32,

    /// Window length in milliseconds (must be >= 1 and fit in an `i64`)
    pub window_ms: u64,

    /// Message sent with rejections; denials fall back to a generic
    /// message when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RateLimitConfig {
    /// Create a validated configuration.
    pub fn new(max_requests: u32, window: Duration) -> Result<Self, ConfigError> {
        let config = Self {
            max_requests,
            // Saturate rather than truncate so validation sees the excess.
            window_ms: u64::try_from(window.as_millis()).unwrap_or(u64::MAX),
            message: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the message returned to denied clients.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Validate limits that bypassed [`new`](Self::new), e.g. a struct
    /// deserialized from a config file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_requests == 0 {
            return Err(ConfigError::ZeroMaxRequests);
        }
        if self.window_ms == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.window_ms > i64::MAX as u64 {
            return Err(ConfigError::OversizedWindow);
        }
        Ok(())
    }

    /// Window length as a [`Duration`].
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// Recommended limits for common route classes.
///
/// These are data, not wired-up behavior: each function returns a plain
/// [`RateLimitConfig`] to hand to whichever guard or store the host
/// composes.
pub mod presets {
    use super::RateLimitConfig;

    /// Login, registration and credential endpoints: 5 requests per
    /// 15 minutes.
    pub fn auth() -> RateLimitConfig {
        RateLimitConfig {
            max_requests: 5,
            window_ms: 15 * 60 * 1000,
            message: Some("Too many authentication attempts. Please try again later.".to_string()),
        }
    }

    /// General API endpoints: 100 requests per minute.
    pub fn api() -> RateLimitConfig {
        RateLimitConfig {
            max_requests: 100,
            window_ms: 60 * 1000,
            message: Some("Too many API requests. Please try again later.".to_string()),
        }
    }

    /// Form submission endpoints: 10 requests per minute.
    pub fn form() -> RateLimitConfig {
        RateLimitConfig {
            max_requests: 10,
            window_ms: 60 * 1000,
            message: Some("Too many form submissions. Please slow down.".to_string()),
        }
    }

    /// Default tier for everything else: 200 requests per minute.
    pub fn general() -> RateLimitConfig {
        RateLimitConfig {
            max_requests: 200,
            window_ms: 60 * 1000,
            message: Some("Too many requests. Please try again later.".to_string()),
        }
    }
}
