// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for rate limiter flood simulation.
//!
//! This module provides utilities for replaying synthetic traffic
//! patterns against the limiter and measuring what gets through.

pub mod floods;
pub mod generators;
pub mod metrics;
