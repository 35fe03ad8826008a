// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Client identity resolution from proxy headers.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Identity used when neither headers nor a peer address yield one.
///
/// Requests with no resolvable source share this single bucket.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Resolve the identity string that keys a client's windows.
///
/// Sources are consulted in order, first hit wins:
/// 1. `X-Forwarded-For`: the first comma-separated element, trimmed
/// 2. `X-Real-IP`
/// 3. `CF-Connecting-IP`
/// 4. the transport peer address
/// 5. [`UNKNOWN_CLIENT`]
///
/// Values are opaque strings, not parsed or validated as addresses.
/// Headers that are missing, empty after trimming, or not UTF-8 fall
/// through to the next source. These headers are client-controlled unless
/// a trusted proxy overwrites them, so a deployment that is not behind
/// such a proxy is keying its limits on spoofable input.
pub fn resolve_client(headers: &HeaderMap, peer_addr: Option<SocketAddr>) -> String {
    if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
        // Only the leftmost hop counts; later elements are proxies.
        if let Some(first) = forwarded.split(',').next().map(str::trim) {
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = header_str(headers, "x-real-ip") {
        return real_ip.to_string();
    }

    if let Some(cf_ip) = header_str(headers, "cf-connecting-ip") {
        return cf_ip.to_string();
    }

    match peer_addr {
        Some(addr) => addr.ip().to_string(),
        None => UNKNOWN_CLIENT.to_string(),
    }
}

/// Header value as a trimmed, non-empty UTF-8 string.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
