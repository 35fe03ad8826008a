// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for flood simulation.

/// Generate a pool of client IP strings in the 10.0.0.0/8 range.
pub fn generate_clients(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            format!("10.{}.{}.{}", a, b, c)
        })
        .collect()
}

/// Generate a pool of route paths.
pub fn generate_routes(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("/api/resource-{}/items", i))
        .collect()
}

/// Generate spoofed identity strings that do not even look like
/// addresses. The resolver takes them verbatim.
pub fn generate_spoofed_identities(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("spoofed-client-{}", i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clients_are_unique() {
        let clients = generate_clients(300);
        assert_eq!(clients.len(), 300);
        let unique: std::collections::HashSet<_> = clients.iter().collect();
        assert_eq!(unique.len(), 300);
    }

    #[test]
    fn routes_look_like_paths() {
        let routes = generate_routes(5);
        assert_eq!(routes.len(), 5);
        assert!(routes.iter().all(|route| route.starts_with('/')));
    }
}
