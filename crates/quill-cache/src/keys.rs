//! Cache key builders for all Quill cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use sha2::{Digest, Sha256};

/// Prefix applied to all Quill cache keys.
const PREFIX: &str = "quill";

// ── GET response memoization ───────────────────────────────

/// Cache key for a memoized GET response.
///
/// The fingerprint input should be the route's stable identity plus its
/// sorted query parameters or path arguments; the digest keeps keys
/// compact and opaque regardless of parameter content.
pub fn response(route: &str, fingerprint: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(fingerprint.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{PREFIX}:resp:{route}:{digest}")
}

/// Pattern to invalidate every memoized response for a route family.
pub fn response_pattern(route_prefix: &str) -> String {
    format!("{PREFIX}:resp:{route_prefix}:*")
}

/// Build a stable fingerprint from query parameters by sorting them
/// before joining, so parameter order never splits the cache.
pub fn query_fingerprint(params: &[(&str, &str)]) -> String {
    let mut sorted: Vec<(&str, &str)> = params.to_vec();
    sorted.sort();
    sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_key_is_stable() {
        let a = response("posts:search", "query=rust");
        let b = response("posts:search", "query=rust");
        assert_eq!(a, b);
        assert!(a.starts_with("quill:resp:posts:search:"));
    }

    #[test]
    fn test_response_key_differs_by_fingerprint() {
        let a = response("posts:search", "query=rust");
        let b = response("posts:search", "query=go");
        assert_ne!(a, b);
    }

    #[test]
    fn test_query_fingerprint_order_independent() {
        let a = query_fingerprint(&[("page", "2"), ("query", "rust")]);
        let b = query_fingerprint(&[("query", "rust"), ("page", "2")]);
        assert_eq!(a, b);
        assert_eq!(a, "page=2&query=rust");
    }
}
