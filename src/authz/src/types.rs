//! Core authorization types

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Raw claim separator used by [`Claims::parse`]
pub const CLAIM_DELIMITER: char = ',';

/// Caller permission set (already authenticated upstream)
///
/// Empty entries are kept as `""`; they never match any requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims {
    entries: BTreeSet<String>,
}

impl Claims {
    /// Create an empty claim set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single delimiter-separated value (e.g. a header)
    ///
    /// An empty input yields an empty set. Otherwise every token is trimmed
    /// and kept, so `"a:b,,c:d"` contains `""`.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::new();
        }

        raw.split(CLAIM_DELIMITER).map(str::trim).collect()
    }

    /// Add a claim
    pub fn with_claim(mut self, claim: impl Into<String>) -> Self {
        self.entries.insert(claim.into());
        self
    }

    /// True when no claims were supplied
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct claims
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the exact claim string is present
    pub fn contains(&self, claim: &str) -> bool {
        self.entries.contains(claim)
    }

    /// Iterate over the claims
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Claims {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Authorization request descriptor
///
/// `route` is the matched route pattern (e.g. `/users/:id`), never the
/// concrete request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
    /// Route pattern
    pub route: String,

    /// HTTP method
    pub method: String,

    /// Caller permission set
    #[serde(default)]
    pub claims: Claims,
}

impl AuthRequest {
    /// Create a request with no claims
    pub fn new(route: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            method: method.into(),
            claims: Claims::new(),
        }
    }

    /// Replace the claim set
    pub fn with_claims(mut self, claims: Claims) -> Self {
        self.claims = claims;
        self
    }

    /// Add a single claim
    pub fn with_claim(mut self, claim: impl Into<String>) -> Self {
        self.claims = self.claims.with_claim(claim);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_input() {
        let claims = Claims::parse("");
        assert!(claims.is_empty());
        assert_eq!(claims.len(), 0);
    }

    #[test]
    fn test_parse_trims_and_keeps_empty_entries() {
        let claims = Claims::parse("orders:read, billing:*,,");
        assert_eq!(claims.len(), 3);
        assert!(claims.contains("orders:read"));
        assert!(claims.contains("billing:*"));
        assert!(claims.contains(""));
    }

    #[test]
    fn test_parse_whitespace_only_is_not_empty() {
        let claims = Claims::parse("  ");
        assert!(!claims.is_empty());
        assert!(claims.contains(""));
    }

    #[test]
    fn test_claims_deduplicate() {
        let claims: Claims = ["a:b", "a:b", "c:d"].into_iter().collect();
        assert_eq!(claims.len(), 2);
    }

    #[test]
    fn test_request_builder() {
        let request = AuthRequest::new("/orders", "GET")
            .with_claim("orders:read")
            .with_claim("orders:write");

        assert_eq!(request.route, "/orders");
        assert_eq!(request.method, "GET");
        assert_eq!(request.claims.len(), 2);
    }

    #[test]
    fn test_request_deserialize_without_claims() {
        let request: AuthRequest =
            serde_json::from_str(r#"{"route": "/orders", "method": "GET"}"#).unwrap();
        assert!(request.claims.is_empty());

        let request: AuthRequest = serde_json::from_str(
            r#"{"route": "/orders", "method": "GET", "claims": ["orders:read"]}"#,
        )
        .unwrap();
        assert!(request.claims.contains("orders:read"));
    }
}
