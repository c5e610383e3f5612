//! Decision engine integration tests
//!
//! Full pipeline: policy loading → route lookup → method lookup → claims →
//! wildcard match → Decision

use proptest::prelude::*;
use routeperm_authz::{
    authorize, claim_matches, AuthRequest, AuthzError, Claims, Decision, DecisionEngine,
    EngineConfig, PolicyTable, Verdict,
};
use std::io::Write;
use std::sync::Arc;

const POLICY_JSON: &str = r#"{
    "/orders": { "GET": "orders:read", "POST": "orders:write" },
    "/orders/:id": { "GET": "orders:read", "DELETE": "orders:delete" },
    "/billing": { "GET": "billing:read" },
    "/legacy": { "GET": "legacy" }
}"#;

fn engine(allow_undefined: bool) -> DecisionEngine {
    let table = PolicyTable::from_json_str(POLICY_JSON).unwrap();
    DecisionEngine::new(table, EngineConfig { allow_undefined })
}

// ============================================================================
// DECISION FLOW
// ============================================================================

#[test]
fn test_orders_scenario_from_json() {
    let engine = engine(false);

    let cases = [
        ("/orders", "GET", "orders:read", "allowed"),
        ("/orders", "GET", "orders:*", "allowed"),
        ("/orders", "GET", "billing:read", "insufficient_permission"),
        ("/orders", "GET", "", "no_claims"),
        ("/invoices", "GET", "orders:read", "route_undefined"),
        ("/orders", "DELETE", "orders:read", "method_undefined"),
    ];

    for (route, method, header, expected) in cases {
        let request = AuthRequest::new(route, method).with_claims(Claims::parse(header));
        let decision = engine.authorize(&request);
        assert_eq!(
            decision.code(),
            expected,
            "route={} method={} claims={:?}",
            route,
            method,
            header
        );
    }
}

#[test]
fn test_route_pattern_keys_are_exact() {
    let engine = engine(false);

    let request = AuthRequest::new("/orders/:id", "DELETE").with_claim("orders:delete");
    assert!(engine.authorize(&request).is_allowed());

    // Concrete paths are not patterns
    let request = AuthRequest::new("/orders/42", "DELETE").with_claim("orders:delete");
    assert_eq!(engine.authorize(&request).code(), "route_undefined");
}

#[test]
fn test_multiple_claims_first_match_wins() {
    let engine = engine(false);

    let request = AuthRequest::new("/billing", "GET")
        .with_claims(Claims::parse("orders:read, ,broken,billing:*"));
    assert_eq!(engine.authorize(&request), Decision::Allowed);
}

#[test]
fn test_malformed_required_permission() {
    let engine = engine(false);

    let request = AuthRequest::new("/legacy", "GET").with_claim("legacy");
    assert_eq!(engine.authorize(&request).code(), "insufficient_permission");

    let request = AuthRequest::new("/legacy", "GET").with_claim("legacy:*");
    assert_eq!(engine.authorize(&request).code(), "insufficient_permission");

    let request = AuthRequest::new("/legacy", "GET").with_claim("*:*");
    assert!(engine.authorize(&request).is_allowed());
}

#[test]
fn test_verdicts_for_rendering() {
    let engine = engine(false);

    let no_claims = engine.authorize(&AuthRequest::new("/orders", "GET"));
    assert_eq!(no_claims.verdict(), Verdict::Unauthorized);

    let undefined = engine.authorize(&AuthRequest::new("/nope", "GET"));
    assert_eq!(undefined.verdict(), Verdict::Forbidden);

    let allowed = engine.authorize(&AuthRequest::new("/orders", "POST").with_claim("orders:write"));
    assert_eq!(allowed.verdict(), Verdict::Allow);
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn test_load_policy_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(POLICY_JSON.as_bytes()).unwrap();

    let table = PolicyTable::from_path(file.path()).unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(
        table.lookup_route("/orders").unwrap().lookup_method("POST"),
        Some("orders:write")
    );
}

#[test]
fn test_load_invalid_policy_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"/orders": ["GET"]}"#).unwrap();

    let result = PolicyTable::from_path(file.path());
    assert!(matches!(result, Err(AuthzError::Parse(_))));
}

#[test]
fn test_engine_config_deserialize() {
    let config: EngineConfig = serde_json::from_str(r#"{"allow_undefined": true}"#).unwrap();
    assert!(config.allow_undefined);

    let config: EngineConfig = serde_json::from_str("{}").unwrap();
    assert!(!config.allow_undefined);
}

// ============================================================================
// CONCURRENCY
// ============================================================================

#[test]
fn test_shared_engine_across_threads() {
    let engine = Arc::new(engine(false));

    std::thread::scope(|scope| {
        for i in 0..8 {
            let engine = Arc::clone(&engine);
            scope.spawn(move || {
                let claim = if i % 2 == 0 { "orders:read" } else { "billing:read" };
                let request = AuthRequest::new("/orders", "GET").with_claim(claim);
                for _ in 0..1_000 {
                    assert_eq!(engine.authorize(&request).is_allowed(), i % 2 == 0);
                }
            });
        }
    });
}

// ============================================================================
// PROPERTY TESTS
// ============================================================================

proptest! {
    #[test]
    fn test_undefined_routes_follow_flag(
        route in "/[a-z]{1,12}",
        method in "(GET|POST|PUT|DELETE)",
        allow_undefined in any::<bool>()
    ) {
        let table = PolicyTable::from_json_str(POLICY_JSON).unwrap();
        prop_assume!(table.lookup_route(&route).is_none());

        let request = AuthRequest::new(route.clone(), method).with_claim("*:*");
        let decision = authorize(&request, &table, allow_undefined);

        if allow_undefined {
            prop_assert_eq!(decision, Decision::Allowed);
        } else {
            prop_assert_eq!(decision, Decision::RouteUndefined { route });
        }
    }

    #[test]
    fn test_unregistered_method_always_rejected(
        method in "(PUT|PATCH|HEAD|OPTIONS)",
        claims in prop::collection::vec("[a-z*]{0,6}:[a-z*]{0,6}", 0..5),
        allow_undefined in any::<bool>()
    ) {
        let table = PolicyTable::from_json_str(POLICY_JSON).unwrap();
        let request = AuthRequest::new("/orders", method).with_claims(claims.into_iter().collect());

        let decision = authorize(&request, &table, allow_undefined);
        prop_assert_eq!(decision.code(), "method_undefined");
    }

    #[test]
    fn test_registered_pair_without_claims(allow_undefined in any::<bool>()) {
        let table = PolicyTable::from_json_str(POLICY_JSON).unwrap();
        for (route, methods) in table.routes() {
            for (method, _) in methods.iter() {
                let request = AuthRequest::new(route, method);
                prop_assert_eq!(authorize(&request, &table, allow_undefined), Decision::NoClaims);
            }
        }
    }

    #[test]
    fn test_matching_is_reflexive(resource in "[a-z]{1,10}", action in "[a-z]{1,10}") {
        let perm = format!("{}:{}", resource, action);
        prop_assert!(claim_matches(&perm, &perm));
    }

    #[test]
    fn test_action_wildcard_scoped_to_resource(
        resource in "[a-z]{1,10}",
        other in "[a-z]{1,10}",
        action in "[a-z]{1,10}"
    ) {
        prop_assume!(resource != other);
        let claim = format!("{}:*", resource);
        let same = format!("{}:{}", resource, action);
        let different = format!("{}:{}", other, action);
        prop_assert!(claim_matches(&claim, &same));
        prop_assert!(!claim_matches(&claim, &different));
    }

    #[test]
    fn test_universal_claim_matches_anything(required in ".*") {
        prop_assert!(claim_matches("*:*", &required));
    }

    #[test]
    fn test_malformed_claims_never_match(
        claim in "[a-z*]{0,8}|[a-z*]{1,4}:[a-z*]{1,4}:[a-z*]{1,4}",
        required in "[a-z*:]{0,12}"
    ) {
        prop_assert!(!claim_matches(&claim, &required));
        prop_assert!(!claim_matches(&claim, &claim));
    }

    #[test]
    fn test_decision_is_idempotent(
        route in "(/orders|/orders/:id|/billing|/missing)",
        method in "(GET|POST|DELETE)",
        header in "[a-z*:,]{0,24}",
        allow_undefined in any::<bool>()
    ) {
        let engine = {
            let table = PolicyTable::from_json_str(POLICY_JSON).unwrap();
            DecisionEngine::new(table, EngineConfig { allow_undefined })
        };
        let request = AuthRequest::new(route, method).with_claims(Claims::parse(&header));

        let first = engine.authorize(&request);
        for _ in 0..3 {
            prop_assert_eq!(&engine.authorize(&request), &first);
        }
    }
}
