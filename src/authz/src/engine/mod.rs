//! Decision engine
//!
//! Evaluates a request descriptor against the policy table. Pure and
//! synchronous: no caching, no interior mutability, no I/O, so a single
//! engine can be shared across any number of request tasks.
//!
//! # Pipeline
//!
//! ```text
//! route lookup → method lookup → claims presence → wildcard match → Decision
//! ```
//!
//! Each step short-circuits with its own [`Decision`] variant.

pub mod decision;

pub use decision::{Decision, Verdict};

use crate::permission::any_claim_matches;
use crate::policy::PolicyTable;
use crate::types::AuthRequest;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Decision engine configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Allow requests whose route is not a key of the policy table
    #[serde(default)]
    pub allow_undefined: bool,
}

/// Authorization decision engine
///
/// Constructed once from a policy table; the transport layer holds it by
/// reference and calls [`DecisionEngine::authorize`] per request.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    /// Frozen policy table
    policy: Arc<PolicyTable>,

    /// Engine configuration
    config: EngineConfig,
}

impl DecisionEngine {
    /// Create an engine over `policy`
    pub fn new(policy: impl Into<Arc<PolicyTable>>, config: EngineConfig) -> Self {
        let policy = policy.into();

        info!(
            "DecisionEngine initialized with {} routes, allow_undefined={}",
            policy.len(),
            config.allow_undefined
        );

        Self { policy, config }
    }

    /// Policy table the engine evaluates against
    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    /// Engine configuration
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Authorize a request
    pub fn authorize(&self, request: &AuthRequest) -> Decision {
        authorize(request, &self.policy, self.config.allow_undefined)
    }
}

/// Authorize `request` against `policy`
///
/// # Precedence
///
/// 1. Route not in the table: [`Decision::Allowed`] when `allow_undefined`,
///    otherwise [`Decision::RouteUndefined`]
/// 2. Method not registered for the route: [`Decision::MethodUndefined`]
///    (independent of `allow_undefined`)
/// 3. Empty claim set: [`Decision::NoClaims`]
/// 4. Any claim grants the required permission: [`Decision::Allowed`],
///    otherwise [`Decision::InsufficientPermission`]
pub fn authorize(request: &AuthRequest, policy: &PolicyTable, allow_undefined: bool) -> Decision {
    let Some(methods) = policy.lookup_route(&request.route) else {
        debug!(route = %request.route, allow_undefined, "Route not in policy");
        return if allow_undefined {
            Decision::Allowed
        } else {
            Decision::RouteUndefined {
                route: request.route.clone(),
            }
        };
    };

    let Some(required) = methods.lookup_method(&request.method) else {
        debug!(route = %request.route, method = %request.method, "Method not in policy");
        return Decision::MethodUndefined {
            route: request.route.clone(),
            method: request.method.clone(),
        };
    };

    if request.claims.is_empty() {
        debug!(route = %request.route, method = %request.method, "No claims supplied");
        return Decision::NoClaims;
    }

    if any_claim_matches(request.claims.iter(), required) {
        debug!(
            route = %request.route,
            method = %request.method,
            required,
            "Claim grants required permission"
        );
        Decision::Allowed
    } else {
        debug!(
            route = %request.route,
            method = %request.method,
            required,
            claims = request.claims.len(),
            "No claim grants required permission"
        );
        Decision::InsufficientPermission {
            route: request.route.clone(),
            method: request.method.clone(),
            required: required.to_string(),
        }
    }
}
