//! Authorization decision types

use serde::Serialize;
use std::fmt;

/// Transport-level class of a decision
///
/// The renderer maps `Forbidden` to 403 and `Unauthorized` to 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Request may proceed
    Allow,
    /// Caller is identified but not permitted
    Forbidden,
    /// Caller supplied no claims at all
    Unauthorized,
}

/// Outcome of a single authorization check
///
/// Exactly one variant per step of the decision pipeline, so every caller
/// has to handle each rejection explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// Request may proceed
    Allowed,

    /// Route is not a key of the policy table and undefined routes are denied
    RouteUndefined { route: String },

    /// Route is defined but has no permission for this method
    MethodUndefined { route: String, method: String },

    /// Caller permission set was empty
    NoClaims,

    /// No claim satisfies the required permission
    InsufficientPermission {
        route: String,
        method: String,
        required: String,
    },
}

impl Decision {
    /// Whether the request may proceed
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    /// Transport-level class
    pub fn verdict(&self) -> Verdict {
        match self {
            Decision::Allowed => Verdict::Allow,
            Decision::NoClaims => Verdict::Unauthorized,
            Decision::RouteUndefined { .. }
            | Decision::MethodUndefined { .. }
            | Decision::InsufficientPermission { .. } => Verdict::Forbidden,
        }
    }

    /// Stable machine-readable reason code
    pub fn code(&self) -> &'static str {
        match self {
            Decision::Allowed => "allowed",
            Decision::RouteUndefined { .. } => "route_undefined",
            Decision::MethodUndefined { .. } => "method_undefined",
            Decision::NoClaims => "no_claims",
            Decision::InsufficientPermission { .. } => "insufficient_permission",
        }
    }

    /// Human-readable reason; `None` for [`Decision::Allowed`]
    pub fn reason(&self) -> Option<String> {
        match self {
            Decision::Allowed => None,
            Decision::RouteUndefined { route } => {
                Some(format!("Route {} not defined in policy", route))
            }
            Decision::MethodUndefined { route, method } => Some(format!(
                "Permission not defined for route {} with method {}",
                route, method
            )),
            Decision::NoClaims => Some("No permissions provided".to_string()),
            Decision::InsufficientPermission { .. } => {
                Some("Insufficient permission for this route/method".to_string())
            }
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "{}: {}", self.code(), reason),
            None => f.write_str(self.code()),
        }
    }
}
