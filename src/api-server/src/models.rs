use routeperm_authz::{Claims, Decision, Verdict};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Authorization check request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckRequest {
    /// Route pattern (e.g. `/users/:id`)
    #[validate(length(min = 1, max = 2048))]
    pub route: String,

    /// HTTP method
    #[validate(length(min = 1, max = 32))]
    pub method: String,

    /// Caller claims, either a list or a comma-separated string
    #[serde(default)]
    pub claims: ClaimsInput,
}

/// Claims as sent by API clients
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClaimsInput {
    /// Raw header-style value: `"orders:read,billing:*"`
    Header(String),
    /// Pre-split list
    List(Vec<String>),
}

impl Default for ClaimsInput {
    fn default() -> Self {
        ClaimsInput::List(Vec::new())
    }
}

impl From<ClaimsInput> for Claims {
    fn from(input: ClaimsInput) -> Self {
        match input {
            ClaimsInput::Header(raw) => Claims::parse(&raw),
            ClaimsInput::List(list) => list.into_iter().map(|c| c.trim().to_string()).collect(),
        }
    }
}

/// Authorization check response
#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    /// Whether the request may proceed
    pub allowed: bool,

    /// Transport-level class (allow, forbidden, unauthorized)
    pub decision: Verdict,

    /// Stable reason code
    pub code: &'static str,

    /// Human-readable reason for rejections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&Decision> for CheckResponse {
    fn from(decision: &Decision) -> Self {
        Self {
            allowed: decision.is_allowed(),
            decision: decision.verdict(),
            code: decision.code(),
            reason: decision.reason(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub routes: usize,
}

/// Body returned by guarded routes once the request is allowed
#[derive(Debug, Clone, Serialize)]
pub struct EchoResponse {
    pub route: String,
    pub method: String,
}
