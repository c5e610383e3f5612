//! Error types for the authorization engine
//!
//! Decisions never fail; these errors only surface while a policy table is
//! being loaded from configuration.

use thiserror::Error;

/// Authorization engine errors
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Invalid policy table definition
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// Policy document could not be parsed
    #[error("Policy parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
