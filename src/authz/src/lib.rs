//! # Routeperm Authorization Core
//!
//! Route-level permission checks for HTTP services.
//!
//! ## Features
//!
//! - **Static policy table** mapping `(route pattern, method)` to a required
//!   `resource:action` permission, loaded from JSON or built in code
//! - **Wildcard claims**: `orders:*`, `*:read`, `*:*`
//! - **Typed decisions**: every rejection is a [`Decision`] variant with a
//!   stable reason code, never an error
//! - **Lock-free sharing**: the engine is immutable and `Send + Sync`
//!
//! ## Example
//!
//! ```rust
//! use routeperm_authz::{AuthRequest, Claims, Decision, DecisionEngine, EngineConfig, PolicyTable};
//!
//! let table = PolicyTable::builder()
//!     .route("/orders", "GET", "orders:read")
//!     .build()
//!     .unwrap();
//!
//! let engine = DecisionEngine::new(table, EngineConfig::default());
//!
//! let request = AuthRequest::new("/orders", "GET").with_claims(Claims::parse("orders:*"));
//! assert_eq!(engine.authorize(&request), Decision::Allowed);
//! ```

pub mod engine;
pub mod error;
pub mod permission;
pub mod policy;
pub mod types;

// Re-export commonly used types
pub use engine::{authorize, Decision, DecisionEngine, EngineConfig, Verdict};
pub use error::{AuthzError, Result};
pub use permission::{claim_matches, Permission};
pub use policy::{MethodMap, PolicyTable, PolicyTableBuilder};
pub use types::{AuthRequest, Claims};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
