// HTTP layer for the route permission engine: axum middleware, decision API
// and a gateway server that guards every route of a policy file.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, Result};
pub use middleware::{permission_middleware, X_USER_PERMISSIONS};
pub use server::{Server, ServerBuilder, ServerConfig};
pub use state::AppState;
