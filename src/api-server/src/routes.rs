//! Route definitions for the API server
//!
//! - Health and decision API endpoints (never guarded)
//! - One guarded echo route per policy table key

use crate::{handlers, middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{any, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

/// Paths served by the server itself
pub const RESERVED_PATHS: [&str; 2] = ["/health", "/v1/check"];

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/v1/check", post(handlers::check_authorization))
        .merge(guarded_routes(&state))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_id_middleware))
                .layer(axum_middleware::from_fn(middleware::logging_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(middleware::cors_layer()),
        )
        .with_state(state)
}

/// Mount every policy route behind the permission middleware
///
/// Routes are mounted in sorted order. A route that is not an absolute path,
/// shadows a server endpoint, or conflicts with an already mounted pattern
/// (e.g. `/users/:name` after `/users/:id`) is skipped with a warning.
fn guarded_routes(state: &AppState) -> Router<AppState> {
    let mut routes: Vec<&str> = state.engine.policy().routes().map(|(r, _)| r).collect();
    routes.sort_unstable();

    let mut paths = matchit::Router::new();
    for reserved in RESERVED_PATHS {
        let _ = paths.insert(reserved, ());
    }

    let mut router = Router::new();
    let mut mounted = 0usize;

    for route in routes {
        if !route.starts_with('/') {
            warn!(route, "Skipping policy route that is not an absolute path");
            continue;
        }
        if RESERVED_PATHS.contains(&route) {
            warn!(route, "Skipping policy route that shadows a server endpoint");
            continue;
        }
        if let Err(e) = paths.insert(route, ()) {
            warn!(route, error = %e, "Skipping policy route that conflicts in the router");
            continue;
        }

        router = router.route(route, any(handlers::echo));
        mounted += 1;
    }

    debug!("Mounted {} guarded routes", mounted);

    if mounted == 0 {
        return router;
    }

    router.route_layer(axum_middleware::from_fn_with_state(
        state.engine.clone(),
        middleware::permission_middleware,
    ))
}
