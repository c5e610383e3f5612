//! Middleware layer for the API server
//!
//! This module provides middleware components for:
//! - Route permission enforcement
//! - Request logging and tracing
//! - CORS configuration
//! - Request ID tracking

use crate::error::ApiError;
use axum::{
    extract::{MatchedPath, Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use routeperm_authz::{AuthRequest, Claims, DecisionEngine};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Request ID header name
pub const X_REQUEST_ID: &str = "x-request-id";

/// Caller permission header name
pub const X_USER_PERMISSIONS: &str = "x-user-permissions";

/// Configure CORS middleware
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(X_REQUEST_ID),
            HeaderName::from_static(X_USER_PERMISSIONS),
        ])
        .expose_headers([HeaderName::from_static(X_REQUEST_ID)])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Extract the caller permission set from request headers
///
/// A missing or empty header yields an empty claim set. Non-UTF-8 bytes are
/// replaced, so such a header still counts as present and cannot match.
pub fn claims_from_headers(headers: &HeaderMap) -> Claims {
    headers
        .get(X_USER_PERMISSIONS)
        .map(|v| Claims::parse(&String::from_utf8_lossy(v.as_bytes())))
        .unwrap_or_default()
}

/// Route permission middleware
///
/// Builds an [`AuthRequest`] from the matched route pattern, the HTTP method
/// and the `x-user-permissions` header, and only forwards the request when
/// the engine allows it. Rejections are rendered as JSON (401 for missing
/// claims, 403 otherwise).
///
/// Install with `route_layer` so the matched pattern is available; without a
/// [`MatchedPath`] the raw URI path is used.
pub async fn permission_middleware(
    State(engine): State<Arc<DecisionEngine>>,
    request: Request,
    next: Next,
) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let auth_request = AuthRequest {
        route,
        method: request.method().as_str().to_string(),
        claims: claims_from_headers(request.headers()),
    };

    let decision = engine.authorize(&auth_request);

    match ApiError::from_decision(&decision) {
        None => {
            debug!(
                route = %auth_request.route,
                method = %auth_request.method,
                "Request authorized"
            );
            next.run(request).await
        }
        Some(rejection) => {
            warn!(
                route = %auth_request.route,
                method = %auth_request.method,
                code = decision.code(),
                "Request rejected"
            );
            rejection.into_response()
        }
    }
}

/// Request ID middleware
///
/// Generates or extracts a unique request ID for tracking requests through
/// the system. The request ID is returned in the response headers.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;

    response.headers_mut().insert(
        X_REQUEST_ID,
        HeaderValue::from_str(&request_id.to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("invalid-uuid")),
    );

    response
}

/// Request logging middleware
///
/// Logs all incoming requests with method, URI, and response status.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .extensions()
        .get::<Uuid>()
        .copied()
        .unwrap_or_else(Uuid::new_v4);

    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Incoming request"
    );

    let start = std::time::Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();

    let status = response.status();
    match status.as_u16() {
        500..=599 => tracing::error!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            duration_ms = elapsed.as_millis() as u64,
            "Request completed"
        ),
        400..=499 => warn!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            duration_ms = elapsed.as_millis() as u64,
            "Request completed"
        ),
        _ => info!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            duration_ms = elapsed.as_millis() as u64,
            "Request completed"
        ),
    }

    response
}
