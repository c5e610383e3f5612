use axum::{
    extract::{rejection::JsonRejection, MatchedPath, State},
    http::Method,
    Json,
};
use routeperm_authz::{AuthRequest, Claims};
use tracing::info;
use validator::Validate;

use crate::{
    error::{ApiError, Result},
    models::*,
    state::AppState,
};

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
        routes: state.engine.policy().len(),
    })
}

/// Authorization check endpoint
///
/// Evaluates an arbitrary request descriptor without routing it.
pub async fn check_authorization(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<CheckResponse>> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    req.validate()?;

    let request = AuthRequest {
        route: req.route,
        method: req.method,
        claims: Claims::from(req.claims),
    };

    let decision = state.engine.authorize(&request);

    info!(
        route = %request.route,
        method = %request.method,
        code = decision.code(),
        "Authorization check"
    );

    Ok(Json(CheckResponse::from(&decision)))
}

/// Handler mounted on every policy route
///
/// Only reached once the permission middleware allowed the request.
pub async fn echo(matched: MatchedPath, method: Method) -> Json<EchoResponse> {
    Json(EchoResponse {
        route: matched.as_str().to_string(),
        method: method.as_str().to_string(),
    })
}
