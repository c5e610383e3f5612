use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use routeperm_authz::{Decision, Verdict};
use serde_json::json;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized: {message}")]
    Unauthorized { code: &'static str, message: String },

    #[error("Forbidden: {message}")]
    Forbidden { code: &'static str, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// Rejection for a denied decision; `None` when the request may proceed
    pub fn from_decision(decision: &Decision) -> Option<Self> {
        let code = decision.code();
        let message = decision.reason().unwrap_or_default();

        match decision.verdict() {
            Verdict::Allow => None,
            Verdict::Unauthorized => Some(ApiError::Unauthorized { code, message }),
            Verdict::Forbidden => Some(ApiError::Forbidden { code, message }),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::ValidationError(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized { code, .. } | ApiError::Forbidden { code, .. } => *code,
            ApiError::ValidationError(_) => "validation_error",
            ApiError::BadRequest(_) => "bad_request",
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match self {
            ApiError::Unauthorized { message, .. } | ApiError::Forbidden { message, .. } => message,
            ApiError::ValidationError(msg) | ApiError::BadRequest(msg) => msg,
        };

        let body = Json(json!({
            "error": message,
            "code": code,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
