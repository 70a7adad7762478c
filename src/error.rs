//! Error types for the gateway
//!
//! Provides unified error handling using thiserror. Every handler error is
//! converted to the JSON envelope `{error, message?}` here; no error leaves
//! a handler unconverted.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

// == Gateway Error Enum ==
/// Unified error type for the gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Missing or malformed request parameter
    #[error("{0}")]
    InvalidRequest(String),

    /// No Authorization header on a protected route
    #[error("Authorization header is required")]
    MissingAuth,

    /// Authorization header present but not a Bearer token
    #[error("Invalid authorization format")]
    MalformedAuth,

    /// Bearer token does not match the configured API key
    #[error("Invalid API key")]
    ForbiddenAuth,

    /// Required server-side configuration is absent
    #[error("Server configuration error: {0}")]
    Config(String),

    /// Upstream collaborator returned a non-success response or failed
    #[error("{0}")]
    Upstream(String),
}

impl GatewayError {
    /// Prefixes an upstream failure with an endpoint-specific label so the
    /// client sees which fetch failed. Other variants pass through untouched.
    pub fn upstream_context(self, label: &str) -> Self {
        match self {
            GatewayError::Upstream(msg) => GatewayError::Upstream(format!("{label}: {msg}")),
            other => other,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            GatewayError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            GatewayError::MissingAuth => (
                StatusCode::UNAUTHORIZED,
                "Authorization header is required".to_string(),
                Some("Please provide an Authorization header with Bearer token".to_string()),
            ),
            GatewayError::MalformedAuth => (
                StatusCode::UNAUTHORIZED,
                "Invalid authorization format".to_string(),
                Some("Authorization header must be in format: Bearer <API_KEY>".to_string()),
            ),
            GatewayError::ForbiddenAuth => (
                StatusCode::FORBIDDEN,
                "Invalid API key".to_string(),
                Some("The provided API key is not valid".to_string()),
            ),
            GatewayError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error".to_string(),
                Some(msg.clone()),
            ),
            GatewayError::Upstream(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), None)
            }
        };

        if status.is_server_error() {
            error!("request failed: {}", self);
        }

        let body = match message {
            Some(message) => Json(json!({ "error": error, "message": message })),
            None => Json(json!({ "error": error })),
        };

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the gateway.
pub type Result<T> = std::result::Result<T, GatewayError>;
