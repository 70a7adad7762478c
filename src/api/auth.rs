//! Bearer-Token Auth Middleware
//!
//! Protects the image routes with a static API key. The data endpoints stay
//! public.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::api::handlers::AppState;
use crate::error::{GatewayError, Result};

/// Rejects requests whose `Authorization: Bearer <token>` does not match the
/// configured API key.
///
/// Missing header → 401; non-Bearer scheme → 401; key unconfigured on the
/// server → 500; mismatch → 403.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(GatewayError::MissingAuth)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(GatewayError::MalformedAuth)?;

    let expected = state.config.api_key.as_deref().ok_or_else(|| {
        GatewayError::Config("API key is not configured on the server".to_string())
    })?;

    if token != expected {
        return Err(GatewayError::ForbiddenAuth);
    }

    Ok(next.run(request).await)
}
