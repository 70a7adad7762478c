//! API Module
//!
//! HTTP handlers, bearer-token auth, and routing for the gateway REST API.
//!
//! # Endpoints
//! - `GET /` / `GET /health` - health check
//! - `GET /api/v1/player-data` - RuneMetrics player profile (cached, keyed)
//! - `GET /api/v1/high-scores` - top-50 overall ranking (cached)
//! - `GET /api/v1/experience-history` - monthly XP per skill (cached, keyed)
//! - `GET /api/v1/vote` - Treasure Hunter poll results (cached)
//! - `GET /api/v1/stats` - cache statistics
//! - `GET /api/v1/images/view` - paginated bucket listing (bearer auth)
//! - `POST /api/v1/images/upload/upload-url` - presigned upload (bearer auth)

pub mod auth;
pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
