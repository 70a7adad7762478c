//! API Routes
//!
//! Configures the Axum router: public data endpoints, bearer-protected image
//! endpoints, CORS, and request tracing.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::auth::require_api_key;
use super::handlers::{
    health_handler, high_scores_handler, list_images_handler, player_data_handler,
    stats_handler, upload_url_handler, vote_handler, xp_history_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// The image routes carry the API-key middleware; everything else is public.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let image_routes = Router::new()
        .route("/view", get(list_images_handler))
        .route("/upload/upload-url", post(upload_url_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    let v1_routes = Router::new()
        .route("/player-data", get(player_data_handler))
        .route("/high-scores", get(high_scores_handler))
        .route("/experience-history", get(xp_history_handler))
        .route("/vote", get(vote_handler))
        .route("/stats", get(stats_handler))
        .nest("/images", image_routes);

    Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1", v1_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
