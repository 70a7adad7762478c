//! API Handlers
//!
//! One handler per endpoint, all following the same orchestration: validate
//! parameters, consult the endpoint's cache, on a miss call the upstream
//! collaborator, store the result only on success, return it unchanged.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use url::Url;

use crate::cache::{derive_key, KeyedCache, SingleCache};
use crate::config::{Config, STORAGE_ENV_VARS};
use crate::error::{GatewayError, Result};
use crate::models::{
    HealthResponse, ImageItem, ImageListQuery, ImageListResponse, PlayerDataQuery, StatsResponse,
    UploadUrlRequest, UploadUrlResponse, XpHistoryQuery,
};
use crate::models::responses::public_object_url;
use crate::pagination::{parse_limit, resolve_window, PageRequest};
use crate::upstream::{Fetcher, ObjectStore};

/// Content types accepted for image uploads.
const ALLOWED_UPLOAD_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Validity of a presigned upload URL.
const UPLOAD_URL_EXPIRY: Duration = Duration::from_secs(300);

// == Application State ==
/// State shared across all handlers.
///
/// Each endpoint owns its cache instance; collaborators sit behind trait
/// objects so tests can inject stubs.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration
    pub config: Arc<Config>,
    /// Upstream JSON fetch collaborator
    pub fetcher: Arc<dyn Fetcher>,
    /// Object storage collaborator, absent when not configured
    pub store: Option<Arc<dyn ObjectStore>>,
    /// Player-profile cache, keyed by username + activities count
    pub player_cache: Arc<RwLock<KeyedCache<Value>>>,
    /// Experience-history cache, keyed by username + skill id
    pub xp_cache: Arc<RwLock<KeyedCache<Value>>>,
    /// Hiscores ranking cache
    pub highscores_cache: Arc<RwLock<SingleCache<Value>>>,
    /// Poll-results cache
    pub vote_cache: Arc<RwLock<SingleCache<Value>>>,
}

impl AppState {
    /// Creates state with caches sized and aged from the configuration.
    pub fn new(
        config: Config,
        fetcher: Arc<dyn Fetcher>,
        store: Option<Arc<dyn ObjectStore>>,
    ) -> Self {
        let capacity = config.keyed_cache_capacity;
        let player_cache = KeyedCache::new(capacity, Duration::from_secs(config.player_ttl));
        let xp_cache = KeyedCache::new(capacity, Duration::from_secs(config.xp_ttl));
        let highscores_cache = SingleCache::new(Duration::from_secs(config.highscores_ttl));
        let vote_cache = SingleCache::new(Duration::from_secs(config.vote_ttl));

        Self {
            config: Arc::new(config),
            fetcher,
            store,
            player_cache: Arc::new(RwLock::new(player_cache)),
            xp_cache: Arc::new(RwLock::new(xp_cache)),
            highscores_cache: Arc::new(RwLock::new(highscores_cache)),
            vote_cache: Arc::new(RwLock::new(vote_cache)),
        }
    }
}

// == Helpers ==

/// Builds a query-encoded URL under an upstream base.
fn upstream_url(base: &str, path: &str, params: &[(&str, &str)]) -> Result<Url> {
    let full = format!("{}/{}", base.trim_end_matches('/'), path);
    let parsed = if params.is_empty() {
        Url::parse(&full)
    } else {
        Url::parse_with_params(&full, params)
    };
    parsed.map_err(|e| GatewayError::Config(format!("invalid upstream URL {full}: {e}")))
}

fn storage_unconfigured() -> GatewayError {
    GatewayError::Config(format!(
        "Missing required environment variables: {}",
        STORAGE_ENV_VARS.join(", ")
    ))
}

/// The storage collaborator and its settings, or a configuration failure.
fn storage_parts(state: &AppState) -> Result<(&Arc<dyn ObjectStore>, &str)> {
    let store = state.store.as_ref().ok_or_else(storage_unconfigured)?;
    let settings = state
        .config
        .storage
        .as_ref()
        .ok_or_else(storage_unconfigured)?;
    Ok((store, &settings.public_domain))
}

// == Health ==
/// Handler for GET / and GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

// == Player Data ==
/// Handler for GET /api/v1/player-data
///
/// Requires `username`; `activities` selects how many recent activities the
/// profile includes and is part of the cache key.
pub async fn player_data_handler(
    State(state): State<AppState>,
    Query(query): Query<PlayerDataQuery>,
) -> Result<Json<Value>> {
    let username = match query.username.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            return Err(GatewayError::InvalidRequest(
                "The \"username\" query parameter is required.".to_string(),
            ))
        }
    };
    let activities: u32 = match query.activities.as_deref() {
        None => 0,
        Some(raw) => raw.parse().map_err(|_| {
            GatewayError::InvalidRequest("activities must be a non-negative number".to_string())
        })?,
    };

    let key = derive_key(&[&username, &activities.to_string()]);
    if let Some(cached) = state.player_cache.write().await.get(&key) {
        return Ok(Json(cached));
    }

    let url = upstream_url(
        &state.config.runemetrics_base,
        "profile/profile",
        &[("user", username.as_str()), ("activities", &activities.to_string())],
    )?;
    let data = state
        .fetcher
        .fetch_json(url.as_str())
        .await
        .map_err(|e| e.upstream_context("Failed to fetch player data"))?;

    state.player_cache.write().await.set(key, data.clone());
    Ok(Json(data))
}

// == High Scores ==
/// Handler for GET /api/v1/high-scores
///
/// Top-50 overall ranking; no parameters, one shared cache slot.
pub async fn high_scores_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    if let Some(cached) = state.highscores_cache.write().await.get() {
        return Ok(Json(cached));
    }

    let url = upstream_url(
        &state.config.secure_base,
        "m=hiscore/ranking.json",
        &[("table", "0"), ("category", "0"), ("size", "50")],
    )?;
    let data = state
        .fetcher
        .fetch_json(url.as_str())
        .await
        .map_err(|e| e.upstream_context("Failed to fetch high score data"))?;

    state.highscores_cache.write().await.set(data.clone());
    Ok(Json(data))
}

// == Experience History ==
/// Handler for GET /api/v1/experience-history
///
/// Monthly XP gains for one skill of one player; both parameters are
/// required and form the cache key.
pub async fn xp_history_handler(
    State(state): State<AppState>,
    Query(query): Query<XpHistoryQuery>,
) -> Result<Json<Value>> {
    let username = query.username.as_deref().map(str::trim).unwrap_or("");
    let skill_raw = query.skill_id.as_deref().map(str::trim).unwrap_or("");
    if username.is_empty() || skill_raw.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "username and skillId query parameters are required.".to_string(),
        ));
    }

    let skill_id: u8 = skill_raw
        .parse()
        .ok()
        .filter(|id| *id <= 28)
        .ok_or_else(|| {
            GatewayError::InvalidRequest(
                "skillId must be an integer between 0 and 28".to_string(),
            )
        })?;

    let key = derive_key(&[username, &skill_id.to_string()]);
    if let Some(cached) = state.xp_cache.write().await.get(&key) {
        return Ok(Json(cached));
    }

    let url = upstream_url(
        &state.config.runemetrics_base,
        "xp-monthly",
        &[("searchName", username), ("skillid", &skill_id.to_string())],
    )?;
    let data = state
        .fetcher
        .fetch_json(url.as_str())
        .await
        .map_err(|e| e.upstream_context("Failed to fetch player exp history"))?;

    state.xp_cache.write().await.set(key, data.clone());
    Ok(Json(data))
}

// == Vote ==
/// Handler for GET /api/v1/vote
///
/// Treasure Hunter poll results; short TTL since the count moves while a
/// poll is open.
pub async fn vote_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    if let Some(cached) = state.vote_cache.write().await.get() {
        return Ok(Json(cached));
    }

    let url = upstream_url(
        &state.config.secure_base,
        "m=poll/a=13/treasure-hunter-poll-results-ajax",
        &[],
    )?;
    let data = state
        .fetcher
        .fetch_json(url.as_str())
        .await
        .map_err(|e| e.upstream_context("Failed to fetch vote data"))?;

    state.vote_cache.write().await.set(data.clone());
    Ok(Json(data))
}

// == Stats ==
/// Handler for GET /api/v1/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        player_data: state.player_cache.read().await.stats(),
        experience_history: state.xp_cache.read().await.stats(),
        high_scores: state.highscores_cache.read().await.stats(),
        vote: state.vote_cache.read().await.stats(),
    })
}

// == Image Listing ==
/// Handler for GET /api/v1/images/view
///
/// Pagination translation happens here; the window itself is never cached.
pub async fn list_images_handler(
    State(state): State<AppState>,
    Query(query): Query<ImageListQuery>,
) -> Result<Json<ImageListResponse>> {
    let (store, public_domain) = storage_parts(&state)?;

    let limit = parse_limit(query.limit.as_deref())?;
    let request = PageRequest::from_query(
        query.offset.as_deref(),
        query.page.as_deref(),
        query.continuation_token.clone(),
    )?;

    let window = resolve_window(store.as_ref(), &request, limit)
        .await
        .map_err(|e| e.upstream_context("Failed to list images"))?;

    let images = window
        .objects
        .into_iter()
        .map(|entry| ImageItem::from_entry(entry, public_domain))
        .collect();

    Ok(Json(ImageListResponse {
        images,
        pagination: window.pagination,
    }))
}

// == Upload URL ==
/// Handler for POST /api/v1/images/upload/upload-url
///
/// Issues a presigned PUT for one image object; the key is uniquified with
/// an epoch-millis prefix so uploads never overwrite each other.
pub async fn upload_url_handler(
    State(state): State<AppState>,
    Json(body): Json<UploadUrlRequest>,
) -> Result<Json<UploadUrlResponse>> {
    let (store, public_domain) = storage_parts(&state)?;

    let filename = match body.filename.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(GatewayError::InvalidRequest("Filename is required".to_string())),
    };
    let content_type = match body.content_type.as_deref().map(str::trim) {
        Some(ct) if !ct.is_empty() => ct.to_string(),
        _ => {
            return Err(GatewayError::InvalidRequest(
                "Content type is required".to_string(),
            ))
        }
    };
    if !ALLOWED_UPLOAD_TYPES.contains(&content_type.as_str()) {
        return Err(GatewayError::InvalidRequest(format!(
            "Invalid content type. Only image files are allowed: {}",
            ALLOWED_UPLOAD_TYPES.join(", ")
        )));
    }

    let unique_filename = format!("{}-{}", Utc::now().timestamp_millis(), filename);
    let upload_url = store
        .presign_upload(&unique_filename, &content_type, UPLOAD_URL_EXPIRY)
        .await
        .map_err(|e| e.upstream_context("Failed to generate upload URL"))?;

    let public_url = public_object_url(public_domain, &unique_filename);
    Ok(Json(UploadUrlResponse {
        upload_url,
        filename: unique_filename,
        expires_in: UPLOAD_URL_EXPIRY.as_secs(),
        public_url,
    }))
}
