//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment
//! variables. The object storage block is optional as a unit: when any of its
//! variables is missing the server still starts, and the image endpoints
//! report a configuration error instead.

use std::env;

/// Environment variables that must all be present for the storage backend.
pub const STORAGE_ENV_VARS: [&str; 5] = [
    "R2_ACCOUNT_ID",
    "R2_ACCESS_KEY_ID",
    "R2_SECRET_ACCESS_KEY",
    "R2_BUCKET",
    "R2_PUBLIC_DOMAIN",
];

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Bearer token required by the image endpoints
    pub api_key: Option<String>,
    /// Base URL of the RuneMetrics API
    pub runemetrics_base: String,
    /// Base URL of the secure RuneScape site (hiscores, polls)
    pub secure_base: String,
    /// TTL in seconds for the poll-results cache
    pub vote_ttl: u64,
    /// TTL in seconds for the high-scores cache
    pub highscores_ttl: u64,
    /// TTL in seconds for the player-profile cache
    pub player_ttl: u64,
    /// TTL in seconds for the experience-history cache
    pub xp_ttl: u64,
    /// Maximum entries per keyed cache before LRU eviction
    pub keyed_cache_capacity: usize,
    /// Object storage settings, present only when fully configured
    pub storage: Option<StorageConfig>,
}

/// Credentials and addressing for the R2 bucket.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Cloudflare account id, forms the endpoint hostname
    pub account_id: String,
    /// Access key id for the bucket
    pub access_key_id: String,
    /// Secret access key for the bucket
    pub secret_access_key: String,
    /// Bucket name
    pub bucket: String,
    /// Public domain objects are served from
    pub public_domain: String,
}

impl StorageConfig {
    /// Loads the storage block from the environment.
    ///
    /// Returns `None` if any of [`STORAGE_ENV_VARS`] is absent or empty.
    pub fn from_env() -> Option<Self> {
        let get = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());

        Some(Self {
            account_id: get("R2_ACCOUNT_ID")?,
            access_key_id: get("R2_ACCESS_KEY_ID")?,
            secret_access_key: get("R2_SECRET_ACCESS_KEY")?,
            bucket: get("R2_BUCKET")?,
            public_domain: get("R2_PUBLIC_DOMAIN")?,
        })
    }

    /// Endpoint URL of the S3-compatible API for this account.
    pub fn endpoint_url(&self) -> String {
        format!("https://{}.r2.cloudflarestorage.com", self.account_id)
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `API_KEY` - bearer token for the image endpoints
    /// - `RUNEMETRICS_BASE_URL` - RuneMetrics API base
    /// - `RS_SECURE_BASE_URL` - secure RuneScape site base
    /// - `VOTE_CACHE_TTL` - poll cache TTL in seconds (default: 10)
    /// - `HIGHSCORES_CACHE_TTL` - hiscores cache TTL in seconds (default: 60)
    /// - `PLAYER_CACHE_TTL` - profile cache TTL in seconds (default: 120)
    /// - `XP_CACHE_TTL` - experience cache TTL in seconds (default: 600)
    /// - `PLAYER_CACHE_CAPACITY` - keyed cache entry bound (default: 1000)
    /// - `R2_*` - see [`STORAGE_ENV_VARS`]
    pub fn from_env() -> Self {
        Self {
            server_port: parse_env("SERVER_PORT", 3000),
            api_key: env::var("API_KEY").ok().filter(|v| !v.is_empty()),
            runemetrics_base: env::var("RUNEMETRICS_BASE_URL")
                .unwrap_or_else(|_| "https://apps.runescape.com/runemetrics".to_string()),
            secure_base: env::var("RS_SECURE_BASE_URL")
                .unwrap_or_else(|_| "https://secure.runescape.com".to_string()),
            vote_ttl: parse_env("VOTE_CACHE_TTL", 10),
            highscores_ttl: parse_env("HIGHSCORES_CACHE_TTL", 60),
            player_ttl: parse_env("PLAYER_CACHE_TTL", 120),
            xp_ttl: parse_env("XP_CACHE_TTL", 600),
            keyed_cache_capacity: parse_env("PLAYER_CACHE_CAPACITY", 1000),
            storage: StorageConfig::from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            api_key: None,
            runemetrics_base: "https://apps.runescape.com/runemetrics".to_string(),
            secure_base: "https://secure.runescape.com".to_string(),
            vote_ttl: 10,
            highscores_ttl: 60,
            player_ttl: 120,
            xp_ttl: 600,
            keyed_cache_capacity: 1000,
            storage: None,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
