//! Response DTOs for the gateway API
//!
//! The data endpoints forward upstream JSON untouched; these types cover the
//! gateway-owned responses (images, stats, health).

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::pagination::PageInfo;
use crate::upstream::ObjectEntry;

/// One image in a listing response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageItem {
    /// Object key
    pub key: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub last_modified: DateTime<Utc>,
    /// URL the image is publicly served from
    pub public_url: String,
}

impl ImageItem {
    /// Builds the item from a stored object and the public serving domain.
    ///
    /// The domain may or may not carry a scheme; a bare domain gets `https://`.
    pub fn from_entry(entry: ObjectEntry, public_domain: &str) -> Self {
        let public_url = public_object_url(public_domain, &entry.key);
        Self {
            key: entry.key,
            size: entry.size,
            last_modified: entry.last_modified,
            public_url,
        }
    }
}

/// Public URL for an object key under the configured serving domain.
pub fn public_object_url(public_domain: &str, key: &str) -> String {
    if public_domain.starts_with("http") {
        format!("{public_domain}/{key}")
    } else {
        format!("https://{public_domain}/{key}")
    }
}

/// Response body for GET /api/v1/images/view
#[derive(Debug, Clone, Serialize)]
pub struct ImageListResponse {
    /// Images inside the requested window
    pub images: Vec<ImageItem>,
    /// Pagination envelope in the client's addressing mode
    pub pagination: PageInfo,
}

/// Response body for POST /api/v1/images/upload/upload-url
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    /// Presigned PUT URL
    pub upload_url: String,
    /// Final (uniquified) object key
    pub filename: String,
    /// Seconds until the presigned URL expires
    pub expires_in: u64,
    /// URL the object will be publicly served from
    pub public_url: String,
}

/// Response body for GET /api/v1/stats
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Player-profile cache counters
    pub player_data: CacheStats,
    /// Experience-history cache counters
    pub experience_history: CacheStats,
    /// Hiscores cache counters
    pub high_scores: CacheStats,
    /// Poll-results cache counters
    pub vote: CacheStats,
}

/// Response body for the health endpoints
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Liveness marker, always "ok"
    pub status: String,
    /// Current timestamp in RFC 3339 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a healthy response stamped now.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
