//! Request DTOs for the gateway API
//!
//! Query parameters arrive as raw strings and are validated in the handlers,
//! so a malformed number comes back as the JSON error envelope rather than a
//! framework rejection.

use serde::Deserialize;

/// Query parameters for GET /api/v1/player-data
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerDataQuery {
    /// Player display name (required)
    pub username: Option<String>,
    /// How many recent activities to include (default 0)
    pub activities: Option<String>,
}

/// Query parameters for GET /api/v1/experience-history
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpHistoryQuery {
    /// Player display name (required)
    pub username: Option<String>,
    /// Skill id, 0-28 (required)
    pub skill_id: Option<String>,
}

/// Query parameters for GET /api/v1/images/view
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageListQuery {
    /// Native resume token (cursor mode)
    pub continuation_token: Option<String>,
    /// Window size, 1-1000 (default 50)
    pub limit: Option<String>,
    /// Zero-based item offset (offset mode)
    pub offset: Option<String>,
    /// One-based page number (page mode)
    pub page: Option<String>,
}

/// Request body for POST /api/v1/images/upload/upload-url
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    /// Name of the file to upload
    pub filename: Option<String>,
    /// MIME type of the file
    pub content_type: Option<String>,
}
