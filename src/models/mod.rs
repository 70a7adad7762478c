//! Request and Response models for the gateway API
//!
//! DTOs for HTTP query parameters, request bodies, and response bodies.
//! Response field names stay camelCase on the wire.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ImageListQuery, PlayerDataQuery, UploadUrlRequest, XpHistoryQuery};
pub use responses::{
    HealthResponse, ImageItem, ImageListResponse, StatsResponse, UploadUrlResponse,
};
