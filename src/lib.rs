//! RSGuide Gateway - an HTTP gateway over RuneScape community data
//!
//! Fronts the RuneMetrics API, the hiscores ranking, the Treasure Hunter
//! poll, and an R2 image bucket with a uniform JSON API, adding bearer-token
//! auth, in-memory response caching, and offset/page pagination over the
//! bucket's cursor-only listing.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod upstream;

pub use api::{create_router, AppState};
pub use config::Config;
