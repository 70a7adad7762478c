//! Object Storage Module
//!
//! Capability interface over the image bucket plus its two implementations:
//! `R2Store` against the S3-compatible Cloudflare R2 API, and `MemoryStore`
//! for tests and local development. Both surface only image objects and list
//! them in ascending lexicographic key order, which is what keeps windowed
//! reads consistent for the pagination translator.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use chrono::{DateTime, Utc};

use crate::config::StorageConfig;
use crate::error::{GatewayError, Result};

/// Extensions an object key must carry to be surfaced by the listing.
const IMAGE_EXTENSIONS: [&str; 8] = [
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".bmp", ".tiff",
];

/// Returns true when `key` names an image object.
pub fn is_image_key(key: &str) -> bool {
    let key = key.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| key.ends_with(ext))
}

// == Listing Types ==
/// One page request against the native cursor listing.
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    /// Opaque resume token from a previous page; takes precedence over
    /// `start_after`
    pub cursor: Option<String>,
    /// Start enumeration immediately after this key
    pub start_after: Option<String>,
    /// Maximum objects to return
    pub limit: usize,
}

/// One stored object as reported by the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    /// Object key
    pub key: String,
    /// Object size in bytes
    pub size: u64,
    /// Last modification time
    pub last_modified: DateTime<Utc>,
}

/// One page of listing results.
#[derive(Debug, Clone)]
pub struct ObjectPage {
    /// Objects in this page, ascending by key
    pub objects: Vec<ObjectEntry>,
    /// Token resuming enumeration after this page, when one exists
    pub next_cursor: Option<String>,
    /// Whether the listing continues past this page
    pub has_more: bool,
    /// Backend-reported count hint for this page, when available
    pub total_count: Option<usize>,
}

// == Object Store Trait ==
/// The object-storage capability handlers and the pagination translator
/// depend on.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetches one page of the (image-filtered, key-ordered) object listing.
    async fn list_page(&self, request: &ListRequest) -> Result<ObjectPage>;

    /// Returns a presigned URL allowing one PUT of `key` with the given
    /// content type, valid for `expires_in`.
    async fn presign_upload(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String>;
}

// == R2 Store ==
/// Production store backed by a Cloudflare R2 bucket via the S3 API.
#[derive(Debug, Clone)]
pub struct R2Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl R2Store {
    // == Constructor ==
    /// Builds a client for the account's R2 endpoint with static credentials.
    pub fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "r2-static",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("auto"))
            .endpoint_url(config.endpoint_url())
            .credentials_provider(credentials)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for R2Store {
    async fn list_page(&self, request: &ListRequest) -> Result<ObjectPage> {
        let mut call = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .max_keys(request.limit as i32);
        if let Some(cursor) = &request.cursor {
            call = call.continuation_token(cursor);
        }
        if let Some(after) = &request.start_after {
            call = call.start_after(after);
        }

        let output = call.send().await.map_err(|e| {
            GatewayError::Upstream(format!("object listing failed: {}", DisplayErrorContext(e)))
        })?;

        let objects = output
            .contents()
            .iter()
            .filter_map(|obj| {
                let key = obj.key()?.to_string();
                if !is_image_key(&key) {
                    return None;
                }
                Some(ObjectEntry {
                    key,
                    size: obj.size().unwrap_or(0).max(0) as u64,
                    last_modified: obj
                        .last_modified()
                        .and_then(|ts| DateTime::from_timestamp(ts.secs(), ts.subsec_nanos()))
                        .unwrap_or_default(),
                })
            })
            .collect();

        Ok(ObjectPage {
            objects,
            next_cursor: output.next_continuation_token().map(str::to_string),
            has_more: output.is_truncated().unwrap_or(false),
            total_count: output.key_count().map(|count| count.max(0) as usize),
        })
    }

    async fn presign_upload(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| GatewayError::Config(format!("invalid presign expiry: {e}")))?;

        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning)
            .await
            .map_err(|e| {
                GatewayError::Upstream(format!(
                    "failed to presign upload: {}",
                    DisplayErrorContext(e)
                ))
            })?;

        Ok(presigned.uri().to_string())
    }
}

// == Memory Store ==
/// Deterministic in-memory store for tests and local development.
///
/// Keys are held sorted; cursors encode the index of the next object, which
/// mirrors the lexicographic enumeration order of the S3 API.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: Vec<ObjectEntry>,
}

impl MemoryStore {
    // == Constructors ==
    /// Creates a store over the given objects, image-filtered and sorted.
    pub fn new(mut objects: Vec<ObjectEntry>) -> Self {
        objects.retain(|obj| is_image_key(&obj.key));
        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Self { objects }
    }

    /// Convenience constructor from bare keys, for tests.
    pub fn with_keys(keys: &[&str]) -> Self {
        Self::new(
            keys.iter()
                .enumerate()
                .map(|(i, key)| ObjectEntry {
                    key: (*key).to_string(),
                    size: 1024 * (i as u64 + 1),
                    last_modified: DateTime::<Utc>::default(),
                })
                .collect(),
        )
    }

    /// Number of objects held.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true when the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_page(&self, request: &ListRequest) -> Result<ObjectPage> {
        let start = if let Some(cursor) = &request.cursor {
            cursor.parse::<usize>().map_err(|_| {
                GatewayError::InvalidRequest("invalid continuation token".to_string())
            })?
        } else if let Some(after) = &request.start_after {
            self.objects.partition_point(|obj| obj.key.as_str() <= after.as_str())
        } else {
            0
        };

        let end = start.saturating_add(request.limit).min(self.objects.len());
        let start = start.min(end);
        let objects: Vec<ObjectEntry> = self.objects[start..end].to_vec();
        let has_more = end < self.objects.len();

        Ok(ObjectPage {
            total_count: Some(objects.len()),
            next_cursor: has_more.then(|| end.to_string()),
            has_more,
            objects,
        })
    }

    async fn presign_upload(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String> {
        Ok(format!(
            "https://storage.invalid/upload/{key}?contentType={content_type}&expires={}",
            expires_in.as_secs()
        ))
    }
}
