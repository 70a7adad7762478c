//! Pagination Translator Module
//!
//! The image bucket only supports forward-cursor listing. This module
//! re-exposes that listing under three addressing modes: the native cursor,
//! a numeric offset, and a page number.
//!
//! Cursor mode costs one upstream call. Offset and page mode cost a full key
//! enumeration plus one page call: the enumeration locates the anchor key
//! just before the window and yields the total, then the native listing is
//! resumed after the anchor. Both passes observe the same ascending key
//! order; without snapshot isolation a concurrent bucket mutation between
//! the two calls can still skew a window, which is why the page results are
//! intersected with the pre-enumerated slice.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{GatewayError, Result};
use crate::upstream::{ListRequest, ObjectEntry, ObjectStore};

// == Public Constants ==
/// Window size used when the client does not specify one
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Hard cap on the window size, bounding upstream load per request
pub const MAX_PAGE_SIZE: usize = 1000;

/// Page size used for the full enumeration pass
const ENUMERATION_PAGE_SIZE: usize = 1000;

// == Page Request ==
/// The addressing mode requested by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// Resume from a native cursor; `None` starts at the beginning
    Cursor(Option<String>),
    /// Window starting at a zero-based item offset
    Offset(usize),
    /// Window addressed by a one-based page number
    Page(usize),
}

impl PageRequest {
    /// Picks the addressing mode from raw query parameters.
    ///
    /// Precedence: offset, then page, then cursor. Supplying none of them
    /// yields cursor mode from the start of the listing.
    pub fn from_query(
        offset: Option<&str>,
        page: Option<&str>,
        cursor: Option<String>,
    ) -> Result<Self> {
        if let Some(raw) = offset {
            let offset = raw.parse::<usize>().map_err(|_| {
                GatewayError::InvalidRequest("Offset must be a non-negative number".to_string())
            })?;
            return Ok(PageRequest::Offset(offset));
        }

        if let Some(raw) = page {
            let page = raw
                .parse::<usize>()
                .ok()
                .filter(|page| *page >= 1)
                .ok_or_else(|| {
                    GatewayError::InvalidRequest("Page must be a positive number".to_string())
                })?;
            return Ok(PageRequest::Page(page));
        }

        Ok(PageRequest::Cursor(cursor))
    }
}

/// Parses the `limit` parameter: default 50, reject non-positive, cap at
/// [`MAX_PAGE_SIZE`].
pub fn parse_limit(raw: Option<&str>) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_PAGE_SIZE);
    };

    raw.parse::<usize>()
        .ok()
        .filter(|limit| *limit >= 1)
        .map(|limit| limit.min(MAX_PAGE_SIZE))
        .ok_or_else(|| {
            GatewayError::InvalidRequest("Limit must be a positive number".to_string())
        })
}

// == Listing Window ==
/// A resolved window over the listing plus its pagination envelope.
#[derive(Debug, Clone)]
pub struct Window {
    /// Objects inside the window, ascending by key
    pub objects: Vec<ObjectEntry>,
    /// Envelope describing the window in the client's addressing mode
    pub pagination: PageInfo,
}

/// Pagination envelope, shaped per addressing mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageInfo {
    #[serde(rename_all = "camelCase")]
    Cursor {
        #[serde(skip_serializing_if = "Option::is_none")]
        continuation_token: Option<String>,
        has_more: bool,
        total_in_response: usize,
    },
    #[serde(rename_all = "camelCase")]
    Offset {
        offset: usize,
        limit: usize,
        total: usize,
        has_more: bool,
        total_in_response: usize,
    },
    #[serde(rename_all = "camelCase")]
    Page {
        page: usize,
        limit: usize,
        total: usize,
        has_more: bool,
        total_in_response: usize,
    },
}

// == Translator ==
/// Resolves the requested window against the store.
///
/// `limit` must already be validated via [`parse_limit`].
pub async fn resolve_window(
    store: &dyn ObjectStore,
    request: &PageRequest,
    limit: usize,
) -> Result<Window> {
    match request {
        PageRequest::Cursor(cursor) => {
            let page = store
                .list_page(&ListRequest {
                    cursor: cursor.clone(),
                    start_after: None,
                    limit,
                })
                .await?;

            Ok(Window {
                pagination: PageInfo::Cursor {
                    continuation_token: page.next_cursor,
                    has_more: page.has_more,
                    total_in_response: page.objects.len(),
                },
                objects: page.objects,
            })
        }
        PageRequest::Offset(offset) => {
            let (objects, total) = offset_window(store, *offset, limit).await?;
            Ok(Window {
                pagination: PageInfo::Offset {
                    offset: *offset,
                    limit,
                    total,
                    has_more: offset.saturating_add(limit) < total,
                    total_in_response: objects.len(),
                },
                objects,
            })
        }
        PageRequest::Page(page) => {
            let offset = page.saturating_sub(1).saturating_mul(limit);
            let (objects, total) = offset_window(store, offset, limit).await?;
            Ok(Window {
                pagination: PageInfo::Page {
                    page: *page,
                    limit,
                    total,
                    has_more: offset.saturating_add(limit) < total,
                    total_in_response: objects.len(),
                },
                objects,
            })
        }
    }
}

/// Materializes the slice `[offset, offset + limit)` of the listing.
///
/// Returns the window's objects and the listing total.
async fn offset_window(
    store: &dyn ObjectStore,
    offset: usize,
    limit: usize,
) -> Result<(Vec<ObjectEntry>, usize)> {
    let keys = enumerate_keys(store).await?;
    let total = keys.len();

    if offset >= total {
        return Ok((Vec::new(), total));
    }

    let end = offset.saturating_add(limit).min(total);
    let wanted: HashSet<&str> = keys[offset..end].iter().map(String::as_str).collect();
    // The key right before the window; offset 0 starts from the beginning
    let anchor = (offset > 0).then(|| keys[offset - 1].clone());

    let page = store
        .list_page(&ListRequest {
            cursor: None,
            start_after: anchor,
            limit,
        })
        .await?;

    // Intersect with the pre-enumerated slice to guard against drift between
    // the enumeration pass and this page call
    let mut objects: Vec<ObjectEntry> = page
        .objects
        .into_iter()
        .filter(|obj| wanted.contains(obj.key.as_str()))
        .collect();
    objects.sort_by(|a, b| a.key.cmp(&b.key));

    Ok((objects, total))
}

/// Full enumeration pass: walks every cursor page and returns the sorted key
/// set.
async fn enumerate_keys(store: &dyn ObjectStore) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = store
            .list_page(&ListRequest {
                cursor: cursor.take(),
                start_after: None,
                limit: ENUMERATION_PAGE_SIZE,
            })
            .await?;

        keys.extend(page.objects.into_iter().map(|obj| obj.key));

        match page.next_cursor {
            Some(next) if page.has_more => cursor = Some(next),
            // No cursor to resume from, even if the page claims more
            _ => break,
        }
    }

    keys.sort();
    Ok(keys)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::MemoryStore;

    fn store_abc() -> MemoryStore {
        MemoryStore::with_keys(&["a.png", "b.png", "c.png"])
    }

    /// Walks the listing in cursor mode, collecting every key.
    async fn cursor_walk(store: &MemoryStore, limit: usize) -> Vec<String> {
        let mut collected = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let window = resolve_window(store, &PageRequest::Cursor(cursor.clone()), limit)
                .await
                .unwrap();
            collected.extend(window.objects.into_iter().map(|obj| obj.key));

            match window.pagination {
                PageInfo::Cursor {
                    continuation_token: Some(token),
                    has_more: true,
                    ..
                } => cursor = Some(token),
                _ => break,
            }
        }

        collected
    }

    #[tokio::test]
    async fn test_offset_window_scenario() {
        let store = store_abc();
        let window = resolve_window(&store, &PageRequest::Offset(1), 1)
            .await
            .unwrap();

        assert_eq!(window.objects.len(), 1);
        assert_eq!(window.objects[0].key, "b.png");
        assert_eq!(
            window.pagination,
            PageInfo::Offset {
                offset: 1,
                limit: 1,
                total: 3,
                has_more: true,
                total_in_response: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_offset_at_total_is_empty() {
        let store = store_abc();
        let window = resolve_window(&store, &PageRequest::Offset(3), 10)
            .await
            .unwrap();

        assert!(window.objects.is_empty());
        assert_eq!(
            window.pagination,
            PageInfo::Offset {
                offset: 3,
                limit: 10,
                total: 3,
                has_more: false,
                total_in_response: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_offset_last_item_with_oversized_limit() {
        let store = store_abc();
        let window = resolve_window(&store, &PageRequest::Offset(2), 5)
            .await
            .unwrap();

        assert_eq!(window.objects.len(), 1);
        assert_eq!(window.objects[0].key, "c.png");
        match window.pagination {
            PageInfo::Offset { has_more, total_in_response, .. } => {
                assert!(!has_more);
                assert_eq!(total_in_response, 1);
            }
            other => panic!("expected offset envelope, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_offset_cursor_equivalence() {
        let store = MemoryStore::with_keys(&[
            "a.png", "b.png", "c.png", "d.png", "e.png", "f.png", "g.png",
        ]);
        let all_keys = cursor_walk(&store, 2).await;
        assert_eq!(all_keys.len(), 7);

        for offset in 0..all_keys.len() {
            for limit in [1, 3, 10] {
                let window = resolve_window(&store, &PageRequest::Offset(offset), limit)
                    .await
                    .unwrap();
                let keys: Vec<String> =
                    window.objects.into_iter().map(|obj| obj.key).collect();
                let expected: Vec<String> = all_keys
                    .iter()
                    .skip(offset)
                    .take(limit)
                    .cloned()
                    .collect();
                assert_eq!(keys, expected, "offset {offset} limit {limit}");
            }
        }
    }

    #[tokio::test]
    async fn test_cursor_walk_covers_listing_in_order() {
        let store = MemoryStore::with_keys(&["d.png", "a.png", "c.png", "b.png"]);
        let keys = cursor_walk(&store, 3).await;
        assert_eq!(keys, ["a.png", "b.png", "c.png", "d.png"]);
    }

    #[tokio::test]
    async fn test_page_mode_matches_offset_mode() {
        let store = MemoryStore::with_keys(&["a.png", "b.png", "c.png", "d.png", "e.png"]);

        let window = resolve_window(&store, &PageRequest::Page(2), 2).await.unwrap();
        let keys: Vec<&str> = window.objects.iter().map(|obj| obj.key.as_str()).collect();
        assert_eq!(keys, ["c.png", "d.png"]);
        assert_eq!(
            window.pagination,
            PageInfo::Page {
                page: 2,
                limit: 2,
                total: 5,
                has_more: true,
                total_in_response: 2,
            }
        );

        let window = resolve_window(&store, &PageRequest::Page(3), 2).await.unwrap();
        assert_eq!(window.objects.len(), 1);
        assert_eq!(window.objects[0].key, "e.png");
        match window.pagination {
            PageInfo::Page { has_more, .. } => assert!(!has_more),
            other => panic!("expected page envelope, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let store = MemoryStore::default();
        let window = resolve_window(&store, &PageRequest::Offset(0), 10)
            .await
            .unwrap();

        assert!(window.objects.is_empty());
        match window.pagination {
            PageInfo::Offset { total, has_more, .. } => {
                assert_eq!(total, 0);
                assert!(!has_more);
            }
            other => panic!("expected offset envelope, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_enumeration_spans_multiple_upstream_pages() {
        // More keys than one enumeration page, so the cursor loop must run
        let keys: Vec<String> = (0..1150).map(|i| format!("img{i:04}.png")).collect();
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        let store = MemoryStore::with_keys(&refs);

        let window = resolve_window(&store, &PageRequest::Offset(1100), 10)
            .await
            .unwrap();

        assert_eq!(window.objects.len(), 10);
        assert_eq!(window.objects[0].key, "img1100.png");
        match window.pagination {
            PageInfo::Offset { total, has_more, .. } => {
                assert_eq!(total, 1150);
                assert!(has_more);
            }
            other => panic!("expected offset envelope, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None).unwrap(), DEFAULT_PAGE_SIZE);
        assert_eq!(parse_limit(Some("25")).unwrap(), 25);
        assert_eq!(parse_limit(Some("5000")).unwrap(), MAX_PAGE_SIZE);

        for bad in ["0", "-3", "abc", ""] {
            assert!(
                matches!(parse_limit(Some(bad)), Err(GatewayError::InvalidRequest(_))),
                "limit {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_query_precedence_and_validation() {
        let req = PageRequest::from_query(Some("5"), Some("2"), Some("tok".into())).unwrap();
        assert_eq!(req, PageRequest::Offset(5));

        let req = PageRequest::from_query(None, Some("2"), Some("tok".into())).unwrap();
        assert_eq!(req, PageRequest::Page(2));

        let req = PageRequest::from_query(None, None, Some("tok".into())).unwrap();
        assert_eq!(req, PageRequest::Cursor(Some("tok".into())));

        let req = PageRequest::from_query(None, None, None).unwrap();
        assert_eq!(req, PageRequest::Cursor(None));

        assert!(PageRequest::from_query(Some("-1"), None, None).is_err());
        assert!(PageRequest::from_query(Some("x"), None, None).is_err());
        assert!(PageRequest::from_query(None, Some("0"), None).is_err());
    }

    #[test]
    fn test_page_info_serializes_camel_case() {
        let info = PageInfo::Offset {
            offset: 1,
            limit: 1,
            total: 3,
            has_more: true,
            total_in_response: 1,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "offset": 1,
                "limit": 1,
                "total": 3,
                "hasMore": true,
                "totalInResponse": 1
            })
        );

        // Exhausted cursor omits the token
        let info = PageInfo::Cursor {
            continuation_token: None,
            has_more: false,
            total_in_response: 0,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("continuationToken").is_none());
        assert_eq!(json["hasMore"], false);
    }
}
