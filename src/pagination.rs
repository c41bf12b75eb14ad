//! Stateless cursor pagination for list endpoints.
//!
//! List results are resumable without any server-held session: the cursor
//! encodes its own position, the total count at issue time, and an issue
//! timestamp. It is base64(JSON) — a convenience opacity so clients treat
//! it as a token, not a security boundary. Cursors expire one hour after
//! issue.
//!
//! # Examples
//!
//! ```
//! use assistants_mcp::pagination::{paginate, PageRequest};
//!
//! let items: Vec<u32> = (0..25).collect();
//!
//! let page = paginate(&items, &PageRequest { cursor: None, limit: Some(10) }).unwrap();
//! assert_eq!(page.items.len(), 10);
//! assert!(page.has_more);
//!
//! let next = page.next_cursor.unwrap();
//! let page = paginate(&items, &PageRequest { cursor: Some(next), limit: Some(10) }).unwrap();
//! assert_eq!(page.items, (10..20).collect::<Vec<u32>>());
//! ```

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::time::{SystemTime, UNIX_EPOCH};

/// How long an issued cursor stays decodable.
pub const CURSOR_TTL_MS: u64 = 60 * 60 * 1000;

const DEFAULT_LIMIT: usize = 10;
const MIN_LIMIT: usize = 1;
const MAX_LIMIT: usize = 50;

/// A decoded pagination cursor.
///
/// Invariant: `index <= total`. Cursors are never mutated; each page issues
/// a fresh one with a fresh timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Cursor {
    /// Absolute position of the next item to return
    pub index: usize,
    /// Total item count when the cursor was issued
    pub total: usize,
    /// Issue time, epoch milliseconds
    pub timestamp: u64,
}

/// Why a cursor failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    /// Not base64(JSON) of the expected shape
    #[error("Parameter cursor is not a valid pagination cursor. Pass the nextCursor value from a previous page verbatim.")]
    Malformed,
    /// Decoded, but `index > total`
    #[error("Parameter cursor is not a valid pagination cursor: its position exceeds its total.")]
    Inconsistent,
    /// Issued more than [`CURSOR_TTL_MS`] ago
    #[error("Parameter cursor has expired. Cursors are valid for one hour; restart the listing without a cursor.")]
    Expired,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Encodes a cursor as an opaque string.
///
/// # Examples
///
/// ```
/// use assistants_mcp::pagination::{encode, decode, Cursor};
///
/// let cursor = Cursor { index: 10, total: 25, timestamp: 0 };
/// let token = encode(&cursor);
/// // Opaque to callers, but reversible.
/// assert!(!token.contains("10"));
/// ```
pub fn encode(cursor: &Cursor) -> String {
    URL_SAFE_NO_PAD.encode(serde_json::to_vec(cursor).unwrap())
}

/// Decodes an opaque cursor string.
///
/// Fails if the token is malformed, internally inconsistent, or was issued
/// more than one hour ago.
///
/// # Examples
///
/// ```
/// use assistants_mcp::pagination::{encode, decode, Cursor, CursorError};
/// use std::time::{SystemTime, UNIX_EPOCH};
///
/// let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis() as u64;
///
/// let cursor = Cursor { index: 3, total: 9, timestamp: now };
/// assert_eq!(decode(&encode(&cursor)).unwrap(), cursor);
///
/// let stale = Cursor { index: 3, total: 9, timestamp: now - 2 * 60 * 60 * 1000 };
/// assert_eq!(decode(&encode(&stale)), Err(CursorError::Expired));
///
/// assert_eq!(decode("not-a-cursor"), Err(CursorError::Malformed));
/// ```
pub fn decode(token: &str) -> Result<Cursor, CursorError> {
    decode_at(token, now_ms())
}

fn decode_at(token: &str, now: u64) -> Result<Cursor, CursorError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| CursorError::Malformed)?;
    let cursor: Cursor = serde_json::from_slice(&bytes).map_err(|_| CursorError::Malformed)?;
    if cursor.index > cursor.total {
        return Err(CursorError::Inconsistent);
    }
    if now.saturating_sub(cursor.timestamp) > CURSOR_TTL_MS {
        return Err(CursorError::Expired);
    }
    Ok(cursor)
}

/// Pagination inputs for a list call.
#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct PageRequest {
    /// Opaque cursor from a previous page, if resuming
    pub cursor: Option<String>,
    /// Requested page size; defaults to 10, clamped to [1, 50]
    pub limit: Option<u64>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Page<T> {
    /// The items on this page
    pub items: Vec<T>,
    /// Cursor for the next page; present iff `has_more`
    #[serde(rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    /// Total item count
    pub total: usize,
    /// Whether more items follow this page
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

/// Returns one page of `items` for the given request.
///
/// A cursor positioned at or past the end is the normal "listing finished"
/// case and yields an empty page with `has_more == false`; only malformed
/// or expired cursors are errors. When more items remain, the returned
/// `next_cursor` is freshly timestamped — the incoming cursor's timestamp
/// is never reused.
///
/// # Examples
///
/// ```
/// use assistants_mcp::pagination::{paginate, PageRequest};
///
/// let items: Vec<u32> = (0..25).collect();
/// let mut request = PageRequest { cursor: None, limit: Some(10) };
///
/// let first = paginate(&items, &request).unwrap();
/// assert_eq!(first.items, (0..10).collect::<Vec<u32>>());
/// assert_eq!(first.total, 25);
/// assert!(first.has_more);
///
/// request.cursor = first.next_cursor;
/// let second = paginate(&items, &request).unwrap();
/// assert_eq!(second.items, (10..20).collect::<Vec<u32>>());
///
/// request.cursor = second.next_cursor;
/// let last = paginate(&items, &request).unwrap();
/// assert_eq!(last.items, (20..25).collect::<Vec<u32>>());
/// assert!(!last.has_more);
/// assert!(last.next_cursor.is_none());
/// ```
pub fn paginate<T: Clone>(items: &[T], request: &PageRequest) -> Result<Page<T>, CursorError> {
    let total = items.len();
    let start = match &request.cursor {
        Some(token) => decode(token)?.index,
        None => 0,
    };
    let limit = (request.limit.unwrap_or(DEFAULT_LIMIT as u64) as usize).clamp(MIN_LIMIT, MAX_LIMIT);
    if start >= total {
        return Ok(Page {
            items: Vec::new(),
            next_cursor: None,
            total,
            has_more: false,
        });
    }
    let end = (start + limit).min(total);
    let has_more = end < total;
    let next_cursor = has_more.then(|| {
        encode(&Cursor {
            index: end,
            total,
            timestamp: now_ms(),
        })
    });
    Ok(Page {
        items: items[start..end].to_vec(),
        next_cursor,
        total,
        has_more,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_within_ttl() {
        let cursor = Cursor {
            index: 5,
            total: 40,
            timestamp: now_ms(),
        };
        assert_eq!(decode(&encode(&cursor)).unwrap(), cursor);
    }

    #[test]
    fn expiry_is_measured_from_issue_time() {
        let cursor = Cursor {
            index: 0,
            total: 1,
            timestamp: 1_000_000,
        };
        let token = encode(&cursor);
        assert!(decode_at(&token, 1_000_000 + CURSOR_TTL_MS).is_ok());
        assert_eq!(
            decode_at(&token, 1_000_000 + CURSOR_TTL_MS + 1),
            Err(CursorError::Expired)
        );
    }

    #[test]
    fn inconsistent_cursor_rejected() {
        let cursor = Cursor {
            index: 10,
            total: 5,
            timestamp: now_ms(),
        };
        assert_eq!(decode(&encode(&cursor)), Err(CursorError::Inconsistent));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let token = URL_SAFE_NO_PAD.encode(br#"{"index": 1}"#);
        assert_eq!(decode(&token), Err(CursorError::Malformed));
        let token = URL_SAFE_NO_PAD.encode(br#"[1, 2, 3]"#);
        assert_eq!(decode(&token), Err(CursorError::Malformed));
    }

    #[test]
    fn past_the_end_is_an_empty_page_not_an_error() {
        let items: Vec<u32> = (0..5).collect();
        let token = encode(&Cursor {
            index: 5,
            total: 5,
            timestamp: now_ms(),
        });
        let page = paginate(
            &items,
            &PageRequest {
                cursor: Some(token),
                limit: None,
            },
        )
        .unwrap();
        assert!(page.items.is_empty());
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn limit_is_clamped() {
        let items: Vec<u32> = (0..100).collect();
        let page = paginate(
            &items,
            &PageRequest {
                cursor: None,
                limit: Some(500),
            },
        )
        .unwrap();
        assert_eq!(page.items.len(), MAX_LIMIT);
        let page = paginate(
            &items,
            &PageRequest {
                cursor: None,
                limit: Some(0),
            },
        )
        .unwrap();
        assert_eq!(page.items.len(), MIN_LIMIT);
    }

    #[test]
    fn next_cursor_is_freshly_timestamped() {
        let items: Vec<u32> = (0..30).collect();
        let stale_but_valid = encode(&Cursor {
            index: 0,
            total: 30,
            timestamp: now_ms() - CURSOR_TTL_MS / 2,
        });
        let page = paginate(
            &items,
            &PageRequest {
                cursor: Some(stale_but_valid),
                limit: Some(10),
            },
        )
        .unwrap();
        let next = decode(&page.next_cursor.unwrap()).unwrap();
        assert!(now_ms().saturating_sub(next.timestamp) < CURSOR_TTL_MS / 4);
    }
}
