//! Opaque continuation cursors
//!
//! A cursor carries the ordering key of the last item a caller has seen. The
//! token is the URL-safe base64 form of the key's JSON encoding, so any
//! scalar key survives the trip unchanged.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QueryError, Result};
use crate::models::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_next_page: bool,
}

pub fn encode_cursor(key: &Value) -> String {
    URL_SAFE_NO_PAD.encode(key.to_json().to_string())
}

pub fn decode_cursor(token: &str) -> Result<Value> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|e| QueryError::InvalidCursor(e.to_string()))?;

    let json: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| QueryError::InvalidCursor(e.to_string()))?;

    Ok(Value::from_json(&json))
}

/// Returns up to `limit` items following the item whose key matches `after`.
///
/// Keys are matched on their stringified form. When no item carries the
/// decoded key the page starts from the beginning.
pub fn paginate_by_cursor<T, F>(
    items: Vec<T>,
    key_of: F,
    after: Option<&str>,
    limit: usize,
) -> Result<CursorPage<T>>
where
    F: Fn(&T) -> Option<Value>,
{
    let limit = limit.max(1);
    let total = items.len();

    let start = match after {
        Some(token) => {
            let key = decode_cursor(token)?.to_string();
            match items
                .iter()
                .position(|item| key_of(item).map(|v| v.to_string()).as_deref() == Some(key.as_str()))
            {
                Some(position) => position + 1,
                None => {
                    debug!("Cursor key {} not found, starting from the beginning", key);
                    0
                }
            }
        }
        None => 0,
    };

    let has_next_page = start.saturating_add(limit) < total;
    let items: Vec<T> = items.into_iter().skip(start).take(limit).collect();

    let next_cursor = if has_next_page {
        items
            .last()
            .map(|last| encode_cursor(&key_of(last).unwrap_or(Value::Null)))
    } else {
        None
    };

    Ok(CursorPage {
        items,
        next_cursor,
        has_next_page,
    })
}
