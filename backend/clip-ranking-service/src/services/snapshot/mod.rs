//! Clip store snapshot decoding
//!
//! The clip store keeps one child per clip, keyed by clip id:
//!
//! ```json
//! {
//!   "clip-a": { "time": 1500000000000, "likes": { "instance-1": true } },
//!   "clip-b": { "time": 1500000060000, "likes": { "instance-2": false } }
//! }
//! ```
//!
//! Only the first `limit` clips in the store's key order are taken, matching
//! its limit-to-first query: keys that parse as 32-bit integers come first in
//! numeric order, then every other key in lexicographic order. Individual
//! malformed records are defaulted rather than rejected so one bad clip never
//! blocks a ranking pass.

use crate::models::{ContentItem, VoteSet};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use thiserror::Error;
use tracing::{debug, warn};

/// Clip count taken from a snapshot when no limit is configured.
pub const MAX_CLIP_RESULTS: usize = 100;

const TIME_FIELD: &str = "time";
const LIKES_FIELD: &str = "likes";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot root must be an object keyed by clip id")]
    NotAnObject,
}

pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Parse a snapshot document into a batch of at most `limit` clips.
pub fn parse_snapshot(raw: &str, limit: usize) -> Result<Vec<ContentItem>> {
    let value: Value = serde_json::from_str(raw)?;
    decode_snapshot(&value, limit)
}

/// Decode an already-parsed snapshot into a batch of at most `limit` clips.
pub fn decode_snapshot(value: &Value, limit: usize) -> Result<Vec<ContentItem>> {
    let clips = value.as_object().ok_or(SnapshotError::NotAnObject)?;

    let mut ids: Vec<&String> = clips.keys().collect();
    ids.sort_by(|a, b| store_key_order(a, b));

    let items: Vec<ContentItem> = ids
        .into_iter()
        .take(limit)
        .map(|id| decode_clip(id, &clips[id.as_str()]))
        .collect();

    debug!(
        total = clips.len(),
        taken = items.len(),
        limit,
        "Decoded clip snapshot"
    );

    Ok(items)
}

/// Key order of the clip store: integer keys numerically, then string keys.
fn store_key_order(a: &str, b: &str) -> Ordering {
    match (integer_key(a), integer_key(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn integer_key(key: &str) -> Option<i32> {
    if key.starts_with('+') {
        return None;
    }
    key.parse().ok()
}

fn decode_clip(id: &str, record: &Value) -> ContentItem {
    let Some(fields) = record.as_object() else {
        warn!(clip_id = id, "Clip record is not an object; using defaults");
        return ContentItem::new(id, 0, VoteSet::new());
    };

    let submitted_at = match fields.get(TIME_FIELD).and_then(Value::as_i64) {
        Some(time) => time,
        None => {
            warn!(clip_id = id, "Clip has missing or non-integer time; using 0");
            0
        }
    };

    ContentItem::new(id, submitted_at, decode_likes(id, fields))
}

fn decode_likes(id: &str, fields: &Map<String, Value>) -> VoteSet {
    let Some(likes) = fields.get(LIKES_FIELD).and_then(Value::as_object) else {
        return VoteSet::new();
    };

    likes
        .iter()
        .filter_map(|(voter, direction)| match direction.as_bool() {
            Some(up) => Some((voter.as_str(), up)),
            None => {
                debug!(clip_id = id, voter = %voter, "Skipping non-boolean vote");
                None
            }
        })
        .collect()
}
