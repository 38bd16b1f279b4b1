//! Stream and search data structures

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Provider-assigned identifier of one media item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Borrow the raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ContentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the provider's streaming-data format list
#[derive(Debug, Clone)]
pub struct FormatCandidate {
    /// Video height in pixels, 0 when the record has none (audio formats)
    pub height: u32,
    /// Direct media URL, absent when the provider withholds it
    pub url: Option<String>,
    /// Provider mime type including codec parameters
    pub mime_type: String,
    /// The untouched format record
    pub raw: Map<String, Value>,
}

impl FormatCandidate {
    /// Build a candidate from a raw format record; non-object records are rejected
    pub fn from_record(record: &Value) -> Option<Self> {
        let raw = record.as_object()?.clone();
        let height = raw
            .get("height")
            .and_then(Value::as_u64)
            .and_then(|h| u32::try_from(h).ok())
            .unwrap_or(0);
        let url = raw.get("url").and_then(Value::as_str).map(str::to_string);
        let mime_type = raw
            .get("mimeType")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Some(Self {
            height,
            url,
            mime_type,
            raw,
        })
    }

    /// Direct URL if present and non-empty
    pub fn direct_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}

/// A playable URL paired with its height, as ranked by the catalog builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCandidate {
    pub height: u32,
    pub url: String,
}

impl RankedCandidate {
    pub fn new(height: u32, url: impl Into<String>) -> Self {
        Self {
            height,
            url: url.into(),
        }
    }
}

/// Terminal artifact of a resolution: a probed, playable stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedStream {
    /// Content ID
    pub id: ContentId,
    /// Stream URL accepted by the reachability probe
    pub url: String,
    /// Title from the video details
    pub title: String,
    /// Height of the chosen format in pixels
    pub height: u32,
}

/// One card of a search result list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: ContentId,
    pub title: String,
    pub author: String,
}

impl SearchHit {
    /// Display line used by the search prompt
    pub fn label(&self) -> String {
        format!("{}: {}", self.author, self.title)
    }
}
