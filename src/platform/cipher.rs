//! Fallback decoding of obfuscated stream URLs
//!
//! Some formats withhold the direct `url` field and carry a `cipher` or
//! `signatureCipher` descriptor instead. The descriptor is a query string whose
//! `url` parameter holds the stream location.

use crate::error::TubeError;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

/// Record fields that may carry an obfuscated URL, in lookup order
pub const CIPHER_FIELDS: [&str; 2] = ["cipher", "signatureCipher"];

/// Base the descriptor query string is attached to before parsing
const DESCRIPTOR_BASE: &str = "https://www.youtube.com/watch";

/// Recover a playable URL from a format record's cipher descriptor
pub fn decode_alternate(record: &Map<String, Value>) -> Result<String, TubeError> {
    let (field, value) = CIPHER_FIELDS
        .iter()
        .find_map(|field| record.get(*field).map(|value| (*field, value)))
        .ok_or_else(|| TubeError::DecodeFailed("no cipher field in format record".to_string()))?;

    let descriptor = value
        .as_str()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| TubeError::DecodeFailed(format!("'{}' is empty or not a string", field)))?;

    debug!("Decoding stream URL from '{}' descriptor", field);

    let mut parsed = Url::parse(DESCRIPTOR_BASE)
        .map_err(|e| TubeError::DecodeFailed(e.to_string()))?;
    parsed.set_query(Some(descriptor));

    parsed
        .query_pairs()
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| TubeError::DecodeFailed(format!("no 'url' parameter in '{}'", field)))
}
