//! URL utilities for extracting content IDs and building provider URLs

use crate::core::stream::ContentId;
use crate::error::TubeError;
use url::Url;

/// Short-link host whose path carries the ID directly
pub const SHORT_LINK_HOST: &str = "youtu.be";

/// Path prefix of embed-style URLs
pub const EMBED_PREFIX: &str = "/v/";

/// Canonical site root
pub const SITE_ROOT: &str = "https://www.youtube.com";

/// Extract the content ID from a short-link, embed or watch URL
pub fn extract_video_id(url: &str) -> Result<ContentId, TubeError> {
    let malformed = || TubeError::MalformedInput(url.to_string());
    let parsed = parse_lenient(url).ok_or_else(malformed)?;

    if parsed.host_str() == Some(SHORT_LINK_HOST) {
        let id = parsed.path().replace('/', "");
        if id.is_empty() {
            return Err(malformed());
        }
        return Ok(ContentId::from(id));
    }

    if let Some(rest) = parsed.path().strip_prefix(EMBED_PREFIX) {
        let id = rest.trim_end_matches('/');
        if id.is_empty() {
            return Err(malformed());
        }
        return Ok(ContentId::from(id));
    }

    parsed
        .query_pairs()
        .find(|(key, value)| key == "v" && !value.is_empty())
        .map(|(_, value)| ContentId::from(value.as_ref()))
        .ok_or_else(malformed)
}

/// Parse a URL, accepting input that omits the scheme
fn parse_lenient(url: &str) -> Option<Url> {
    match Url::parse(url) {
        Ok(parsed) => Some(parsed),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{}", url)).ok()
        }
        Err(_) => None,
    }
}

/// Build the canonical watch URL for an ID
pub fn watch_url(id: &ContentId) -> String {
    format!("{}/watch?v={}", SITE_ROOT, id)
}

/// Build the short-link URL for an ID
pub fn short_url(id: &ContentId) -> String {
    format!("https://{}/{}", SHORT_LINK_HOST, id)
}
