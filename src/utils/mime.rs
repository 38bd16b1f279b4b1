//! MIME type helpers for format filtering

/// Container substring that marks a preferred, MP4-compatible format
pub const PREFERRED_CONTAINER: &str = "mp4";

/// Check if a provider mime type (e.g. `video/mp4; codecs="avc1"`) is MP4-compatible
pub fn is_mp4_compatible(mime_type: &str) -> bool {
    mime_type.contains(PREFERRED_CONTAINER)
}
