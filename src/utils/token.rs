//! Delimiter-bounded extraction of data blobs embedded in page markup

use crate::error::TubeError;

/// Start token of the player record in a watch page
pub const PLAYER_START: &str = "var ytInitialPlayerResponse = ";
/// Preferred end token of the player record
pub const PLAYER_END: &str = ";var meta =";
/// End token used when the preferred one is absent
pub const PLAYER_END_FALLBACK: &str = ";var head =";

/// Start token of the search record in a results page
pub const SEARCH_START: &str = "var ytInitialData = ";
/// End token of the search record
pub const SEARCH_END: &str = ";</script>";

/// Slice `payload` between the first `start` and the first `end` after it.
///
/// The end token may also occur before the start token, so the search for it
/// only begins once everything up to and including `start` has been dropped.
pub fn token_slice<'a>(payload: &'a str, start: &str, end: &str) -> Result<&'a str, TubeError> {
    let from = payload
        .find(start)
        .map(|pos| pos + start.len())
        .ok_or_else(|| TubeError::ExtractionFailed(format!("start token '{}' not found", start)))?;

    let rest = &payload[from..];
    let to = rest.find(end).ok_or_else(|| {
        TubeError::ExtractionFailed(format!("end token '{}' not found after start token", end))
    })?;

    Ok(&rest[..to])
}

/// Extract the player record from a watch page
pub fn extract_player_response(page: &str) -> Result<&str, TubeError> {
    let end = if page.contains(PLAYER_END) {
        PLAYER_END
    } else {
        PLAYER_END_FALLBACK
    };
    token_slice(page, PLAYER_START, end)
}

/// Extract the search record from a results page
pub fn extract_search_data(page: &str) -> Result<&str, TubeError> {
    token_slice(page, SEARCH_START, SEARCH_END)
}
