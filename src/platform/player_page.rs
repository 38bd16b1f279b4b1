//! Player record embedded in a watch page

use crate::core::stream::FormatCandidate;
use crate::error::TubeError;
use crate::utils::token::extract_player_response;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Title used when the provider omits one
pub const UNKNOWN_TITLE: &str = "Unknown title";

/// Reason used when a rejection carries none
pub const UNKNOWN_REASON: &str = "Unknown reason";

#[derive(Debug, Deserialize)]
pub struct PlayerResponse {
    #[serde(rename = "playabilityStatus")]
    pub playability_status: Option<PlayabilityStatus>,
    #[serde(rename = "videoDetails", default, deserialize_with = "non_empty")]
    pub video_details: Option<VideoDetails>,
    #[serde(rename = "streamingData", default, deserialize_with = "non_empty")]
    pub streaming_data: Option<StreamingData>,
}

/// Treat an empty (or null) mapping the same as an absent one
fn non_empty<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Map<String, Value>>::deserialize(deserializer)? {
        Some(map) if !map.is_empty() => serde_json::from_value(Value::Object(map))
            .map(Some)
            .map_err(D::Error::custom),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
pub struct PlayabilityStatus {
    pub status: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VideoDetails {
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StreamingData {
    #[serde(default)]
    pub formats: Vec<Value>,
    #[serde(rename = "adaptiveFormats", default)]
    pub adaptive_formats: Vec<Value>,
}

/// A player record that passed validation
#[derive(Debug)]
pub struct PlayablePage {
    pub title: String,
    pub streaming_data: StreamingData,
}

impl PlayablePage {
    /// Muxed formats when there are any, adaptive ones otherwise
    pub fn format_list(&self) -> Result<Vec<FormatCandidate>, TubeError> {
        let records = if !self.streaming_data.formats.is_empty() {
            &self.streaming_data.formats
        } else if !self.streaming_data.adaptive_formats.is_empty() {
            debug!("No muxed formats, falling back to adaptive formats");
            &self.streaming_data.adaptive_formats
        } else {
            return Err(TubeError::NoFormatFound);
        };

        Ok(records.iter().filter_map(FormatCandidate::from_record).collect())
    }
}

/// Extract, parse and validate the player record of a watch page
pub fn parse_watch_page(page: &str) -> Result<PlayablePage, TubeError> {
    let raw = extract_player_response(page)?;
    let response: PlayerResponse = serde_json::from_str(raw)?;
    validate(response)
}

fn validate(response: PlayerResponse) -> Result<PlayablePage, TubeError> {
    let Some(streaming_data) = response.streaming_data else {
        let status = response.playability_status.unwrap_or(PlayabilityStatus {
            status: None,
            reason: None,
        });
        return match status.status {
            Some(status_code) => {
                let reason = status.reason.unwrap_or_else(|| UNKNOWN_REASON.to_string());
                warn!("Video playability error: {}", reason);
                Err(TubeError::ProviderRejected {
                    status: status_code,
                    reason,
                })
            }
            None => Err(TubeError::ExtractionFailed(
                "player record has no streaming data".to_string(),
            )),
        };
    };

    let details = response.video_details.ok_or_else(|| {
        TubeError::ExtractionFailed("player record has no video details".to_string())
    })?;

    Ok(PlayablePage {
        title: details.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        streaming_data,
    })
}
