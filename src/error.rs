//! Error types for tube

use thiserror::Error;

/// Main error type for tube operations
#[derive(Debug, Error)]
pub enum TubeError {
    #[error("Malformed URL '{0}'")]
    MalformedInput(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("URL extraction using alternate decoding failed: {0}")]
    DecodeFailed(String),

    #[error("{status}: {reason}")]
    ProviderRejected { status: String, reason: String },

    #[error("No reachable stream: {0}")]
    NoReachableStream(String),

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("No search result list found in response")]
    NotFound,

    #[error("Unable to find suitable stream URL (no suitable format)")]
    NoFormatFound,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("History error: {0}")]
    History(String),

    #[error("Player binary '{0}' not found")]
    PlayerNotFound(String),

    #[error("Player exited with status {0}")]
    PlayerFailed(i32),
}

impl TubeError {
    /// Check if a failed search attempt may be repeated
    pub fn is_retryable(&self) -> bool {
        matches!(self, TubeError::ExtractionFailed(_) | TubeError::Json(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_rejected_message() {
        let err = TubeError::ProviderRejected {
            status: "UNPLAYABLE".to_string(),
            reason: "Video unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "UNPLAYABLE: Video unavailable");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(TubeError::ExtractionFailed("x".to_string()).is_retryable());
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(TubeError::Json(json_err).is_retryable());
        assert!(!TubeError::NotFound.is_retryable());
        assert!(!TubeError::MalformedInput("x".to_string()).is_retryable());
    }
}
