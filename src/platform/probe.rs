//! Reachability probing of ranked stream candidates

use crate::core::stream::RankedCandidate;
use crate::error::TubeError;
use crate::platform::client::VideoClient;
use tracing::{info, warn};

/// Checks ranked stream URLs over the network before handing one to a player
#[derive(Debug, Clone)]
pub struct StreamProber {
    client: VideoClient,
}

impl StreamProber {
    /// Create a prober sharing the given HTTP client
    pub fn new(client: VideoClient) -> Self {
        Self { client }
    }

    /// Return the first candidate whose URL answers a HEAD request successfully.
    ///
    /// Candidates are tried in the given order with the same referer and user
    /// agent a player would send. Later candidates are not contacted once one
    /// succeeds.
    pub async fn probe(
        &self,
        candidates: &[RankedCandidate],
        referer: &str,
    ) -> Result<RankedCandidate, TubeError> {
        if candidates.is_empty() {
            return Err(TubeError::NoFormatFound);
        }

        let mut last_error = String::new();
        for candidate in candidates {
            info!("Trying HTTP access for resolution {} px...", candidate.height);
            match self.check(&candidate.url, referer).await {
                Ok(()) => return Ok(candidate.clone()),
                Err(error) => {
                    warn!("...failed to connect: {}", error);
                    last_error = error;
                }
            }
        }

        Err(TubeError::NoReachableStream(last_error))
    }

    async fn check(&self, url: &str, referer: &str) -> Result<(), String> {
        let response = self
            .client
            .create_probe_request(url, referer)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(format!(
                "HTTP {}: Cannot access video URL ({})",
                status.as_u16(),
                url
            ))
        }
    }
}
