//! Stream resolution: from a user-supplied URL to one reachable stream

use crate::core::stream::ResolvedStream;
use crate::error::TubeError;
use crate::platform::client::VideoClient;
use crate::platform::formats::{build_catalog, DEFAULT_MAX_HEIGHT};
use crate::platform::player_page::parse_watch_page;
use crate::platform::probe::StreamProber;
use crate::utils::url::extract_video_id;
use tracing::{debug, info};

/// Resolves video URLs into the best reachable stream below a height ceiling
#[derive(Debug, Clone)]
pub struct StreamResolver {
    client: VideoClient,
    prober: StreamProber,
    max_height: u32,
}

impl StreamResolver {
    /// Create a resolver with the default height ceiling
    pub fn new(client: VideoClient) -> Self {
        Self {
            prober: StreamProber::new(client.clone()),
            client,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }

    /// Set the exclusive height ceiling
    pub fn with_max_height(mut self, max_height: u32) -> Self {
        self.max_height = max_height;
        self
    }

    pub fn max_height(&self) -> u32 {
        self.max_height
    }

    /// Resolve `url` into a reachable stream.
    ///
    /// The input URL doubles as the referer for the watch page and for every
    /// probe, the way a browser following the link would send it.
    pub async fn resolve(&self, url: &str) -> Result<ResolvedStream, TubeError> {
        let id = extract_video_id(url)?;
        info!("Resolving video {}", id);

        let watch_url = format!("{}/watch?v={}", self.client.base_url(), id);
        let page = self.client.fetch_page(&watch_url, url).await?;
        debug!("Watch page is {} bytes", page.len());

        let page = parse_watch_page(&page)?;
        let formats = page.format_list()?;
        let catalog = build_catalog(&formats, self.max_height)?;
        if catalog.is_empty() {
            return Err(TubeError::NoFormatFound);
        }

        let chosen = self.prober.probe(&catalog, url).await?;
        info!("Selected {} px stream for '{}'", chosen.height, page.title);

        Ok(ResolvedStream {
            id,
            url: chosen.url,
            title: page.title,
            height: chosen.height,
        })
    }
}
