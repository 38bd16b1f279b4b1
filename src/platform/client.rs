//! HTTP client for provider page, search and stream requests

use crate::error::TubeError;
use crate::utils::url::SITE_ROOT;
use reqwest::{Client, ClientBuilder, Method, RequestBuilder};
use std::time::Duration;
use tracing::debug;

/// Realistic desktop browser user agent sent with every request
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/90.0.4430.72 Safari/537.36";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Connect + read timeout per request
    pub timeout: Duration,
    /// User agent override
    pub user_agent: Option<String>,
    /// Proxy URL
    pub proxy_url: Option<String>,
    /// Site root for watch and search pages
    pub base_url: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: None,
            proxy_url: None,
            base_url: SITE_ROOT.to_string(),
        }
    }
}

/// Provider HTTP client
#[derive(Debug, Clone)]
pub struct VideoClient {
    client: Client,
    config: HttpClientConfig,
}

impl VideoClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self, TubeError> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self, TubeError> {
        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .gzip(true)
            .brotli(true);

        if let Some(proxy_url) = &config.proxy_url {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        let client = builder.build()?;
        Ok(Self { client, config })
    }

    /// Get client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Site root without trailing slash
    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// User agent in effect
    pub fn user_agent(&self) -> &str {
        self.config
            .user_agent
            .as_deref()
            .unwrap_or(BROWSER_USER_AGENT)
    }

    /// Create a request carrying the browser user agent and the given referer
    pub fn create_request(&self, method: Method, url: &str, referer: &str) -> RequestBuilder {
        debug!("{} {} (referer {})", method, url, referer);
        self.client
            .request(method, url)
            .header("User-Agent", self.user_agent())
            .header("Referer", referer)
            .header("Accept-Language", "en-US,en;q=0.9")
    }

    /// Fetch a page and decode its body as text, failing on non-2xx status
    pub async fn fetch_page(&self, url: &str, referer: &str) -> Result<String, TubeError> {
        let response = self
            .create_request(Method::GET, url, referer)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }

    /// Create a lightweight existence check for a stream URL
    pub fn create_probe_request(&self, url: &str, referer: &str) -> RequestBuilder {
        self.create_request(Method::HEAD, url, referer)
    }
}
