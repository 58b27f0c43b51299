//! HTTP fetcher for the SDN document.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use screener_core::constants::{DEFAULT_FETCH_TIMEOUT_SECONDS, DEFAULT_SDN_URL};
use screener_core::error::{Result, ScreenerError};
use screener_core::traits::DocumentSource;

/// Fetcher configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// URL of the SDN XML document
    pub url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SDN_URL.into(),
            timeout_seconds: DEFAULT_FETCH_TIMEOUT_SECONDS,
        }
    }
}

impl FetchConfig {
    /// Creates a config pointing at a custom URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

/// Downloads the SDN document over HTTPS.
///
/// One GET per call, bounded by the configured timeout. No retries happen
/// here: the refresh schedule is the retry policy.
pub struct SdnFetcher {
    config: FetchConfig,
    http_client: reqwest::Client,
}

impl SdnFetcher {
    /// Creates a fetcher with the default OFAC URL and timeout.
    pub fn new() -> Self {
        Self::with_config(FetchConfig::default())
    }

    /// Creates a fetcher with custom configuration.
    pub fn with_config(config: FetchConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// The URL this fetcher downloads from.
    pub fn url(&self) -> &str {
        &self.config.url
    }
}

impl Default for SdnFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentSource for SdnFetcher {
    #[instrument(skip(self), fields(url = %self.config.url))]
    async fn fetch(&self) -> Result<Bytes> {
        let response = self
            .http_client
            .get(&self.config.url)
            .send()
            .await
            .map_err(|e| ScreenerError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ScreenerError::Network(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ScreenerError::Network(e.to_string()))?;

        debug!(bytes = bytes.len(), "Downloaded SDN document");
        Ok(bytes)
    }
}
