//! App state: cache store, refresh coordinator, config.

use std::sync::Arc;

use screener_cache::{AddressLookup, SanctionsStore};
use screener_core::constants::{
    DEFAULT_FETCH_TIMEOUT_SECONDS, DEFAULT_REFRESH_INTERVAL_HOURS, DEFAULT_SDN_URL,
};
use screener_core::traits::DocumentSource;
use screener_sdn::{FetchConfig, SdnFetcher};
use screener_sync::{RefreshCoordinator, RefreshLoopHandle, SyncConfig};

/// API server configuration.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// URL of the SDN XML document
    pub sdn_url: String,
    /// Download timeout in seconds
    pub fetch_timeout_seconds: u64,
    /// Hours between automatic refreshes
    pub refresh_interval_hours: u64,
    /// When set, requests must carry a matching `X-Api-Key` header
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            sdn_url: DEFAULT_SDN_URL.into(),
            fetch_timeout_seconds: DEFAULT_FETCH_TIMEOUT_SECONDS,
            refresh_interval_hours: DEFAULT_REFRESH_INTERVAL_HOURS,
            api_key: None,
        }
    }
}

impl ApiConfig {
    /// Builds the configuration from environment variables, falling back to
    /// defaults: `SDN_URL`, `FETCH_TIMEOUT_SECONDS`, `REFRESH_INTERVAL_HOURS`,
    /// `API_KEY` (leave unset to allow unauthenticated access).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        Self {
            sdn_url: std::env::var("SDN_URL").unwrap_or(defaults.sdn_url),
            fetch_timeout_seconds: std::env::var("FETCH_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_timeout_seconds),
            refresh_interval_hours: std::env::var("REFRESH_INTERVAL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.refresh_interval_hours),
            api_key: std::env::var("API_KEY").ok().filter(|k| !k.is_empty()),
        }
    }
}

/// Shared application state handed to every handler.
pub struct AppState {
    /// Server configuration
    pub config: ApiConfig,
    /// The process-wide cache store
    pub store: Arc<SanctionsStore>,
    /// Lookup service over the store
    pub lookup: AddressLookup,
    /// Refresh coordinator feeding the store
    pub coordinator: Arc<RefreshCoordinator>,
}

impl AppState {
    /// Creates the state with the production SDN fetcher.
    pub fn new(config: ApiConfig) -> Self {
        let fetcher = SdnFetcher::with_config(FetchConfig {
            url: config.sdn_url.clone(),
            timeout_seconds: config.fetch_timeout_seconds,
        });
        Self::with_source(config, Arc::new(fetcher))
    }

    /// Creates the state with a custom document source (used by tests).
    pub fn with_source(config: ApiConfig, source: Arc<dyn DocumentSource>) -> Self {
        let store = Arc::new(SanctionsStore::new());
        let coordinator = Arc::new(RefreshCoordinator::new(
            store.clone(),
            source,
            SyncConfig::with_interval_hours(config.refresh_interval_hours),
        ));

        Self {
            config,
            lookup: AddressLookup::new(store.clone()),
            store,
            coordinator,
        }
    }

    /// Starts the periodic refresh loop. Invoked once at process startup.
    pub fn start_background_refresh(&self) -> RefreshLoopHandle {
        self.coordinator.spawn_background_loop()
    }
}
