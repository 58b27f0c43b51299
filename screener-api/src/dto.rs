//! DTOs for API requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use screener_core::types::{ListState, MatchRecord};

/// Query parameters for `GET /check`.
#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    /// The wallet address to check
    pub address: Option<String>,
}

/// Response for `GET /check`.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    /// The address as the caller sent it (trimmed)
    pub address: String,
    /// Whether the address appears on the SDN list
    pub is_sanctioned: bool,
    /// Entity name and currency label when flagged, null when clean
    #[serde(rename = "match")]
    pub record: Option<MatchRecord>,
    /// When the list was last refreshed
    pub list_last_updated: Option<DateTime<Utc>>,
    /// Number of sanctioned addresses currently loaded
    pub total_addresses_in_list: usize,
}

/// Response for `GET /status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Lifecycle state of the list: loading, ready, or not_loaded
    pub status: ListState,
    /// Number of sanctioned addresses currently loaded
    pub total_sanctioned_addresses: usize,
    /// When the list was last refreshed
    pub last_updated: Option<DateTime<Utc>>,
    /// Message from the most recent failed refresh, if any
    pub error: Option<String>,
    /// Configured automatic refresh interval
    pub auto_refresh_every_hours: u64,
}

/// Response for `POST /refresh`.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// True when a refresh was already running and no new one was started
    pub already_in_progress: bool,
    /// Human-readable hint for the caller
    pub message: String,
}

/// Response for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" while the process is serving
    pub status: String,
    /// Crate version
    pub version: String,
    /// Seconds since the first health check
    pub uptime_seconds: u64,
    /// Number of sanctioned addresses currently loaded
    pub total_addresses: usize,
}
