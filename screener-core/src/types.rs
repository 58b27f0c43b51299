//! Domain types for the screening service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attribution for one sanctioned address: who it belongs to and how OFAC
/// labeled the identifier. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Name of the sanctioned person or organisation
    pub entity: String,
    /// OFAC identifier label, e.g. "Digital Currency Address - XBT"
    pub currency_label: String,
}

/// One (address, entity, currency label) triple pulled out of the SDN
/// document, before normalization and deduplication.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedAddress {
    /// Raw wallet address as it appears in the document
    pub address: String,
    /// Entity name assembled from the entry's name fields
    pub entity: String,
    /// The full `idType` label
    pub currency_label: String,
}

/// Result of checking a single address against the published snapshot.
#[derive(Clone, Debug, Serialize)]
pub struct LookupResult {
    /// Whether the address appears on the list
    pub is_sanctioned: bool,
    /// Match details when sanctioned, `None` on a clean address
    pub record: Option<MatchRecord>,
}

/// Lifecycle state of the in-memory list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListState {
    /// A refresh is currently in flight
    Loading,
    /// A snapshot has been published and can serve lookups
    Ready,
    /// No successful refresh has completed yet
    NotLoaded,
}

/// Status of the cache as reported to operators.
#[derive(Clone, Debug, Serialize)]
pub struct StatusReport {
    /// Current lifecycle state
    pub state: ListState,
    /// Number of addresses in the published snapshot
    pub total_addresses: usize,
    /// When the snapshot was last successfully replaced
    pub last_updated: Option<DateTime<Utc>>,
    /// Message from the most recent failed refresh, if any
    pub error: Option<String>,
    /// Configured interval between automatic refreshes
    pub refresh_interval_hours: u64,
}

/// Normalizes a wallet address into its canonical lookup key.
///
/// Both the snapshot builder and the lookup path use this, so an address
/// always resolves to the same key regardless of caller casing or padding.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}
