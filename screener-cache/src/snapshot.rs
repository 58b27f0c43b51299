//! Immutable lookup snapshot built from extracted SDN triples.

use std::collections::HashMap;

use screener_core::types::{normalize_address, ExtractedAddress, MatchRecord};

/// Point-in-time lookup table: normalized address → match record.
///
/// Built once per refresh and never mutated afterwards; the store replaces
/// the whole snapshot on publish, so readers holding one keep a consistent
/// view for as long as they like.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    entries: HashMap<String, MatchRecord>,
}

impl Snapshot {
    /// Builds a snapshot from extracted triples.
    ///
    /// Addresses are normalized (trim + lowercase) before keying. When the
    /// same normalized address appears more than once, the later triple in
    /// encounter order wins; duplicates are not an error.
    pub fn from_records(records: impl IntoIterator<Item = ExtractedAddress>) -> Self {
        let mut entries = HashMap::new();
        for record in records {
            entries.insert(
                normalize_address(&record.address),
                MatchRecord {
                    entity: record.entity,
                    currency_label: record.currency_label,
                },
            );
        }
        Self { entries }
    }

    /// Looks up a record by its normalized key.
    ///
    /// Callers are expected to pass an already-normalized address; see
    /// [`AddressLookup`](crate::AddressLookup) for the user-facing path.
    pub fn get(&self, normalized_address: &str) -> Option<&MatchRecord> {
        self.entries.get(normalized_address)
    }

    /// Number of addresses in the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no successful refresh has populated this snapshot.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
