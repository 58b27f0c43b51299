//! Point lookups against the published snapshot.

use std::sync::Arc;

use screener_core::error::{Result, ScreenerError};
use screener_core::types::{normalize_address, LookupResult};

use crate::store::SanctionsStore;

/// Answers "is this address sanctioned" against the current snapshot.
///
/// Lookups read whatever snapshot is published right now and are completely
/// independent of refresh activity; a long-running download never delays a
/// check.
#[derive(Clone)]
pub struct AddressLookup {
    store: Arc<SanctionsStore>,
}

impl AddressLookup {
    /// Creates a lookup service over the given store.
    pub fn new(store: Arc<SanctionsStore>) -> Self {
        Self { store }
    }

    /// Checks one address against the published snapshot.
    ///
    /// The input is normalized exactly like the snapshot builder normalized
    /// its keys, so casing and padding never affect the verdict. Fails with
    /// [`ScreenerError::NotReady`] while the snapshot is still empty, which
    /// is distinct from a clean `is_sanctioned: false` miss.
    pub fn check(&self, address: &str) -> Result<LookupResult> {
        let view = self.store.read();
        if view.snapshot.is_empty() {
            return Err(ScreenerError::NotReady);
        }

        let record = view.snapshot.get(&normalize_address(address)).cloned();
        Ok(LookupResult {
            is_sanctioned: record.is_some(),
            record,
        })
    }
}
