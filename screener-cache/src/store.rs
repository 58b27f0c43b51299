//! Atomic store for the published snapshot and refresh metadata.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use screener_core::types::ListState;

use crate::snapshot::Snapshot;

/// Everything the store guards: the published snapshot plus refresh metadata.
struct CacheState {
    snapshot: Arc<Snapshot>,
    last_updated: Option<DateTime<Utc>>,
    refresh_in_progress: bool,
    last_error: Option<String>,
}

/// Consistent read of the cache at one point in time.
///
/// The snapshot is shared by `Arc`, so holding a view is cheap and never
/// delays a concurrent publish.
#[derive(Clone)]
pub struct CacheView {
    /// The currently published snapshot (empty until the first success)
    pub snapshot: Arc<Snapshot>,
    /// When the snapshot was last replaced
    pub last_updated: Option<DateTime<Utc>>,
    /// Whether a refresh is currently in flight
    pub refresh_in_progress: bool,
    /// Message from the most recent failed refresh attempt
    pub last_error: Option<String>,
}

impl CacheView {
    /// Lifecycle state as reported to operators.
    pub fn state(&self) -> ListState {
        if self.refresh_in_progress {
            ListState::Loading
        } else if !self.snapshot.is_empty() {
            ListState::Ready
        } else {
            ListState::NotLoaded
        }
    }
}

/// Process-wide store for the sanctions snapshot.
///
/// Exactly one of these exists, created at startup with an empty snapshot.
/// All mutation goes through [`begin_refresh`](Self::begin_refresh) /
/// [`commit_success`](Self::commit_success) /
/// [`commit_failure`](Self::commit_failure), each of which holds the write
/// lock for the whole transition, so readers never observe a torn state.
pub struct SanctionsStore {
    state: RwLock<CacheState>,
}

impl SanctionsStore {
    /// Creates a store with an empty snapshot and no refresh in progress.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CacheState {
                snapshot: Arc::new(Snapshot::default()),
                last_updated: None,
                refresh_in_progress: false,
                last_error: None,
            }),
        }
    }

    /// Returns a consistent view of the current state. Never blocks on a
    /// refresh in flight: fetch/parse/build all happen outside this lock.
    pub fn read(&self) -> CacheView {
        let state = self.state.read();
        CacheView {
            snapshot: state.snapshot.clone(),
            last_updated: state.last_updated,
            refresh_in_progress: state.refresh_in_progress,
            last_error: state.last_error.clone(),
        }
    }

    /// The single-flight gate: atomically claims the refresh slot.
    ///
    /// Returns true and clears `last_error` if no refresh was in progress;
    /// returns false if another refresh already holds the slot, in which case
    /// the caller must not proceed.
    pub fn begin_refresh(&self) -> bool {
        let mut state = self.state.write();
        if state.refresh_in_progress {
            return false;
        }
        state.refresh_in_progress = true;
        state.last_error = None;
        true
    }

    /// Publishes a new snapshot and releases the refresh slot.
    pub fn commit_success(&self, snapshot: Snapshot, timestamp: DateTime<Utc>) {
        let mut state = self.state.write();
        debug!(addresses = snapshot.len(), "Publishing snapshot");
        state.snapshot = Arc::new(snapshot);
        state.last_updated = Some(timestamp);
        state.last_error = None;
        state.refresh_in_progress = false;
    }

    /// Records a failed attempt and releases the refresh slot.
    ///
    /// The previously published snapshot and `last_updated` are left
    /// untouched: stale data keeps serving lookups until a refresh succeeds.
    pub fn commit_failure(&self, error_message: impl Into<String>) {
        let mut state = self.state.write();
        state.last_error = Some(error_message.into());
        state.refresh_in_progress = false;
    }
}

impl Default for SanctionsStore {
    fn default() -> Self {
        Self::new()
    }
}
