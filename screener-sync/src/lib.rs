//! # Screener Sync
//!
//! Refresh coordination: the single-flight pipeline that downloads the SDN
//! list, extracts crypto addresses, builds a snapshot, and publishes it to
//! the cache store.
//!
//! Two triggers feed the pipeline: a periodic background loop (default every
//! 24 hours, restarted after each attempt completes) and an on-demand
//! [`trigger`](RefreshCoordinator::trigger). Both funnel through the store's
//! single-flight gate, so at most one refresh runs at a time and a failed
//! attempt never crashes the loop or disturbs the published snapshot.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use screener_cache::SanctionsStore;
//! use screener_sdn::SdnFetcher;
//! use screener_sync::{RefreshCoordinator, SyncConfig};
//!
//! let store = Arc::new(SanctionsStore::new());
//! let coordinator = Arc::new(RefreshCoordinator::new(
//!     store,
//!     Arc::new(SdnFetcher::new()),
//!     SyncConfig::default(),
//! ));
//! let loop_handle = coordinator.spawn_background_loop();
//! // ... serve lookups; later:
//! loop_handle.stop().await;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod coordinator;

pub use coordinator::{
    RefreshCoordinator, RefreshLoopHandle, RefreshOutcome, SyncConfig, TriggerOutcome,
};
