//! The refresh coordinator and its background loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use screener_cache::{SanctionsStore, Snapshot};
use screener_core::constants::DEFAULT_REFRESH_INTERVAL_HOURS;
use screener_core::error::Result;
use screener_core::traits::DocumentSource;
use screener_core::types::StatusReport;
use screener_sdn::extract_addresses;

/// Coordinator configuration.
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Time between automatic refreshes, counted from attempt completion
    pub refresh_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_HOURS * 3600),
        }
    }
}

impl SyncConfig {
    /// Creates a config with the interval given in hours.
    pub fn with_interval_hours(hours: u64) -> Self {
        Self {
            refresh_interval: Duration::from_secs(hours * 3600),
        }
    }

    /// The refresh interval expressed in whole hours (rounded down).
    pub fn refresh_interval_hours(&self) -> u64 {
        self.refresh_interval.as_secs() / 3600
    }
}

/// Outcome of one gated refresh attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The attempt ran and published a new snapshot
    Completed,
    /// The attempt ran and failed; the failure was recorded as `last_error`
    Failed,
    /// Another refresh held the gate; nothing was done
    Declined,
}

/// Response to an on-demand refresh request.
#[derive(Clone, Copy, Debug)]
pub struct TriggerOutcome {
    /// True when a refresh was already running and no new one was started
    pub already_in_progress: bool,
}

/// Runs refresh attempts against the store, one at a time.
pub struct RefreshCoordinator {
    store: Arc<SanctionsStore>,
    source: Arc<dyn DocumentSource>,
    config: SyncConfig,
}

impl RefreshCoordinator {
    /// Creates a coordinator over the given store and document source.
    pub fn new(
        store: Arc<SanctionsStore>,
        source: Arc<dyn DocumentSource>,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            source,
            config,
        }
    }

    /// The store this coordinator publishes into.
    pub fn store(&self) -> &Arc<SanctionsStore> {
        &self.store
    }

    /// Reports the cache status together with the configured interval.
    pub fn status(&self) -> StatusReport {
        let view = self.store.read();
        StatusReport {
            state: view.state(),
            total_addresses: view.snapshot.len(),
            last_updated: view.last_updated,
            error: view.last_error,
            refresh_interval_hours: self.config.refresh_interval_hours(),
        }
    }

    /// Runs one gated refresh attempt to completion.
    ///
    /// Declined attempts (gate already held) are a silent no-op. Fetch,
    /// extract, and build all run outside any lock; a failure at any stage
    /// is recorded via `commit_failure` and never propagates further.
    #[instrument(skip(self))]
    pub async fn refresh_once(&self) -> RefreshOutcome {
        if !self.store.begin_refresh() {
            debug!("Refresh already in progress, skipping duplicate attempt");
            return RefreshOutcome::Declined;
        }

        match self.run_attempt().await {
            Ok(snapshot) => {
                let total = snapshot.len();
                self.store.commit_success(snapshot, Utc::now());
                info!(addresses = total, "Sanctions list refreshed");
                RefreshOutcome::Completed
            }
            Err(e) => {
                let message = e.to_string();
                error!(error = %message, "Refresh failed, keeping previous snapshot");
                self.store.commit_failure(message);
                RefreshOutcome::Failed
            }
        }
    }

    /// Fetch, extract, build. Stage identification comes from the error
    /// variants themselves ("download failed: ..." / "XML parse error: ...").
    async fn run_attempt(&self) -> Result<Snapshot> {
        let document = self.source.fetch().await?;
        info!(bytes = document.len(), "Downloaded SDN document, parsing");

        let triples = extract_addresses(&document)?;
        Ok(Snapshot::from_records(triples))
    }

    /// On-demand refresh: starts a gated attempt in the background and
    /// returns immediately, regardless of how the attempt turns out.
    ///
    /// The returned flag is a best-effort read; the hard single-flight
    /// guarantee lives in the store's gate.
    pub fn trigger(self: &Arc<Self>) -> TriggerOutcome {
        if self.store.read().refresh_in_progress {
            return TriggerOutcome {
                already_in_progress: true,
            };
        }

        let coordinator = self.clone();
        tokio::spawn(async move {
            coordinator.refresh_once().await;
        });

        TriggerOutcome {
            already_in_progress: false,
        }
    }

    /// Spawns the periodic refresh loop.
    ///
    /// The loop runs an attempt, then sleeps the configured interval before
    /// the next one, so the timer restarts only after an attempt fully
    /// completes. The returned handle cancels the inter-cycle sleep and
    /// stops the loop cleanly.
    pub fn spawn_background_loop(self: &Arc<Self>) -> RefreshLoopHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let coordinator = self.clone();

        let task = tokio::spawn(async move {
            info!(
                interval_hours = coordinator.config.refresh_interval_hours(),
                "Background refresh loop started"
            );
            loop {
                coordinator.refresh_once().await;

                tokio::select! {
                    _ = tokio::time::sleep(coordinator.config.refresh_interval) => {}
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("Background refresh loop stopped");
        });

        RefreshLoopHandle {
            stop: stop_tx,
            task,
        }
    }
}

/// Handle to a running background refresh loop.
pub struct RefreshLoopHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshLoopHandle {
    /// Signals the loop to stop and waits for it to finish.
    ///
    /// An attempt already in flight runs to completion; only the inter-cycle
    /// sleep is interrupted.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use bytes::Bytes;
    use tokio::sync::Notify;
    use tokio::time::timeout;

    use screener_cache::AddressLookup;
    use screener_core::error::ScreenerError;
    use screener_core::types::ListState;

    const SAMPLE_DOC: &[u8] = br#"<sdnList>
        <sdnEntry>
          <firstName>Ivan</firstName>
          <lastName>Petrov</lastName>
          <idList>
            <id>
              <idType>Digital Currency Address - XBT</idType>
              <idNumber>1A2b3C4d</idNumber>
            </id>
          </idList>
        </sdnEntry>
      </sdnList>"#;

    /// Serves a fixed document and counts fetches.
    struct StaticSource {
        body: Vec<u8>,
        fetches: AtomicUsize,
    }

    impl StaticSource {
        fn new(body: &[u8]) -> Arc<Self> {
            Arc::new(Self {
                body: body.to_vec(),
                fetches: AtomicUsize::new(0),
            })
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentSource for StaticSource {
        async fn fetch(&self) -> screener_core::Result<Bytes> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(Bytes::from(self.body.clone()))
        }
    }

    /// Always fails with a network error.
    struct FailingSource;

    #[async_trait]
    impl DocumentSource for FailingSource {
        async fn fetch(&self) -> screener_core::Result<Bytes> {
            Err(ScreenerError::Network("connection refused".into()))
        }
    }

    /// Signals when a fetch starts, then parks until released.
    struct GatedSource {
        started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl DocumentSource for GatedSource {
        async fn fetch(&self) -> screener_core::Result<Bytes> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(Bytes::from_static(SAMPLE_DOC))
        }
    }

    fn coordinator_with(source: Arc<dyn DocumentSource>) -> Arc<RefreshCoordinator> {
        Arc::new(RefreshCoordinator::new(
            Arc::new(SanctionsStore::new()),
            source,
            SyncConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_successful_refresh_publishes_snapshot() {
        let coordinator = coordinator_with(StaticSource::new(SAMPLE_DOC));

        let outcome = coordinator.refresh_once().await;
        assert_eq!(outcome, RefreshOutcome::Completed);

        let lookup = AddressLookup::new(coordinator.store().clone());
        let result = lookup.check("1a2b3c4d").unwrap();
        assert!(result.is_sanctioned);
        assert_eq!(result.record.unwrap().entity, "Ivan Petrov");

        let status = coordinator.status();
        assert_eq!(status.state, ListState::Ready);
        assert_eq!(status.total_addresses, 1);
        assert!(status.last_updated.is_some());
        assert!(status.error.is_none());
    }

    #[tokio::test]
    async fn test_network_failure_is_recorded_not_propagated() {
        let coordinator = coordinator_with(Arc::new(FailingSource));

        let outcome = coordinator.refresh_once().await;
        assert_eq!(outcome, RefreshOutcome::Failed);

        let status = coordinator.status();
        assert_eq!(status.state, ListState::NotLoaded);
        let error = status.error.unwrap();
        assert!(error.contains("download failed"));
        assert!(status.last_updated.is_none());
    }

    #[tokio::test]
    async fn test_parse_failure_keeps_previous_snapshot() {
        let store = Arc::new(SanctionsStore::new());

        // First publish a good snapshot
        let good = Arc::new(RefreshCoordinator::new(
            store.clone(),
            StaticSource::new(SAMPLE_DOC),
            SyncConfig::default(),
        ));
        assert_eq!(good.refresh_once().await, RefreshOutcome::Completed);
        let updated = store.read().last_updated;

        // Then fail with a malformed document
        let bad = Arc::new(RefreshCoordinator::new(
            store.clone(),
            StaticSource::new(b"this is not xml"),
            SyncConfig::default(),
        ));
        assert_eq!(bad.refresh_once().await, RefreshOutcome::Failed);

        let view = store.read();
        assert_eq!(view.last_updated, updated);
        assert!(view.snapshot.get("1a2b3c4d").is_some());
        assert!(view.last_error.unwrap().contains("XML parse error"));
    }

    #[tokio::test]
    async fn test_concurrent_refresh_is_declined() {
        let source = Arc::new(GatedSource {
            started: Notify::new(),
            release: Notify::new(),
        });
        let coordinator = coordinator_with(source.clone());

        let first = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.refresh_once().await })
        };

        // Wait until the first attempt is inside its fetch
        timeout(Duration::from_secs(5), source.started.notified())
            .await
            .unwrap();

        assert_eq!(coordinator.refresh_once().await, RefreshOutcome::Declined);

        source.release.notify_one();
        assert_eq!(first.await.unwrap(), RefreshOutcome::Completed);
    }

    #[tokio::test]
    async fn test_lookup_not_blocked_by_refresh_in_flight() {
        let source = Arc::new(GatedSource {
            started: Notify::new(),
            release: Notify::new(),
        });
        let coordinator = coordinator_with(source.clone());

        // Seed the store so lookups have a snapshot to serve
        let seed = Arc::new(RefreshCoordinator::new(
            coordinator.store().clone(),
            StaticSource::new(SAMPLE_DOC),
            SyncConfig::default(),
        ));
        seed.refresh_once().await;

        let running = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.refresh_once().await })
        };
        timeout(Duration::from_secs(5), source.started.notified())
            .await
            .unwrap();

        // Refresh holds the gate but not the read path
        let lookup = AddressLookup::new(coordinator.store().clone());
        assert!(lookup.check("1A2B3C4D").unwrap().is_sanctioned);
        assert_eq!(coordinator.status().state, ListState::Loading);

        source.release.notify_one();
        running.await.unwrap();
    }

    #[tokio::test]
    async fn test_trigger_returns_immediately_and_publishes() {
        let coordinator = coordinator_with(StaticSource::new(SAMPLE_DOC));

        let outcome = coordinator.trigger();
        assert!(!outcome.already_in_progress);

        // Wait for the spawned attempt to publish
        timeout(Duration::from_secs(5), async {
            loop {
                if coordinator.status().state == ListState::Ready {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_trigger_reports_already_in_progress() {
        let source = Arc::new(GatedSource {
            started: Notify::new(),
            release: Notify::new(),
        });
        let coordinator = coordinator_with(source.clone());

        let running = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.refresh_once().await })
        };
        timeout(Duration::from_secs(5), source.started.notified())
            .await
            .unwrap();

        assert!(coordinator.trigger().already_in_progress);

        source.release.notify_one();
        running.await.unwrap();
    }

    #[tokio::test]
    async fn test_background_loop_refreshes_on_interval() {
        let source = StaticSource::new(SAMPLE_DOC);
        let coordinator = Arc::new(RefreshCoordinator::new(
            Arc::new(SanctionsStore::new()),
            source.clone(),
            SyncConfig {
                refresh_interval: Duration::from_millis(20),
            },
        ));

        let handle = coordinator.spawn_background_loop();

        timeout(Duration::from_secs(5), async {
            while source.fetch_count() < 3 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        handle.stop().await;
        let count_at_stop = source.fetch_count();

        // No further attempts after stop
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(source.fetch_count(), count_at_stop);
    }

    #[tokio::test]
    async fn test_stop_interrupts_long_intercycle_sleep() {
        let source = StaticSource::new(SAMPLE_DOC);
        let coordinator = Arc::new(RefreshCoordinator::new(
            Arc::new(SanctionsStore::new()),
            source.clone(),
            SyncConfig::default(), // 24 hour interval
        ));

        let handle = coordinator.spawn_background_loop();

        timeout(Duration::from_secs(5), async {
            while source.fetch_count() < 1 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        // stop() must not wait out the 24 hour sleep
        timeout(Duration::from_secs(5), handle.stop()).await.unwrap();
    }

    #[test]
    fn test_config_interval_hours() {
        assert_eq!(SyncConfig::default().refresh_interval_hours(), 24);
        assert_eq!(SyncConfig::with_interval_hours(6).refresh_interval_hours(), 6);
    }
}
