use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Result};
use ct_core::clipboard::{ClipboardEntry, ClipboardSnapshot};
use ct_core::ids::EntryId;
use ct_core::ports::{BlobStorePort, EntryMetadataStorePort, HistoryObserverPort};
use ct_core::settings::{
    CaptureFilters, HistorySettings, RetryConfig, SettingsError, MAX_ITEMS_UPPER_BOUND,
};
use ct_platform::ipc::PlatformEvent;
use ct_platform::runtime::clipboard::{
    ClipboardChangeMonitor, MonitorConfig, MonitorState, ObservedFingerprint, StopOutcome,
};
use ct_platform::runtime::event_bus::{platform_event_channel, PlatformEventReceiver};
use futures::FutureExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::deps::HistoryDeps;
use crate::usecases::{
    evict_beyond_limit, sweep_orphan_blobs, CaptureClipboardUseCase, CaptureError,
    CaptureOutcome, CaptureState, ClearHistory, DeleteHistoryEntry, EvictionReport, ListHistory,
    SharedCaptureState, SweepReport,
};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Background clipboard history service.
///
/// Wires the change monitor to the capture use case through a bounded event
/// channel: the monitor's worker produces `ClipboardChanged` events, a single
/// consumer task feeds them to [`CaptureClipboardUseCase`] in order. Manual
/// captures, deletions and settings changes take the same capture lock as the
/// consumer, so they serialize with it.
pub struct ClipboardHistoryService {
    state: SharedCaptureState,
    monitor: ClipboardChangeMonitor,
    capture: Arc<CaptureClipboardUseCase>,
    list: ListHistory,
    delete: DeleteHistoryEntry,
    clear: ClearHistory,
    metadata_store: Arc<dyn EntryMetadataStorePort>,
    blob_store: Arc<dyn BlobStorePort>,
    observer: Arc<dyn HistoryObserverPort>,
    settings: HistorySettings,
    consumer: Mutex<Option<JoinHandle<()>>>,
}

impl ClipboardHistoryService {
    pub fn new(deps: HistoryDeps, settings: HistorySettings) -> Result<Self, SettingsError> {
        settings.validate()?;

        let HistoryDeps {
            probe,
            metadata_store,
            blob_store,
            observer,
            clock,
        } = deps;

        let state: SharedCaptureState = Arc::new(Mutex::new(CaptureState::from_settings(&settings)));
        let capture = Arc::new(CaptureClipboardUseCase::new(
            state.clone(),
            metadata_store.clone(),
            blob_store.clone(),
            observer.clone(),
            clock,
        ));

        Ok(Self {
            list: ListHistory::new(metadata_store.clone()),
            delete: DeleteHistoryEntry::new(
                state.clone(),
                metadata_store.clone(),
                blob_store.clone(),
                observer.clone(),
            ),
            clear: ClearHistory::new(
                state.clone(),
                metadata_store.clone(),
                blob_store.clone(),
                observer.clone(),
            ),
            monitor: ClipboardChangeMonitor::new(probe),
            state,
            capture,
            metadata_store,
            blob_store,
            observer,
            settings,
            consumer: Mutex::new(None),
        })
    }

    /// Start polling with explicit parameters. A no-op while already running.
    pub async fn start(
        &self,
        poll_interval: Duration,
        retry: RetryConfig,
        filters: CaptureFilters,
    ) -> Result<()> {
        ensure!(
            poll_interval >= Duration::from_millis(1),
            "poll interval must be at least 1ms, got {:?}",
            poll_interval
        );

        let mut consumer = self.consumer.lock().await;
        if self.monitor.state() == MonitorState::Running {
            debug!("History service already running");
            return Ok(());
        }

        {
            let mut state = self.state.lock().await;
            state.filters = filters;
            // Reclaim blobs left behind by failed deletes in earlier runs.
            if let Err(err) =
                sweep_orphan_blobs(self.metadata_store.as_ref(), self.blob_store.as_ref()).await
            {
                warn!(error = %err, "Orphan blob sweep failed, continuing start");
            }
        }

        // A consumer from a previous run may still be draining its last events.
        if let Some(previous) = consumer.take() {
            if tokio::time::timeout(self.settings.stop_grace(), previous)
                .await
                .is_err()
            {
                warn!("Previous event consumer still running, detaching it");
            }
        }

        let (tx, rx) = platform_event_channel(EVENT_CHANNEL_CAPACITY);
        self.monitor
            .start(
                MonitorConfig {
                    poll_interval,
                    retry,
                },
                tx,
            )
            .await?;
        *consumer = Some(tokio::spawn(consume_events(
            self.capture.clone(),
            self.monitor.observed(),
            rx,
        )));

        info!(
            poll_interval_ms = poll_interval.as_millis() as u64,
            capture_text = filters.capture_text,
            capture_images = filters.capture_images,
            capture_links = filters.capture_links,
            "Clipboard history service started"
        );
        Ok(())
    }

    /// Start with the configured poll interval and retry budget and the
    /// current capture filters.
    pub async fn start_with_settings(&self) -> Result<()> {
        let filters = self.state.lock().await.filters;
        self.start(
            self.settings.poll_interval(),
            self.settings.retry(),
            filters,
        )
        .await
    }

    /// Stop polling, waiting up to the configured grace period.
    ///
    /// Events already handed to the consumer are still processed; the consumer
    /// is never cancelled in the middle of a capture.
    pub async fn stop(&self) -> StopOutcome {
        let mut consumer = self.consumer.lock().await;
        let grace = self.settings.stop_grace();
        let outcome = self.monitor.stop(grace).await;

        if let Some(handle) = consumer.take() {
            if tokio::time::timeout(grace, handle).await.is_err() {
                warn!(
                    grace_ms = grace.as_millis() as u64,
                    "Event consumer still draining after grace period, detaching it"
                );
            }
        }

        if outcome != StopOutcome::AlreadyStopped {
            info!(?outcome, "Clipboard history service stopped");
        }
        outcome
    }

    pub fn monitor_state(&self) -> MonitorState {
        self.monitor.state()
    }

    /// Capture externally supplied content (e.g. a history item re-selected by
    /// the user) without reading the OS clipboard. Goes through the same
    /// classification, duplicate check and limit enforcement as polled content
    /// and advances `LastSeen`, so the next poll of the same content is a duplicate.
    pub async fn capture_manual(
        &self,
        snapshot: ClipboardSnapshot,
    ) -> Result<CaptureOutcome, CaptureError> {
        self.capture.execute(snapshot).await
    }

    pub async fn list_history(&self) -> Result<Vec<ClipboardEntry>> {
        self.list.execute().await
    }

    pub async fn search_history(&self, query: &str) -> Result<Vec<ClipboardEntry>> {
        self.list.search(query).await
    }

    pub async fn delete_entry(&self, id: &EntryId) -> Result<()> {
        self.delete.execute(id).await
    }

    pub async fn clear_history(&self) -> Result<usize> {
        self.clear.execute().await
    }

    /// Delete blobs that no history entry references.
    pub async fn sweep_orphan_blobs(&self) -> Result<SweepReport> {
        let _state = self.state.lock().await;
        sweep_orphan_blobs(self.metadata_store.as_ref(), self.blob_store.as_ref()).await
    }

    pub async fn filters(&self) -> CaptureFilters {
        self.state.lock().await.filters
    }

    pub async fn update_filters(&self, filters: CaptureFilters) {
        self.state.lock().await.filters = filters;
        info!(
            capture_text = filters.capture_text,
            capture_images = filters.capture_images,
            capture_links = filters.capture_links,
            "Capture filters updated"
        );
    }

    pub async fn max_items(&self) -> usize {
        self.state.lock().await.max_items
    }

    /// Change the history limit; a lower limit is enforced immediately.
    pub async fn set_max_items(&self, max_items: usize) -> Result<EvictionReport, SettingsError> {
        if !(1..=MAX_ITEMS_UPPER_BOUND).contains(&max_items) {
            return Err(SettingsError::MaxItemsOutOfRange {
                value: max_items,
                max: MAX_ITEMS_UPPER_BOUND,
            });
        }

        let mut state = self.state.lock().await;
        state.max_items = max_items;
        let report = evict_beyond_limit(
            self.metadata_store.as_ref(),
            self.blob_store.as_ref(),
            max_items,
        )
        .await;
        drop(state);

        for id in &report.evicted {
            self.observer.on_entry_deleted(id);
        }
        info!(max_items, evicted = report.evicted.len(), "History limit updated");
        Ok(report)
    }
}

/// Feeds monitor events to the capture use case. Content that failed to
/// persist is forgotten by the monitor so a later tick offers it again.
async fn consume_events(
    capture: Arc<CaptureClipboardUseCase>,
    observed: ObservedFingerprint,
    mut rx: PlatformEventReceiver,
) {
    while let Some(event) = rx.recv().await {
        match event {
            PlatformEvent::ClipboardChanged { snapshot } => {
                let fingerprint = snapshot.fingerprint();
                let result = AssertUnwindSafe(capture.execute(snapshot))
                    .catch_unwind()
                    .await;
                let settled = match result {
                    Ok(Ok(CaptureOutcome::Accepted { .. })) => true,
                    Ok(Ok(outcome)) => {
                        debug!(?outcome, "Clipboard change not recorded");
                        true
                    }
                    Ok(Err(err)) => {
                        warn!(error = %err, "Clipboard change was not saved, will retry");
                        false
                    }
                    Err(_) => {
                        error!("Capture panicked, continuing with next change");
                        false
                    }
                };
                if let (false, Some(fingerprint)) = (settled, fingerprint) {
                    observed.forget(&fingerprint).await;
                }
            }
        }
    }
    debug!("Clipboard event consumer exited");
}
