use std::sync::Arc;

use ct_core::clipboard::{
    classify, ClipboardEntry, ClipboardSnapshot, ContentType, DraftContent, DuplicateDetector,
    NewClipboardEntry,
};
use ct_core::ids::EntryId;
use ct_core::ports::{BlobStorePort, ClockPort, EntryMetadataStorePort, HistoryObserverPort};
use ct_core::settings::{CaptureFilters, HistorySettings};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::history_limit::evict_beyond_limit;

/// Mutable capture state shared by the poll consumer, manual capture and
/// settings changes. Holding its lock is the capture critical section.
#[derive(Debug)]
pub struct CaptureState {
    pub detector: DuplicateDetector,
    pub filters: CaptureFilters,
    pub max_items: usize,
    last_captured_at_ms: Option<i64>,
}

impl CaptureState {
    pub fn new(filters: CaptureFilters, max_items: usize) -> Self {
        Self {
            detector: DuplicateDetector::new(),
            filters,
            max_items,
            last_captured_at_ms: None,
        }
    }

    pub fn from_settings(settings: &HistorySettings) -> Self {
        Self::new(settings.filters(), settings.max_items)
    }

    /// Capture timestamp that never goes below the previous accepted one.
    fn next_timestamp(&self, now_ms: i64) -> i64 {
        match self.last_captured_at_ms {
            Some(last) if last > now_ms => last,
            _ => now_ms,
        }
    }
}

pub type SharedCaptureState = Arc<Mutex<CaptureState>>;

/// Result of feeding one snapshot through the capture pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Persisted as a new entry; `evicted` lists entries removed to respect the limit.
    Accepted {
        entry: ClipboardEntry,
        evicted: Vec<EntryId>,
    },
    /// Same content as the most recently accepted entry.
    Duplicate,
    /// Content type disabled by the capture filters.
    Filtered(ContentType),
    /// Snapshot was empty or unreadable.
    Skipped,
}

impl CaptureOutcome {
    pub fn entry(&self) -> Option<&ClipboardEntry> {
        match self {
            CaptureOutcome::Accepted { entry, .. } => Some(entry),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to store image blob: {0}")]
    BlobStore(#[source] anyhow::Error),

    #[error("failed to insert history entry: {0}")]
    MetadataStore(#[source] anyhow::Error),
}

/// Turn a clipboard snapshot into a persisted, limit-enforced history entry.
///
/// 将剪贴板快照转换为持久化的历史条目。
///
/// # Behavior / 行为
/// - 1. Classify the snapshot (text / link / image)
/// - 2. Drop content types disabled by the filters
/// - 3. Reject an immediate repeat of the last accepted entry
/// - 4. Save image bytes to the blob store, then insert metadata
/// - 5. Advance `LastSeen` only after the insert succeeded
/// - 6. Evict the oldest entries beyond `max_items`, then notify the observer
///
/// Steps 2 to 6 run under the shared [`CaptureState`] lock, so the poll
/// consumer and manual captures can never double-insert the same content.
pub struct CaptureClipboardUseCase {
    state: SharedCaptureState,
    metadata_store: Arc<dyn EntryMetadataStorePort>,
    blob_store: Arc<dyn BlobStorePort>,
    observer: Arc<dyn HistoryObserverPort>,
    clock: Arc<dyn ClockPort>,
}

impl CaptureClipboardUseCase {
    pub fn new(
        state: SharedCaptureState,
        metadata_store: Arc<dyn EntryMetadataStorePort>,
        blob_store: Arc<dyn BlobStorePort>,
        observer: Arc<dyn HistoryObserverPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            state,
            metadata_store,
            blob_store,
            observer,
            clock,
        }
    }

    #[tracing::instrument(
        name = "usecase.capture_clipboard.execute",
        skip_all,
        fields(kind = ?snapshot.kind())
    )]
    pub async fn execute(&self, snapshot: ClipboardSnapshot) -> Result<CaptureOutcome, CaptureError> {
        let Some(draft) = classify(snapshot) else {
            return Ok(CaptureOutcome::Skipped);
        };
        let content_type = draft.content_type();
        let fingerprint = draft.fingerprint;

        let mut state = self.state.lock().await;

        if !state.filters.allows(content_type) {
            debug!(%content_type, "Content type disabled, discarding");
            return Ok(CaptureOutcome::Filtered(content_type));
        }

        if !state.detector.should_accept(&draft) {
            debug!(fingerprint = %fingerprint.short(), "Consecutive duplicate, skipping");
            return Ok(CaptureOutcome::Duplicate);
        }

        let captured_at_ms = state.next_timestamp(self.clock.now_ms());
        let new_entry = match draft.content {
            DraftContent::Text(text) => {
                NewClipboardEntry::textual(ContentType::Text, text, fingerprint, captured_at_ms)
            }
            DraftContent::Link(text) => {
                NewClipboardEntry::textual(ContentType::Link, text, fingerprint, captured_at_ms)
            }
            DraftContent::Image(bytes) => {
                let blob = self
                    .blob_store
                    .save(&bytes)
                    .await
                    .map_err(CaptureError::BlobStore)?;
                NewClipboardEntry::image(blob, bytes.len() as u64, fingerprint, captured_at_ms)
            }
        };

        let id = match self.metadata_store.insert(&new_entry).await {
            Ok(id) => id,
            Err(err) => {
                if let Some(blob) = new_entry.content.blob_ref() {
                    if let Err(cleanup_err) = self.blob_store.delete(blob).await {
                        warn!(blob = %blob, error = %cleanup_err, "Failed to remove blob of unsaved entry");
                    }
                }
                return Err(CaptureError::MetadataStore(err));
            }
        };
        let entry = new_entry.with_id(id);

        state.detector.accept(fingerprint);
        state.last_captured_at_ms = Some(captured_at_ms);

        let report = evict_beyond_limit(
            self.metadata_store.as_ref(),
            self.blob_store.as_ref(),
            state.max_items,
        )
        .await;

        info!(
            entry_id = %entry.id,
            %content_type,
            fingerprint = %fingerprint.short(),
            size_bytes = entry.size_bytes,
            evicted = report.evicted.len(),
            "Captured clipboard entry"
        );

        self.observer.on_entry_added(&entry);
        for id in &report.evicted {
            self.observer.on_entry_deleted(id);
        }

        Ok(CaptureOutcome::Accepted {
            entry,
            evicted: report.evicted,
        })
    }
}
