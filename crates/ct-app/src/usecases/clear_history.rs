use std::sync::Arc;

use anyhow::Result;
use ct_core::ports::{BlobStorePort, EntryMetadataStorePort, HistoryObserverPort};
use tracing::{info, warn};

use super::capture_clipboard::SharedCaptureState;
use super::orphan_blobs::sweep_orphan_blobs;

/// Remove every entry, every image blob and reset `LastSeen`.
///
/// Blobs are removed by an orphan sweep after the metadata is cleared, which
/// also reclaims blobs left behind by earlier failed deletes.
pub struct ClearHistory {
    state: SharedCaptureState,
    metadata_store: Arc<dyn EntryMetadataStorePort>,
    blob_store: Arc<dyn BlobStorePort>,
    observer: Arc<dyn HistoryObserverPort>,
}

impl ClearHistory {
    pub fn new(
        state: SharedCaptureState,
        metadata_store: Arc<dyn EntryMetadataStorePort>,
        blob_store: Arc<dyn BlobStorePort>,
        observer: Arc<dyn HistoryObserverPort>,
    ) -> Self {
        Self {
            state,
            metadata_store,
            blob_store,
            observer,
        }
    }

    /// Returns the number of removed entries.
    #[tracing::instrument(name = "usecase.clear_history.execute", skip(self))]
    pub async fn execute(&self) -> Result<usize> {
        let mut state = self.state.lock().await;

        let removed = self.metadata_store.clear_all().await?;
        state.detector.reset();

        let blobs = match sweep_orphan_blobs(
            self.metadata_store.as_ref(),
            self.blob_store.as_ref(),
        )
        .await
        {
            Ok(report) => report.removed.len(),
            Err(err) => {
                warn!(error = %err, "Failed to remove blobs while clearing history");
                0
            }
        };
        drop(state);

        info!(removed, blobs, "Cleared clipboard history");
        self.observer.on_all_cleared();
        Ok(removed)
    }
}
