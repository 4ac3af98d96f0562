use std::sync::Arc;

use anyhow::{anyhow, Result};
use ct_core::ids::EntryId;
use ct_core::ports::{BlobStorePort, EntryMetadataStorePort, HistoryObserverPort};
use tracing::{info, warn};

use super::capture_clipboard::SharedCaptureState;

/// Use case for deleting one history entry and its blob.
/// 删除单条历史条目及其 blob 的用例。
pub struct DeleteHistoryEntry {
    state: SharedCaptureState,
    metadata_store: Arc<dyn EntryMetadataStorePort>,
    blob_store: Arc<dyn BlobStorePort>,
    observer: Arc<dyn HistoryObserverPort>,
}

impl DeleteHistoryEntry {
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

    /// Deletion order:
    /// 1. Verify the entry exists (error if missing).
    /// 2. Delete the metadata record.
    /// 3. Delete the image blob, if any.
    /// 4. Clear `LastSeen` when it pointed at this entry, so copying the same
    ///    content again is recorded.
    #[tracing::instrument(
        name = "usecase.delete_history_entry.execute",
        skip_all,
        fields(entry_id = %entry_id)
    )]
    pub async fn execute(&self, entry_id: &EntryId) -> Result<()> {
        let mut state = self.state.lock().await;

        let entry = self
            .metadata_store
            .get(entry_id)
            .await?
            .ok_or_else(|| anyhow!("History entry not found: {}", entry_id))?;

        self.metadata_store
            .delete_by_id(entry_id)
            .await
            .map_err(|e| anyhow!("Failed to delete entry: {}", e))?;

        if let Some(blob) = entry.image_ref() {
            if let Err(err) = self.blob_store.delete(blob).await {
                warn!(blob = %blob, error = %err, "Deleted entry left its blob behind");
            }
        }

        let forgot = state.detector.forget(&entry.fingerprint);
        drop(state);

        info!(entry_id = %entry_id, cleared_last_seen = forgot, "Deleted history entry");
        self.observer.on_entry_deleted(entry_id);
        Ok(())
    }
}
