use ct_core::clipboard::ClipboardEntry;
use ct_core::ids::EntryId;
use ct_core::ports::{BlobStorePort, EntryMetadataStorePort};
use tracing::{debug, warn};

/// What one eviction pass removed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EvictionReport {
    /// Evicted entry ids, oldest first.
    pub evicted: Vec<EntryId>,
    /// Entries that should have been evicted but could not be; retried next pass.
    pub failed: usize,
}

/// Delete the oldest entries until at most `max_items` remain.
///
/// Text-only excess goes through the store's bulk `delete_oldest_beyond`.
/// When an image entry is among the evictees, entries are removed one by one:
/// metadata first, then the blob, so a failed metadata delete never leaves an
/// entry pointing at a missing file. Failures are logged and reported, never
/// returned; the next pass retries whatever is still over the limit.
pub async fn evict_beyond_limit(
    metadata_store: &dyn EntryMetadataStorePort,
    blob_store: &dyn BlobStorePort,
    max_items: usize,
) -> EvictionReport {
    let mut report = EvictionReport::default();

    let count = match metadata_store.count_all().await {
        Ok(count) => count,
        Err(err) => {
            warn!(error = %err, "Failed to count history entries, skipping eviction");
            return report;
        }
    };
    if count <= max_items {
        return report;
    }

    let evictees: Vec<ClipboardEntry> = match metadata_store.list_all().await {
        // list_all is newest first; everything past max_items goes, oldest first.
        Ok(entries) => entries.into_iter().skip(max_items).rev().collect(),
        Err(err) => {
            warn!(error = %err, "Failed to list history entries, skipping eviction");
            report.failed = count - max_items;
            return report;
        }
    };

    if evictees.iter().all(|entry| entry.image_ref().is_none()) {
        match metadata_store.delete_oldest_beyond(max_items).await {
            Ok(ids) => report.evicted = ids,
            Err(err) => {
                warn!(error = %err, excess = evictees.len(), "Bulk eviction failed");
                report.failed = evictees.len();
            }
        }
        return report;
    }

    for entry in evictees {
        if let Err(err) = metadata_store.delete_by_id(&entry.id).await {
            warn!(entry_id = %entry.id, error = %err, "Failed to evict entry, will retry");
            report.failed += 1;
            continue;
        }
        if let Some(blob) = entry.image_ref() {
            if let Err(err) = blob_store.delete(blob).await {
                warn!(entry_id = %entry.id, blob = %blob, error = %err, "Evicted entry left its blob behind");
            }
        }
        debug!(entry_id = %entry.id, content_type = %entry.content_type, "Evicted entry");
        report.evicted.push(entry.id);
    }

    report
}
