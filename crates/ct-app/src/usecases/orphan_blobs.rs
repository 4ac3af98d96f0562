use std::collections::HashSet;

use anyhow::Result;
use ct_core::ids::BlobRef;
use ct_core::ports::{BlobStorePort, EntryMetadataStorePort};
use tracing::{debug, info, warn};

/// What one orphan sweep removed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub removed: Vec<BlobRef>,
    /// Orphans whose delete failed; the next sweep tries them again.
    pub failed: usize,
}

/// Delete every blob no history entry references.
///
/// Blobs outlive their entry when a blob delete fails after the metadata is
/// gone (eviction, deletion, clear) or after a failed insert. Must run with the
/// capture lock held: capture saves a blob before inserting the entry that
/// references it.
pub async fn sweep_orphan_blobs(
    metadata_store: &dyn EntryMetadataStorePort,
    blob_store: &dyn BlobStorePort,
) -> Result<SweepReport> {
    let referenced: HashSet<BlobRef> = metadata_store
        .list_all()
        .await?
        .into_iter()
        .filter_map(|entry| entry.image_ref().cloned())
        .collect();

    let mut report = SweepReport::default();
    for blob in blob_store.list().await? {
        if referenced.contains(&blob) {
            continue;
        }
        match blob_store.delete(&blob).await {
            Ok(()) => {
                debug!(blob = %blob, "Removed orphan blob");
                report.removed.push(blob);
            }
            Err(err) => {
                warn!(blob = %blob, error = %err, "Failed to remove orphan blob");
                report.failed += 1;
            }
        }
    }

    if !report.removed.is_empty() || report.failed > 0 {
        info!(
            removed = report.removed.len(),
            failed = report.failed,
            "Swept orphan blobs"
        );
    }
    Ok(report)
}
