use std::sync::Arc;

use anyhow::Result;
use ct_core::clipboard::ClipboardEntry;
use ct_core::ports::EntryMetadataStorePort;

/// Read-side queries over the history.
pub struct ListHistory {
    metadata_store: Arc<dyn EntryMetadataStorePort>,
}

impl ListHistory {
    pub fn new(metadata_store: Arc<dyn EntryMetadataStorePort>) -> Self {
        Self { metadata_store }
    }

    /// All entries, newest first.
    #[tracing::instrument(name = "usecase.list_history.execute", skip(self))]
    pub async fn execute(&self) -> Result<Vec<ClipboardEntry>> {
        self.metadata_store.list_all().await
    }

    /// Entries whose text or preview contains `query`, ignoring case.
    /// A blank query matches everything.
    #[tracing::instrument(name = "usecase.search_history.execute", skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<ClipboardEntry>> {
        let entries = self.metadata_store.list_all().await?;
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(entries);
        }
        Ok(entries
            .into_iter()
            .filter(|entry| matches_query(entry, &needle))
            .collect())
    }
}

fn matches_query(entry: &ClipboardEntry, needle: &str) -> bool {
    entry
        .text_content()
        .is_some_and(|text| text.to_lowercase().contains(needle))
        || entry.preview().to_lowercase().contains(needle)
}
