use anyhow::Result;
use async_trait::async_trait;

use crate::clipboard::{ClipboardEntry, NewClipboardEntry};
use crate::ids::EntryId;

/// Metadata store for history entries.
///
/// 历史条目的元数据存储端口。
///
/// # Ordering
/// "Oldest" means smallest `captured_at_ms`; entries with equal timestamps are
/// ordered by insertion. `list_all` returns the reverse of that order (newest first).
#[async_trait]
pub trait EntryMetadataStorePort: Send + Sync {
    /// Persist a new entry and return the id assigned to it.
    async fn insert(&self, entry: &NewClipboardEntry) -> Result<EntryId>;

    async fn get(&self, id: &EntryId) -> Result<Option<ClipboardEntry>>;

    /// All entries, newest first.
    async fn list_all(&self) -> Result<Vec<ClipboardEntry>>;

    /// Delete one entry. Deleting an unknown id is an error.
    async fn delete_by_id(&self, id: &EntryId) -> Result<()>;

    async fn count_all(&self) -> Result<usize>;

    /// Delete everything except the `max_items` newest entries and return the
    /// deleted ids, oldest first.
    async fn delete_oldest_beyond(&self, max_items: usize) -> Result<Vec<EntryId>>;

    /// Delete every entry and return how many were removed.
    async fn clear_all(&self) -> Result<usize>;
}
