//! Reference metadata store for history entries.
//!
//! Entries live in memory and, when the store was opened on a path, are
//! written back to a JSON document after every mutation (temp file + rename).

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use ct_core::clipboard::{ClipboardEntry, NewClipboardEntry};
use ct_core::ids::EntryId;
use ct_core::ports::EntryMetadataStorePort;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    /// Insertion sequence, breaks ties between equal timestamps.
    seq: u64,
    #[serde(flatten)]
    entry: ClipboardEntry,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryDocument {
    next_seq: u64,
    /// Kept sorted oldest first.
    entries: Vec<StoredEntry>,
}

impl HistoryDocument {
    fn sort(&mut self) {
        self.entries
            .sort_by_key(|stored| (stored.entry.captured_at_ms, stored.seq));
    }
}

pub struct FileEntryStore {
    path: Option<PathBuf>,
    doc: Mutex<HistoryDocument>,
}

impl FileEntryStore {
    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            doc: Mutex::new(HistoryDocument::default()),
        }
    }

    /// Open (or lazily create) a store backed by the JSON file at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut doc = match fs::read_to_string(&path).await {
            Ok(s) => serde_json::from_str::<HistoryDocument>(&s)
                .with_context(|| format!("parse history failed: {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HistoryDocument::default(),
            Err(e) => {
                return Err(e).with_context(|| format!("read history failed: {}", path.display()))
            }
        };
        doc.sort();
        let max_seq = doc.entries.iter().map(|s| s.seq + 1).max().unwrap_or(0);
        doc.next_seq = doc.next_seq.max(max_seq);

        debug!(path = %path.display(), entries = doc.entries.len(), "Opened history store");
        Ok(Self {
            path: Some(path),
            doc: Mutex::new(doc),
        })
    }

    async fn persist(&self, doc: &HistoryDocument) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create history dir failed: {}", dir.display()))?;
        }

        let content = serde_json::to_vec_pretty(doc)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("write temp history failed: {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).await.with_context(|| {
            format!(
                "rename temp history to target failed: {} -> {}",
                tmp_path.display(),
                path.display()
            )
        })?;
        Ok(())
    }

    /// Apply `mutate` and write the result back. On a write failure the
    /// in-memory document is rolled back so memory and disk stay in step.
    async fn mutate<T>(&self, mutate: impl FnOnce(&mut HistoryDocument) -> Result<T>) -> Result<T> {
        let mut doc = self.doc.lock().await;
        let backup = HistoryDocument {
            next_seq: doc.next_seq,
            entries: doc.entries.clone(),
        };
        let out = mutate(&mut doc)?;
        if let Err(e) = self.persist(&doc).await {
            *doc = backup;
            return Err(e);
        }
        Ok(out)
    }
}

#[async_trait]
impl EntryMetadataStorePort for FileEntryStore {
    async fn insert(&self, entry: &NewClipboardEntry) -> Result<EntryId> {
        self.mutate(|doc| {
            let id = EntryId::new();
            let seq = doc.next_seq;
            doc.next_seq += 1;
            doc.entries.push(StoredEntry {
                seq,
                entry: entry.clone().with_id(id.clone()),
            });
            doc.sort();
            Ok(id)
        })
        .await
    }

    async fn get(&self, id: &EntryId) -> Result<Option<ClipboardEntry>> {
        let doc = self.doc.lock().await;
        Ok(doc
            .entries
            .iter()
            .find(|stored| &stored.entry.id == id)
            .map(|stored| stored.entry.clone()))
    }

    async fn list_all(&self) -> Result<Vec<ClipboardEntry>> {
        let doc = self.doc.lock().await;
        Ok(doc
            .entries
            .iter()
            .rev()
            .map(|stored| stored.entry.clone())
            .collect())
    }

    async fn delete_by_id(&self, id: &EntryId) -> Result<()> {
        self.mutate(|doc| {
            let pos = doc
                .entries
                .iter()
                .position(|stored| &stored.entry.id == id)
                .ok_or_else(|| anyhow!("History entry not found: {}", id))?;
            doc.entries.remove(pos);
            Ok(())
        })
        .await
    }

    async fn count_all(&self) -> Result<usize> {
        Ok(self.doc.lock().await.entries.len())
    }

    async fn delete_oldest_beyond(&self, max_items: usize) -> Result<Vec<EntryId>> {
        self.mutate(|doc| {
            let excess = doc.entries.len().saturating_sub(max_items);
            Ok(doc
                .entries
                .drain(..excess)
                .map(|stored| stored.entry.id)
                .collect())
        })
        .await
    }

    async fn clear_all(&self) -> Result<usize> {
        self.mutate(|doc| {
            let removed = doc.entries.len();
            doc.entries.clear();
            Ok(removed)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_core::clipboard::{ContentType, Fingerprint};

    fn text_at(text: &str, captured_at_ms: i64) -> NewClipboardEntry {
        NewClipboardEntry::textual(
            ContentType::Text,
            text.to_string(),
            Fingerprint::of(text.as_bytes()),
            captured_at_ms,
        )
    }

    fn texts(entries: &[ClipboardEntry]) -> Vec<&str> {
        entries.iter().filter_map(|e| e.text_content()).collect()
    }

    #[tokio::test]
    async fn test_list_all_is_newest_first() {
        let store = FileEntryStore::in_memory();
        store.insert(&text_at("a", 10)).await.unwrap();
        store.insert(&text_at("b", 20)).await.unwrap();
        store.insert(&text_at("c", 30)).await.unwrap();

        assert_eq!(texts(&store.list_all().await.unwrap()), ["c", "b", "a"]);
        assert_eq!(store.count_all().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_equal_timestamps_keep_insertion_order() {
        let store = FileEntryStore::in_memory();
        for text in ["first", "second", "third"] {
            store.insert(&text_at(text, 100)).await.unwrap();
        }

        assert_eq!(
            texts(&store.list_all().await.unwrap()),
            ["third", "second", "first"]
        );

        let evicted = store.delete_oldest_beyond(1).await.unwrap();
        assert_eq!(evicted.len(), 2);
        assert_eq!(texts(&store.list_all().await.unwrap()), ["third"]);
    }

    #[tokio::test]
    async fn test_delete_oldest_beyond_returns_oldest_first() {
        let store = FileEntryStore::in_memory();
        let a = store.insert(&text_at("a", 1)).await.unwrap();
        let b = store.insert(&text_at("b", 2)).await.unwrap();
        store.insert(&text_at("c", 3)).await.unwrap();

        assert_eq!(store.delete_oldest_beyond(1).await.unwrap(), vec![a, b]);
        assert!(store.delete_oldest_beyond(1).await.unwrap().is_empty());
        assert!(store.delete_oldest_beyond(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_an_error() {
        let store = FileEntryStore::in_memory();
        let id = store.insert(&text_at("a", 1)).await.unwrap();

        store.delete_by_id(&id).await.unwrap();
        assert!(store.get(&id).await.unwrap().is_none());
        assert!(store.delete_by_id(&id).await.is_err());
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let store = FileEntryStore::open(&path).await.unwrap();
        let id = store.insert(&text_at("kept", 5)).await.unwrap();
        store.insert(&text_at("newer", 6)).await.unwrap();
        drop(store);

        let reopened = FileEntryStore::open(&path).await.unwrap();
        assert_eq!(texts(&reopened.list_all().await.unwrap()), ["newer", "kept"]);
        assert_eq!(
            reopened.get(&id).await.unwrap().unwrap().text_content(),
            Some("kept")
        );

        // New inserts after reopen still sort after existing ones at equal time.
        reopened.insert(&text_at("later", 6)).await.unwrap();
        assert_eq!(
            texts(&reopened.list_all().await.unwrap()),
            ["later", "newer", "kept"]
        );
    }

    #[tokio::test]
    async fn test_clear_all_reports_count() {
        let store = FileEntryStore::in_memory();
        store.insert(&text_at("a", 1)).await.unwrap();
        store.insert(&text_at("b", 2)).await.unwrap();

        assert_eq!(store.clear_all().await.unwrap(), 2);
        assert_eq!(store.count_all().await.unwrap(), 0);
    }
}
