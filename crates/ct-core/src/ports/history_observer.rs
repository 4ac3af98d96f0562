use crate::clipboard::ClipboardEntry;
use crate::ids::EntryId;

/// Optional observer of history changes (e.g. a presentation layer).
///
/// Called on the capture path, so implementations must return quickly.
pub trait HistoryObserverPort: Send + Sync {
    fn on_entry_added(&self, _entry: &ClipboardEntry) {}

    fn on_entry_deleted(&self, _id: &EntryId) {}

    fn on_all_cleared(&self) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHistoryObserver;

impl HistoryObserverPort for NoopHistoryObserver {}
