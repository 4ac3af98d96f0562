use ct_core::ids::EntryId;
use ct_core::ports::HistoryObserverPort;
use ct_core::ClipboardEntry;
use tracing::info;

/// Stands in for a presentation layer: reports history changes to the log.
#[derive(Debug, Default)]
pub struct LoggingHistoryObserver;

impl HistoryObserverPort for LoggingHistoryObserver {
    fn on_entry_added(&self, entry: &ClipboardEntry) {
        info!(
            entry_id = %entry.id,
            content_type = %entry.content_type,
            preview = %entry.preview(),
            "History entry added"
        );
    }

    fn on_entry_deleted(&self, id: &EntryId) {
        info!(entry_id = %id, "History entry removed");
    }

    fn on_all_cleared(&self) {
        info!("History cleared");
    }
}
