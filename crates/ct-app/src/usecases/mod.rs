pub mod capture_clipboard;
pub mod clear_history;
pub mod delete_entry;
pub mod history_limit;
pub mod list_history;
pub mod orphan_blobs;

pub use capture_clipboard::{
    CaptureClipboardUseCase, CaptureError, CaptureOutcome, CaptureState, SharedCaptureState,
};
pub use clear_history::ClearHistory;
pub use delete_entry::DeleteHistoryEntry;
pub use history_limit::{evict_beyond_limit, EvictionReport};
pub use list_history::ListHistory;
pub use orphan_blobs::{sweep_orphan_blobs, SweepReport};
