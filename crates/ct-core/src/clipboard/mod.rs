mod classifier;
mod content_type;
mod dedup;
mod entry;
mod fingerprint;
mod snapshot;

pub use classifier::{classify, looks_like_url};
pub use content_type::ContentType;
pub use dedup::{should_accept, DuplicateDetector};
pub use entry::{ClipboardEntry, DraftContent, EntryContent, EntryDraft, NewClipboardEntry};
pub use fingerprint::Fingerprint;
pub use snapshot::{ClipboardSnapshot, SnapshotKind};
