//! # ct-core
//!
//! Core domain models and capture policy for cliptrail.
//!
//! This crate contains pure logic without any infrastructure dependencies:
//! the snapshot and entry models, content fingerprinting, the content
//! classifier, the consecutive-duplicate rule, settings, and the port traits
//! implemented by the platform and infrastructure crates.

pub mod clipboard;
pub mod ids;
pub mod ports;
pub mod settings;

// Re-export commonly used types at the crate root
pub use clipboard::{
    ClipboardEntry, ClipboardSnapshot, ContentType, EntryContent, EntryDraft, Fingerprint,
    NewClipboardEntry,
};
pub use ids::{BlobRef, EntryId};
pub use settings::{CaptureFilters, HistorySettings, RetryConfig};
