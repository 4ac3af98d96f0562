use serde::{Deserialize, Serialize};

use super::{ContentType, Fingerprint};
use crate::ids::{BlobRef, EntryId};

const PREVIEW_MAX_CHARS: usize = 100;

/// Classified content waiting for the duplicate check and persistence.
#[derive(Clone, PartialEq, Eq)]
pub enum DraftContent {
    Text(String),
    Link(String),
    Image(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub content: DraftContent,
    pub fingerprint: Fingerprint,
}

impl EntryDraft {
    pub fn content_type(&self) -> ContentType {
        match self.content {
            DraftContent::Text(_) => ContentType::Text,
            DraftContent::Link(_) => ContentType::Link,
            DraftContent::Image(_) => ContentType::Image,
        }
    }

    pub fn size_bytes(&self) -> usize {
        match &self.content {
            DraftContent::Text(s) | DraftContent::Link(s) => s.len(),
            DraftContent::Image(bytes) => bytes.len(),
        }
    }
}

impl std::fmt::Debug for DraftContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftContent::Text(s) => write!(f, "Text({} bytes)", s.len()),
            DraftContent::Link(s) => write!(f, "Link({s})"),
            DraftContent::Image(b) => write!(f, "Image({} bytes)", b.len()),
        }
    }
}

/// Stored payload of an entry. Text and links keep their text inline,
/// images keep only the blob handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EntryContent {
    Text(String),
    Image(BlobRef),
}

impl EntryContent {
    pub fn text(&self) -> Option<&str> {
        match self {
            EntryContent::Text(s) => Some(s),
            EntryContent::Image(_) => None,
        }
    }

    pub fn blob_ref(&self) -> Option<&BlobRef> {
        match self {
            EntryContent::Image(blob) => Some(blob),
            EntryContent::Text(_) => None,
        }
    }
}

/// A persistence-ready entry that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClipboardEntry {
    pub content_type: ContentType,
    pub content: EntryContent,
    pub fingerprint: Fingerprint,
    pub captured_at_ms: i64,
    pub size_bytes: u64,
}

impl NewClipboardEntry {
    /// Build a text or link entry. Panics in debug builds if `content_type` is `Image`.
    pub fn textual(
        content_type: ContentType,
        text: String,
        fingerprint: Fingerprint,
        captured_at_ms: i64,
    ) -> Self {
        debug_assert!(content_type.is_textual(), "textual entry with {content_type}");
        let size_bytes = text.len() as u64;
        Self {
            content_type,
            content: EntryContent::Text(text),
            fingerprint,
            captured_at_ms,
            size_bytes,
        }
    }

    pub fn image(
        blob: BlobRef,
        size_bytes: u64,
        fingerprint: Fingerprint,
        captured_at_ms: i64,
    ) -> Self {
        Self {
            content_type: ContentType::Image,
            content: EntryContent::Image(blob),
            fingerprint,
            captured_at_ms,
            size_bytes,
        }
    }

    /// Attach the id handed out by the metadata store.
    pub fn with_id(self, id: EntryId) -> ClipboardEntry {
        ClipboardEntry {
            id,
            content_type: self.content_type,
            content: self.content,
            fingerprint: self.fingerprint,
            captured_at_ms: self.captured_at_ms,
            size_bytes: self.size_bytes,
        }
    }
}

/// A classified, persisted clipboard history record.
///
/// Exactly one of [`text_content`](Self::text_content) and
/// [`image_ref`](Self::image_ref) is populated, matching `content_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardEntry {
    pub id: EntryId,
    pub content_type: ContentType,
    pub content: EntryContent,
    pub fingerprint: Fingerprint,
    pub captured_at_ms: i64,
    pub size_bytes: u64,
}

impl ClipboardEntry {
    pub fn text_content(&self) -> Option<&str> {
        self.content.text()
    }

    pub fn image_ref(&self) -> Option<&BlobRef> {
        self.content.blob_ref()
    }

    /// Content and type agree (text/link carry text, image carries a blob ref).
    pub fn is_consistent(&self) -> bool {
        match (&self.content, self.content_type) {
            (EntryContent::Text(_), ContentType::Text | ContentType::Link) => true,
            (EntryContent::Image(_), ContentType::Image) => true,
            _ => false,
        }
    }

    /// Short display string for list views.
    pub fn preview(&self) -> String {
        match &self.content {
            EntryContent::Text(s) => {
                if s.chars().count() > PREVIEW_MAX_CHARS {
                    let head: String = s.chars().take(PREVIEW_MAX_CHARS).collect();
                    format!("{head}...")
                } else {
                    s.clone()
                }
            }
            EntryContent::Image(_) => format!("Image ({} bytes)", self.size_bytes),
        }
    }
}
