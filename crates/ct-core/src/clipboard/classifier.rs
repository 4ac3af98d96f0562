//! Content classification policy.
//!
//! Maps a raw [`ClipboardSnapshot`] to an [`EntryDraft`]. Pure and
//! deterministic: no I/O, no clock, no shared state.
//!
//! - `Image` snapshots become [`ContentType::Image`].
//! - `Text` snapshots become [`ContentType::Link`] when the whole trimmed string
//!   is URL-shaped (`scheme://host...`), otherwise [`ContentType::Text`].
//! - `Empty` / `Unreadable` snapshots carry nothing to classify.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ClipboardSnapshot, DraftContent, EntryDraft, Fingerprint};

static URL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    // scheme per RFC 3986, then a non-empty host, then anything without whitespace
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s/?#@]+(?:@[^\s/?#]+)?(?:[/?#]\S*)?$")
        .expect("URL_SHAPE regex is valid")
});

/// Whether `text`, after trimming surrounding whitespace, is a single URL.
pub fn looks_like_url(text: &str) -> bool {
    URL_SHAPE.is_match(text.trim())
}

/// Classify a snapshot. Returns `None` for `Empty` and `Unreadable`.
///
/// The fingerprint is computed over the original payload bytes (untrimmed text,
/// raw image bytes), so classification never changes what counts as a duplicate.
pub fn classify(snapshot: ClipboardSnapshot) -> Option<EntryDraft> {
    match snapshot {
        ClipboardSnapshot::Text(text) => {
            let fingerprint = Fingerprint::of(text.as_bytes());
            let content = if looks_like_url(&text) {
                DraftContent::Link(text)
            } else {
                DraftContent::Text(text)
            };
            Some(EntryDraft {
                content,
                fingerprint,
            })
        }
        ClipboardSnapshot::Image(bytes) => {
            let fingerprint = Fingerprint::of(&bytes);
            Some(EntryDraft {
                content: DraftContent::Image(bytes),
                fingerprint,
            })
        }
        ClipboardSnapshot::Empty | ClipboardSnapshot::Unreadable => None,
    }
}
