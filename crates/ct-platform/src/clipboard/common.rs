use clipboard_rs::{common::RustImage, Clipboard, ClipboardContext, ContentFormat};
use ct_core::clipboard::ClipboardSnapshot;
use ct_core::ports::ProbeError;

type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Substrings the native backends use when another process holds the clipboard.
const LOCK_MARKERS: &[&str] = &["openclipboard", "access is denied", "locked", "busy"];

pub struct CommonClipboardImpl;

impl CommonClipboardImpl {
    /// Read the clipboard through clipboard-rs, preferring an image over text.
    ///
    /// Images are re-encoded to PNG so the same picture always yields the same bytes.
    pub fn read_snapshot(ctx: &ClipboardContext) -> Result<ClipboardSnapshot, ProbeError> {
        if ctx.has(ContentFormat::Image) {
            let image = ctx.get_image().map_err(map_backend_err)?;
            let png = image.to_png().map_err(map_backend_err)?;
            return Ok(ClipboardSnapshot::Image(png.get_bytes().to_vec()));
        }

        if ctx.has(ContentFormat::Text) {
            let text = ctx.get_text().map_err(map_backend_err)?;
            if text.is_empty() {
                return Ok(ClipboardSnapshot::Empty);
            }
            return Ok(ClipboardSnapshot::Text(text));
        }

        let formats = ctx.available_formats().map_err(map_backend_err)?;
        if formats.is_empty() {
            Ok(ClipboardSnapshot::Empty)
        } else {
            Err(ProbeError::UnsupportedFormat(formats.join(",")))
        }
    }
}

pub(crate) fn map_backend_err(err: BackendError) -> ProbeError {
    classify_backend_message(&err.to_string())
}

pub(crate) fn classify_backend_message(message: &str) -> ProbeError {
    let lower = message.to_ascii_lowercase();
    if LOCK_MARKERS.iter().any(|marker| lower.contains(marker)) {
        ProbeError::TransientAccessDenied
    } else {
        ProbeError::Unavailable(message.to_string())
    }
}
