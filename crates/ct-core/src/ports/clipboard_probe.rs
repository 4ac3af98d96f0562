use crate::clipboard::ClipboardSnapshot;
use crate::ports::errors::ProbeError;

/// Platform capability: read the current clipboard once.
///
/// Implementations perform exactly one native read, never write to the
/// clipboard, and report lock contention as [`ProbeError::TransientAccessDenied`]
/// so the caller can retry. Calls may block; async callers should run them on
/// a blocking thread.
pub trait ClipboardProbePort: Send + Sync {
    fn read_native(&self) -> Result<ClipboardSnapshot, ProbeError>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}
