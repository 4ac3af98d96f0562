use thiserror::Error;

/// Failure classes of a single native clipboard read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    /// Another process holds the clipboard; expected to clear within milliseconds.
    #[error("clipboard is locked by another process")]
    TransientAccessDenied,

    /// The clipboard holds only formats this backend cannot read.
    #[error("unsupported clipboard format: {0}")]
    UnsupportedFormat(String),

    /// Non-transient backend failure (permissions, missing display server, tool not found).
    #[error("clipboard backend unavailable: {0}")]
    Unavailable(String),
}

impl ProbeError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ProbeError::TransientAccessDenied)
    }
}
