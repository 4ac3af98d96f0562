use super::Fingerprint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    Text,
    Image,
    Empty,
    Unreadable,
}

/// One point-in-time read of the system clipboard.
///
/// Built fresh on every poll tick and dropped after classification; never persisted.
#[derive(Clone, PartialEq, Eq)]
pub enum ClipboardSnapshot {
    Text(String),
    /// Encoded image bytes as handed over by the platform (PNG for the native backend).
    Image(Vec<u8>),
    Empty,
    /// The clipboard could not be read this tick (locked, unsupported format, backend error).
    Unreadable,
}

impl ClipboardSnapshot {
    pub fn text(s: impl Into<String>) -> Self {
        ClipboardSnapshot::Text(s.into())
    }

    pub fn kind(&self) -> SnapshotKind {
        match self {
            ClipboardSnapshot::Text(_) => SnapshotKind::Text,
            ClipboardSnapshot::Image(_) => SnapshotKind::Image,
            ClipboardSnapshot::Empty => SnapshotKind::Empty,
            ClipboardSnapshot::Unreadable => SnapshotKind::Unreadable,
        }
    }

    /// Raw payload bytes; `None` for `Empty` and `Unreadable`.
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            ClipboardSnapshot::Text(s) => Some(s.as_bytes()),
            ClipboardSnapshot::Image(bytes) => Some(bytes),
            ClipboardSnapshot::Empty | ClipboardSnapshot::Unreadable => None,
        }
    }

    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.payload().map(Fingerprint::of)
    }

    pub fn size_bytes(&self) -> usize {
        self.payload().map_or(0, <[u8]>::len)
    }
}

impl std::fmt::Debug for ClipboardSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardSnapshot::Text(s) => write!(f, "Text({} bytes)", s.len()),
            ClipboardSnapshot::Image(b) => write!(f, "Image({} bytes)", b.len()),
            ClipboardSnapshot::Empty => f.write_str("Empty"),
            ClipboardSnapshot::Unreadable => f.write_str("Unreadable"),
        }
    }
}
