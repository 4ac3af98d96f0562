use super::{EntryDraft, Fingerprint};

/// Consecutive-duplicate rule: reject only when the draft is identical to the
/// most recently accepted entry. Content seen earlier in history is accepted again.
pub fn should_accept(draft: &EntryDraft, last_seen: Option<&Fingerprint>) -> bool {
    last_seen != Some(&draft.fingerprint)
}

/// Owns `LastSeen`, the fingerprint of the most recently accepted entry.
///
/// Not synchronized on its own: the owner keeps it behind the same lock that
/// guards the accept -> persist -> advance sequence.
#[derive(Debug, Default, Clone)]
pub struct DuplicateDetector {
    last_seen: Option<Fingerprint>,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_accept(&self, draft: &EntryDraft) -> bool {
        should_accept(draft, self.last_seen.as_ref())
    }

    /// Advance `LastSeen`. Call only after the entry was persisted.
    pub fn accept(&mut self, fingerprint: Fingerprint) {
        self.last_seen = Some(fingerprint);
    }

    pub fn last_seen(&self) -> Option<&Fingerprint> {
        self.last_seen.as_ref()
    }

    /// Clear `LastSeen` if it currently points at `fingerprint`.
    pub fn forget(&mut self, fingerprint: &Fingerprint) -> bool {
        if self.last_seen.as_ref() == Some(fingerprint) {
            self.last_seen = None;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.last_seen = None;
    }
}
