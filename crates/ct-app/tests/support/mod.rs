#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use ct_app::{ClipboardHistoryService, HistoryDeps};
use ct_core::clipboard::ClipboardSnapshot;
use ct_core::ids::EntryId;
use ct_core::ports::{ClipboardProbePort, ClockPort, EntryMetadataStorePort, HistoryObserverPort, ProbeError};
use ct_core::settings::HistorySettings;
use ct_core::ClipboardEntry;
use ct_infra::{FileEntryStore, FsBlobStore, SystemClock};

pub const WAIT: Duration = Duration::from_secs(3);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Settable stand-in for the OS clipboard. Scripted results are consumed
/// first, then `current` is returned on every read.
pub struct FakeClipboard {
    current: Mutex<Result<ClipboardSnapshot, ProbeError>>,
    script: Mutex<VecDeque<Result<ClipboardSnapshot, ProbeError>>>,
    reads: AtomicUsize,
}

impl FakeClipboard {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Ok(ClipboardSnapshot::Empty)),
            script: Mutex::new(VecDeque::new()),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, snapshot: ClipboardSnapshot) {
        *self.current.lock().unwrap() = Ok(snapshot);
    }

    pub fn set_text(&self, text: &str) {
        self.set(ClipboardSnapshot::text(text));
    }

    pub fn set_locked(&self) {
        *self.current.lock().unwrap() = Err(ProbeError::TransientAccessDenied);
    }

    pub fn push(&self, result: Result<ClipboardSnapshot, ProbeError>) {
        self.script.lock().unwrap().push_back(result);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ClipboardProbePort for FakeClipboard {
    fn read_native(&self) -> Result<ClipboardSnapshot, ProbeError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        self.current.lock().unwrap().clone()
    }

    fn backend_name(&self) -> &'static str {
        "fake"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observed {
    Added(EntryId),
    Deleted(EntryId),
    Cleared,
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Observed>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<Observed> {
        self.events.lock().unwrap().clone()
    }
}

impl HistoryObserverPort for RecordingObserver {
    fn on_entry_added(&self, entry: &ClipboardEntry) {
        self.events.lock().unwrap().push(Observed::Added(entry.id.clone()));
    }

    fn on_entry_deleted(&self, id: &EntryId) {
        self.events.lock().unwrap().push(Observed::Deleted(id.clone()));
    }

    fn on_all_cleared(&self) {
        self.events.lock().unwrap().push(Observed::Cleared);
    }
}

/// Clock replaying fixed readings, then repeating the last one.
pub struct ScriptedClock {
    readings: Mutex<VecDeque<i64>>,
    last: Mutex<i64>,
}

impl ScriptedClock {
    pub fn new(readings: &[i64]) -> Self {
        Self {
            readings: Mutex::new(readings.iter().copied().collect()),
            last: Mutex::new(0),
        }
    }
}

impl ClockPort for ScriptedClock {
    fn now_ms(&self) -> i64 {
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.readings.lock().unwrap().pop_front() {
            *last = next;
        }
        *last
    }
}

pub struct Harness {
    pub service: Arc<ClipboardHistoryService>,
    pub clipboard: Arc<FakeClipboard>,
    pub store: Arc<FileEntryStore>,
    pub blobs: Arc<FsBlobStore>,
    pub observer: Arc<RecordingObserver>,
    _dir: tempfile::TempDir,
}

pub fn fast_settings() -> HistorySettings {
    HistorySettings {
        poll_interval_ms: 5,
        retry_delay_ms: 2,
        ..HistorySettings::default()
    }
}

pub fn harness(settings: HistorySettings) -> Harness {
    harness_with_clock(settings, Arc::new(SystemClock))
}

pub fn harness_with_clock(settings: HistorySettings, clock: Arc<dyn ClockPort>) -> Harness {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let clipboard = Arc::new(FakeClipboard::new());
    let store = Arc::new(FileEntryStore::in_memory());
    let blobs = Arc::new(FsBlobStore::new(dir.path().join("blobs")));
    let observer = Arc::new(RecordingObserver::default());

    let service = ClipboardHistoryService::new(
        HistoryDeps {
            probe: clipboard.clone(),
            metadata_store: store.clone(),
            blob_store: blobs.clone(),
            observer: observer.clone(),
            clock,
        },
        settings,
    )
    .unwrap();

    Harness {
        service: Arc::new(service),
        clipboard,
        store,
        blobs,
        observer,
        _dir: dir,
    }
}

impl Harness {
    pub async fn count(&self) -> usize {
        self.store.count_all().await.unwrap()
    }

    pub async fn texts(&self) -> Vec<String> {
        self.service
            .list_history()
            .await
            .unwrap()
            .iter()
            .filter_map(|e| e.text_content().map(str::to_string))
            .collect()
    }

    /// Poll until the store holds `n` entries or `WAIT` elapses.
    pub async fn wait_for_count(&self, n: usize) -> bool {
        let deadline = Instant::now() + WAIT;
        while Instant::now() < deadline {
            if self.count().await == n {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }

    pub async fn wait_for_reads(&self, n: usize) {
        let deadline = Instant::now() + WAIT;
        while self.clipboard.reads() < n && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

/// PNG signature followed by `seed`, enough for format sniffing.
pub fn png_bytes(seed: u8) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend_from_slice(&[seed; 32]);
    bytes
}
