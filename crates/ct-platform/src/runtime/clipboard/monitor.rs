//! Clipboard change monitor
//!
//! Owns the polling loop that turns OS clipboard state into
//! `PlatformEvent::ClipboardChanged` events.
//!
//! ```text
//! Local Clipboard
//!      ↓
//! ClipboardProbePort  (read_current, bounded retries)
//!      ↓
//! ClipboardChangeMonitor   (this module)
//!      ↓
//! PlatformEvent channel
//!      ↓
//! History service consumer
//! ```
//!
//! ## Change Detection
//!
//! The worker keeps the fingerprint of the last snapshot it observed and only
//! emits when the fingerprint changes. This is a cheap pre-filter so an
//! unchanged clipboard is not re-processed every tick; consecutive-duplicate
//! suppression against persisted history happens downstream.
//!
//! The cached fingerprint is shared through [`ObservedFingerprint`]. A consumer
//! that failed to persist an event forgets its fingerprint, and the worker
//! emits the same content again on its next tick.
//!
//! ## Lifecycle
//!
//! `Stopped --start()--> Running --stop()--> Stopped`. Both transitions are
//! idempotent. Exactly one worker task exists while running. Stopping is
//! cooperative: the worker observes the cancellation token while sleeping,
//! while reading and while handing an event to the channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use ct_core::clipboard::Fingerprint;
use ct_core::ports::ClipboardProbePort;
use ct_core::settings::RetryConfig;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::clipboard::read_current;
use crate::ipc::PlatformEvent;
use crate::runtime::event_bus::PlatformEventSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Stopped,
    Running,
}

/// How a call to [`ClipboardChangeMonitor::stop`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The monitor was not running.
    AlreadyStopped,
    /// The worker exited within the grace period.
    Graceful,
    /// The worker did not exit in time and was abandoned.
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub poll_interval: Duration,
    pub retry: RetryConfig,
}

/// Fingerprint of the last snapshot the worker emitted.
#[derive(Debug, Clone, Default)]
pub struct ObservedFingerprint(Arc<Mutex<Option<Fingerprint>>>);

impl ObservedFingerprint {
    /// Drop `fingerprint` if it is still the last observed one, so the next
    /// read of that content is emitted again. Returns whether it was dropped.
    pub async fn forget(&self, fingerprint: &Fingerprint) -> bool {
        let mut observed = self.0.lock().await;
        if observed.as_ref() == Some(fingerprint) {
            *observed = None;
            true
        } else {
            false
        }
    }

    /// Record `fingerprint`; `false` when it was already the last observed one.
    async fn observe(&self, fingerprint: Fingerprint) -> bool {
        let mut observed = self.0.lock().await;
        if *observed == Some(fingerprint) {
            return false;
        }
        *observed = Some(fingerprint);
        true
    }

    async fn reset(&self) {
        *self.0.lock().await = None;
    }
}

struct Worker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct ClipboardChangeMonitor {
    probe: Arc<dyn ClipboardProbePort>,
    running: Arc<AtomicBool>,
    observed: ObservedFingerprint,
    worker: Mutex<Option<Worker>>,
}

impl ClipboardChangeMonitor {
    pub fn new(probe: Arc<dyn ClipboardProbePort>) -> Self {
        Self {
            probe,
            running: Arc::new(AtomicBool::new(false)),
            observed: ObservedFingerprint::default(),
            worker: Mutex::new(None),
        }
    }

    /// Handle to the change cache, shared with the worker across restarts.
    pub fn observed(&self) -> ObservedFingerprint {
        self.observed.clone()
    }

    pub fn state(&self) -> MonitorState {
        if self.running.load(Ordering::Acquire) {
            MonitorState::Running
        } else {
            MonitorState::Stopped
        }
    }

    /// Spawn the poll worker. A no-op while already running.
    pub async fn start(&self, config: MonitorConfig, tx: PlatformEventSender) -> Result<()> {
        // Hold the slot lock across the transition so a concurrent stop() sees the worker.
        let mut slot = self.worker.lock().await;

        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(()); // 幂等
        }
        self.observed.reset().await;

        let cancel = CancellationToken::new();
        let span = info_span!(
            "platform.clipboard_monitor",
            backend = self.probe.backend_name(),
            poll_interval_ms = config.poll_interval.as_millis() as u64,
        );
        let handle = tokio::spawn(
            poll_loop(
                self.probe.clone(),
                config,
                tx,
                cancel.clone(),
                self.running.clone(),
                self.observed.clone(),
            )
            .instrument(span),
        );

        *slot = Some(Worker { cancel, handle });
        info!(
            poll_interval_ms = config.poll_interval.as_millis() as u64,
            max_attempts = config.retry.max_attempts,
            "Clipboard monitor started"
        );
        Ok(())
    }

    /// Signal the worker to exit and wait up to `grace` for it.
    ///
    /// After return the monitor is `Stopped` whatever the outcome; a worker
    /// that overran the grace period is aborted.
    pub async fn stop(&self, grace: Duration) -> StopOutcome {
        let mut slot = self.worker.lock().await;
        let was_running = self.running.swap(false, Ordering::AcqRel);

        let Some(Worker { cancel, mut handle }) = slot.take() else {
            return StopOutcome::AlreadyStopped;
        };
        cancel.cancel();

        let outcome = match tokio::time::timeout(grace, &mut handle).await {
            Ok(Ok(())) => StopOutcome::Graceful,
            Ok(Err(join_err)) => {
                warn!(error = %join_err, "Clipboard monitor worker ended abnormally");
                StopOutcome::Graceful
            }
            Err(_) => {
                warn!(
                    grace_ms = grace.as_millis() as u64,
                    "Clipboard monitor worker did not stop in time, abandoning it"
                );
                handle.abort();
                StopOutcome::Abandoned
            }
        };

        if was_running {
            info!(?outcome, "Clipboard monitor stopped");
            outcome
        } else {
            // Worker had already exited on its own (event channel closed).
            StopOutcome::AlreadyStopped
        }
    }
}

async fn poll_loop(
    probe: Arc<dyn ClipboardProbePort>,
    config: MonitorConfig,
    tx: PlatformEventSender,
    cancel: CancellationToken,
    running: Arc<AtomicBool>,
    observed: ObservedFingerprint,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(config.poll_interval) => {}
        }

        let snapshot = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            snapshot = read_current(probe.clone(), &config.retry) => snapshot,
        };

        let Some(fingerprint) = snapshot.fingerprint() else {
            continue;
        };
        if !observed.observe(fingerprint).await {
            continue;
        }

        debug!(
            kind = ?snapshot.kind(),
            fingerprint = %fingerprint.short(),
            "Clipboard content changed"
        );

        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = tx.send(PlatformEvent::ClipboardChanged { snapshot }) => sent,
        };
        if sent.is_err() {
            warn!("Clipboard event consumer is gone, stopping monitor");
            running.store(false, Ordering::Release);
            break;
        }
    }

    debug!("Clipboard monitor worker exited");
}
