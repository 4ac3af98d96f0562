#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use ct_core::clipboard::ClipboardSnapshot;
use ct_core::ports::{ClipboardProbePort, ProbeError};

/// Probe that replays a fixed script of read results, then repeats `fallback`.
pub struct ScriptedProbe {
    script: Mutex<VecDeque<Result<ClipboardSnapshot, ProbeError>>>,
    fallback: Result<ClipboardSnapshot, ProbeError>,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new(
        script: Vec<Result<ClipboardSnapshot, ProbeError>>,
        fallback: Result<ClipboardSnapshot, ProbeError>,
    ) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn steady(snapshot: ClipboardSnapshot) -> Self {
        Self::new(Vec::new(), Ok(snapshot))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ClipboardProbePort for ScriptedProbe {
    fn read_native(&self) -> Result<ClipboardSnapshot, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }

    fn backend_name(&self) -> &'static str {
        "scripted"
    }
}

pub fn text(s: &str) -> Result<ClipboardSnapshot, ProbeError> {
    Ok(ClipboardSnapshot::text(s))
}

pub fn locked() -> Result<ClipboardSnapshot, ProbeError> {
    Err(ProbeError::TransientAccessDenied)
}
