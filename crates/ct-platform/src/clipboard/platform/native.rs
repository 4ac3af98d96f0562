use std::sync::{Mutex, TryLockError};

use anyhow::{anyhow, Result};
use clipboard_rs::ClipboardContext;
use ct_core::clipboard::ClipboardSnapshot;
use ct_core::ports::{ClipboardProbePort, ProbeError};
use tracing::{debug, debug_span};

use super::super::common::CommonClipboardImpl;

/// Clipboard probe backed by clipboard-rs (Win32, AppKit, X11).
pub struct NativeClipboardProbe {
    inner: Mutex<ClipboardContext>,
}

impl NativeClipboardProbe {
    pub fn new() -> Result<Self> {
        let context = ClipboardContext::new()
            .map_err(|e| anyhow!("Failed to create clipboard context: {}", e))?;
        Ok(Self {
            inner: Mutex::new(context),
        })
    }
}

impl ClipboardProbePort for NativeClipboardProbe {
    fn read_native(&self) -> Result<ClipboardSnapshot, ProbeError> {
        let span = debug_span!("platform.native.read_clipboard");
        span.in_scope(|| {
            // A read still running on another blocking thread counts as lock contention.
            let ctx = match self.inner.try_lock() {
                Ok(ctx) => ctx,
                Err(TryLockError::WouldBlock) => return Err(ProbeError::TransientAccessDenied),
                Err(TryLockError::Poisoned(_)) => {
                    return Err(ProbeError::Unavailable(
                        "clipboard context mutex poisoned".to_string(),
                    ))
                }
            };
            let snapshot = CommonClipboardImpl::read_snapshot(&ctx)?;

            debug!(
                kind = ?snapshot.kind(),
                size_bytes = snapshot.size_bytes(),
                "Read system clipboard"
            );

            Ok(snapshot)
        })
    }

    fn backend_name(&self) -> &'static str {
        "native"
    }
}
