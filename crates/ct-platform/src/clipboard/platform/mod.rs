mod native;
mod wayland;

use anyhow::Result;
use ct_core::clipboard::ClipboardSnapshot;
use ct_core::ports::{ClipboardProbePort, ProbeError};

pub use native::NativeClipboardProbe;
pub use wayland::WaylandClipboardProbe;

use crate::capability::{detect_probe_backend, ProbeBackend};

/// The clipboard probe variant chosen for this machine at startup.
pub enum SystemClipboardProbe {
    Native(NativeClipboardProbe),
    Wayland(WaylandClipboardProbe),
}

impl SystemClipboardProbe {
    /// Build the probe for the detected backend.
    pub fn detect() -> Result<Self> {
        Self::for_backend(detect_probe_backend())
    }

    pub fn for_backend(backend: ProbeBackend) -> Result<Self> {
        Ok(match backend {
            ProbeBackend::Native => SystemClipboardProbe::Native(NativeClipboardProbe::new()?),
            ProbeBackend::Wayland => SystemClipboardProbe::Wayland(WaylandClipboardProbe::new()),
        })
    }
}

impl ClipboardProbePort for SystemClipboardProbe {
    fn read_native(&self) -> Result<ClipboardSnapshot, ProbeError> {
        match self {
            SystemClipboardProbe::Native(probe) => probe.read_native(),
            SystemClipboardProbe::Wayland(probe) => probe.read_native(),
        }
    }

    fn backend_name(&self) -> &'static str {
        match self {
            SystemClipboardProbe::Native(probe) => probe.backend_name(),
            SystemClipboardProbe::Wayland(probe) => probe.backend_name(),
        }
    }
}
