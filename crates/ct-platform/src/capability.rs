//! Platform capability detection for clipboard access.
//!
//! Decides at startup which clipboard probe backend this machine should use.

use std::path::Path;

/// Clipboard probe backend available on the current platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeBackend {
    /// clipboard-rs (Windows clipboard, macOS pasteboard, X11 selections)
    Native,
    /// `wl-paste` subprocess for Wayland sessions without X11 clipboard access
    Wayland,
}

/// Detect the clipboard probe backend of the current platform.
///
/// # Detection Logic
///
/// - **macOS / Windows**: always `Native`
/// - **Linux**:
///   - Wayland session (`WAYLAND_DISPLAY` set or `XDG_SESSION_TYPE=wayland`) and
///     `wl-paste` found on `PATH` → `Wayland`
///   - Otherwise → `Native` (X11, including XWayland)
pub fn detect_probe_backend() -> ProbeBackend {
    #[cfg(target_os = "linux")]
    {
        if is_wayland_session() {
            if has_program_on_path("wl-paste") {
                log::info!("Wayland session detected, reading clipboard through wl-paste");
                return ProbeBackend::Wayland;
            }
            log::warn!("Wayland session detected but wl-paste not found, falling back to X11");
        }
        ProbeBackend::Native
    }

    #[cfg(not(target_os = "linux"))]
    {
        ProbeBackend::Native
    }
}

/// Detect a Wayland desktop session from the environment.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn is_wayland_session() -> bool {
    if std::env::var_os("WAYLAND_DISPLAY").is_some_and(|v| !v.is_empty()) {
        return true;
    }
    std::env::var("XDG_SESSION_TYPE")
        .map(|v| v.eq_ignore_ascii_case("wayland"))
        .unwrap_or(false)
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn has_program_on_path(program: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| is_file(&dir.join(program)))
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}
