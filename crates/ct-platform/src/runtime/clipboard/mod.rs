mod monitor;

pub use monitor::{
    ClipboardChangeMonitor, MonitorConfig, MonitorState, ObservedFingerprint, StopOutcome,
};
