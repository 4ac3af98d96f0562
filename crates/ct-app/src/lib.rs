//! # ct-app
//!
//! Use cases and the background history service for cliptrail.

pub mod deps;
pub mod history;
pub mod usecases;

pub use deps::HistoryDeps;
pub use history::ClipboardHistoryService;
pub use usecases::{CaptureError, CaptureOutcome, EvictionReport, SweepReport};

// Re-exported so callers of the service don't need ct-platform directly.
pub use ct_platform::runtime::clipboard::{MonitorState, StopOutcome};
