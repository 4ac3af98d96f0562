//! # ct-platform
//!
//! Platform-specific implementations for cliptrail.
//!
//! This crate contains the code that touches the operating system clipboard:
//! probe backends, backend detection, the retrying reader, and the polling
//! change monitor that feeds clipboard events to the application layer.

pub mod capability;
pub mod clipboard;
pub mod ipc;
pub mod runtime;
