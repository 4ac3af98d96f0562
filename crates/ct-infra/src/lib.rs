//! # ct-infra
//!
//! Reference adapters for the cliptrail ports: file blob store, JSON-file
//! metadata store, system clock, and the settings loader.

pub mod fs;
pub mod settings;
pub mod store;
pub mod time;

pub use fs::FsBlobStore;
pub use store::FileEntryStore;
pub use time::SystemClock;
