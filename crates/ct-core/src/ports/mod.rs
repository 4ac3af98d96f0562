//! Port interfaces for the application layer
//!
//! Ports define the contract between the capture logic (use cases) and the
//! collaborators that live outside this core: the OS clipboard, the metadata
//! store, the blob store, and any observer of history changes. Keeping them as
//! traits lets the core stay independent of concrete backends.
//!
//! ## Port Placement Guidelines
//!
//! Before adding a new port here, ask:
//!
//! 1. **Does this port represent a capability the core consumes?**
//! 2. **Will more than one use case depend on it?**
//! 3. **Is it implemented by the infrastructure or platform layer?**
//!
//! If all three answers are **yes**, it belongs in `ct-core/ports`.

mod blob_store;
mod clipboard_probe;
mod clock;
mod entry_metadata_store;
pub mod errors;
mod history_observer;

pub use blob_store::BlobStorePort;
pub use clipboard_probe::ClipboardProbePort;
pub use clock::*;
pub use entry_metadata_store::EntryMetadataStorePort;
pub use errors::ProbeError;
pub use history_observer::{HistoryObserverPort, NoopHistoryObserver};
