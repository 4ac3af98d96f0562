//! # History Dependencies / 历史服务依赖
//!
//! Dependency grouping for [`ClipboardHistoryService`](crate::ClipboardHistoryService)
//! construction.
//!
//! **Note / 注意**: This is NOT a Builder pattern; it only groups parameters.
//! 这不是 Builder 模式，仅用于参数打包。

use std::sync::Arc;
use ct_core::ports::*;

/// Collaborators consumed by the history service.
pub struct HistoryDeps {
    pub probe: Arc<dyn ClipboardProbePort>,
    pub metadata_store: Arc<dyn EntryMetadataStorePort>,
    pub blob_store: Arc<dyn BlobStorePort>,
    pub observer: Arc<dyn HistoryObserverPort>,
    pub clock: Arc<dyn ClockPort>,
}
