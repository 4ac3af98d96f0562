use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use ct_app::{ClipboardHistoryService, HistoryDeps};
use ct_core::ports::ClipboardProbePort;
use ct_core::settings::HistorySettings;
use ct_infra::fs::app_data_dir::{app_data_dir, blob_dir, history_file};
use ct_infra::{FileEntryStore, FsBlobStore, SystemClock};
use ct_platform::clipboard::SystemClipboardProbe;
use tracing::info;

use super::observer::LoggingHistoryObserver;

/// Build the history service over the system clipboard and the on-disk stores
/// under the application data directory.
pub async fn build_history_service(settings: HistorySettings) -> Result<ClipboardHistoryService> {
    let data_dir = app_data_dir()?;
    let probe = SystemClipboardProbe::detect().context("Failed to open the system clipboard")?;
    info!(backend = probe.backend_name(), "Clipboard probe selected");

    build_with_probe(&data_dir, Arc::new(probe), settings).await
}

/// Wire the service with an explicit probe and data directory.
pub async fn build_with_probe(
    data_dir: &Path,
    probe: Arc<dyn ClipboardProbePort>,
    settings: HistorySettings,
) -> Result<ClipboardHistoryService> {
    let metadata_store = FileEntryStore::open(history_file(data_dir)).await?;
    let blob_store = FsBlobStore::new(blob_dir(data_dir));
    info!(data_dir = %data_dir.display(), "History storage ready");

    let deps = HistoryDeps {
        probe,
        metadata_store: Arc::new(metadata_store),
        blob_store: Arc::new(blob_store),
        observer: Arc::new(LoggingHistoryObserver),
        clock: Arc::new(SystemClock),
    };
    Ok(ClipboardHistoryService::new(deps, settings)?)
}
