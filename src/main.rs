mod bootstrap;

use std::path::PathBuf;

use anyhow::Result;
use ct_infra::settings::{default_settings_path, load_history_settings};
use tracing::{error, info};

/// Usage: `cliptrail [SETTINGS_FILE]`
///
/// Without an argument the settings file is read from the application data
/// directory when present; `CLIPTRAIL_*` environment variables override it.
#[tokio::main]
async fn main() -> Result<()> {
    bootstrap::tracing::init_tracing_subscriber()?;

    let settings_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(default_settings_path);
    let settings = load_history_settings(settings_path.as_deref())?;

    let service = bootstrap::wiring::build_history_service(settings).await?;
    service.start_with_settings().await?;
    info!("cliptrail is recording clipboard history, press Ctrl+C to stop");

    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
    }

    info!("Shutting down");
    service.stop().await;
    Ok(())
}
