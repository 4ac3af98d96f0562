use std::path::{Path, PathBuf};

use ct_core::settings::{HistorySettings, SettingsError};
use thiserror::Error;
use tracing::{debug, info};

use crate::fs::app_data_dir::{app_data_dir, settings_file};

/// Environment variable prefix for overrides, e.g. `CLIPTRAIL_POLL_INTERVAL_MS=250`.
pub const ENV_PREFIX: &str = "CLIPTRAIL";

#[derive(Debug, Error)]
pub enum SettingsLoadError {
    #[error("failed to read settings: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid settings: {0}")]
    Invalid(#[from] SettingsError),
}

/// Default settings file location: `<data dir>/cliptrail/settings.toml`.
pub fn default_settings_path() -> Option<PathBuf> {
    app_data_dir().ok().map(|dir| settings_file(&dir))
}

/// Load history settings from an optional TOML file plus `CLIPTRAIL_*`
/// environment overrides, then validate them.
///
/// A missing file is not an error; every field falls back to its default.
pub fn load_history_settings(path: Option<&Path>) -> Result<HistorySettings, SettingsLoadError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        debug!(path = %path.display(), "Loading settings file");
        builder = builder.add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(false),
        );
    }

    let settings: HistorySettings = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()?
        .try_deserialize()?;

    settings.validate()?;

    info!(
        poll_interval_ms = settings.poll_interval_ms,
        max_items = settings.max_items,
        max_retries = settings.max_retries,
        "Loaded history settings"
    );
    Ok(settings)
}
