mod loader;

pub use loader::{default_settings_path, load_history_settings, SettingsLoadError, ENV_PREFIX};
