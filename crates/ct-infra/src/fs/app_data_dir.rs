use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "cliptrail";

/// Get the cliptrail application data root directory.
///
/// 获取 cliptrail 应用数据根目录。
///
/// # Platform-specific Paths / 平台特定路径
/// - macOS: ~/Library/Application Support/cliptrail
/// - Windows: %APPDATA%\cliptrail
/// - Linux: $XDG_DATA_HOME/cliptrail or ~/.local/share/cliptrail
///
/// This function does not create the directory; the caller decides when to.
pub fn app_data_dir() -> Result<PathBuf> {
    let base_dir =
        get_platform_data_dir().context("Failed to get platform-specific data directory")?;

    Ok(base_dir.join(APP_DIR_NAME))
}

/// Image blob directory under `data_dir`
pub fn blob_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("blobs")
}

/// JSON file holding the history metadata
pub fn history_file(data_dir: &Path) -> PathBuf {
    data_dir.join("history.json")
}

pub fn settings_file(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.toml")
}

/// 根据平台获取基础数据目录
fn get_platform_data_dir() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        // 优先使用 XDG_DATA_HOME，如果不存在则使用 ~/.local/share
        if let Some(xdg_data_home) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(xdg_data_home));
        }
    }

    dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Unable to get platform data directory"))
}
