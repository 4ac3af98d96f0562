use std::time::Duration;

use super::model::*;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 100;
pub const DEFAULT_MAX_ITEMS: usize = 1000;
pub const DEFAULT_STOP_GRACE_MS: u64 = 2000;

impl Default for CaptureFilters {
    fn default() -> Self {
        Self {
            capture_text: true,
            capture_images: true,
            capture_links: true,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            max_items: DEFAULT_MAX_ITEMS,
            capture_text: true,
            capture_images: true,
            capture_links: true,
            stop_grace_ms: DEFAULT_STOP_GRACE_MS,
        }
    }
}
