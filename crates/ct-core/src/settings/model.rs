use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::SettingsError;
use crate::clipboard::ContentType;

pub const MAX_ITEMS_UPPER_BOUND: usize = 10_000;

/// Which classified content types are captured. A disabled type is classified
/// and then dropped before any duplicate check or storage work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureFilters {
    pub capture_text: bool,
    pub capture_images: bool,
    pub capture_links: bool,
}

impl CaptureFilters {
    pub fn allows(&self, content_type: ContentType) -> bool {
        match content_type {
            ContentType::Text => self.capture_text,
            ContentType::Link => self.capture_links,
            ContentType::Image => self.capture_images,
        }
    }
}

/// Retry budget for one clipboard read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of read attempts, always at least 1.
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl RetryConfig {
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }
}

/// Settings consumed by the history service.
///
/// Every field has a default so partial config files deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub poll_interval_ms: u64,
    /// Attempt budget per read, counting the first attempt. `0` behaves like `1`.
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub max_items: usize,
    pub capture_text: bool,
    pub capture_images: bool,
    pub capture_links: bool,
    /// How long `stop()` waits for the poll worker before abandoning it.
    pub stop_grace_ms: u64,
}

impl HistorySettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.poll_interval_ms < 1 {
            return Err(SettingsError::PollIntervalTooSmall(self.poll_interval_ms));
        }
        if self.max_items < 1 || self.max_items > MAX_ITEMS_UPPER_BOUND {
            return Err(SettingsError::MaxItemsOutOfRange {
                value: self.max_items,
                max: MAX_ITEMS_UPPER_BOUND,
            });
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn stop_grace(&self) -> Duration {
        Duration::from_millis(self.stop_grace_ms)
    }

    pub fn retry(&self) -> RetryConfig {
        RetryConfig::new(self.max_retries, Duration::from_millis(self.retry_delay_ms))
    }

    pub fn filters(&self) -> CaptureFilters {
        CaptureFilters {
            capture_text: self.capture_text,
            capture_images: self.capture_images,
            capture_links: self.capture_links,
        }
    }

    pub fn set_filters(&mut self, filters: CaptureFilters) {
        self.capture_text = filters.capture_text;
        self.capture_images = filters.capture_images;
        self.capture_links = filters.capture_links;
    }
}
