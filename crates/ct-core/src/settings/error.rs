use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("poll_interval_ms must be at least 1, got {0}")]
    PollIntervalTooSmall(u64),

    #[error("max_items must be between 1 and {max}, got {value}")]
    MaxItemsOutOfRange { value: usize, max: usize },
}
