pub mod defaults;
mod error;
pub mod model;

pub use error::SettingsError;
pub use model::{CaptureFilters, HistorySettings, RetryConfig, MAX_ITEMS_UPPER_BOUND};
