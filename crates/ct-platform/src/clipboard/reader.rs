use std::sync::Arc;

use ct_core::clipboard::ClipboardSnapshot;
use ct_core::ports::{ClipboardProbePort, ProbeError};
use ct_core::settings::RetryConfig;
use tokio::task::spawn_blocking;

/// Read the clipboard once, retrying transient lock failures.
///
/// Each attempt runs on a blocking thread. Up to `retry.max_attempts` attempts
/// are made, sleeping `retry.retry_delay` between them, but only while the
/// probe reports [`ProbeError::TransientAccessDenied`]. Every failure ends in
/// [`ClipboardSnapshot::Unreadable`]; this function never returns an error.
pub async fn read_current(
    probe: Arc<dyn ClipboardProbePort>,
    retry: &RetryConfig,
) -> ClipboardSnapshot {
    let max_attempts = retry.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let p = probe.clone();
        let result = match spawn_blocking(move || p.read_native()).await {
            Ok(result) => result,
            Err(join_err) => {
                log::error!(
                    "clipboard probe '{}' panicked: {}",
                    probe.backend_name(),
                    join_err
                );
                return ClipboardSnapshot::Unreadable;
            }
        };

        match result {
            Ok(snapshot) => return snapshot,
            Err(ProbeError::TransientAccessDenied) if attempt < max_attempts => {
                log::debug!(
                    "clipboard locked (attempt {}/{}), retrying in {:?}",
                    attempt,
                    max_attempts,
                    retry.retry_delay
                );
                tokio::time::sleep(retry.retry_delay).await;
            }
            Err(ProbeError::TransientAccessDenied) => {
                log::warn!(
                    "clipboard still locked after {} attempts, skipping this read",
                    max_attempts
                );
            }
            Err(ProbeError::UnsupportedFormat(formats)) => {
                log::debug!("clipboard holds unsupported formats: {}", formats);
                return ClipboardSnapshot::Unreadable;
            }
            Err(ProbeError::Unavailable(reason)) => {
                log::warn!(
                    "clipboard backend '{}' unavailable: {}",
                    probe.backend_name(),
                    reason
                );
                return ClipboardSnapshot::Unreadable;
            }
        }
    }

    ClipboardSnapshot::Unreadable
}
