use tokio::sync::mpsc;

use crate::ipc::PlatformEvent;

pub type PlatformEventSender = mpsc::Sender<PlatformEvent>;
pub type PlatformEventReceiver = mpsc::Receiver<PlatformEvent>;

/// Bounded event channel between the change monitor and its consumer.
pub fn platform_event_channel(capacity: usize) -> (PlatformEventSender, PlatformEventReceiver) {
    mpsc::channel(capacity)
}
