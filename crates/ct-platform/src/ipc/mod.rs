mod event;

pub use event::PlatformEvent;
