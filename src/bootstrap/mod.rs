pub mod observer;
pub mod tracing;
pub mod wiring;
