mod common;
pub mod platform;
mod reader;

pub use platform::{NativeClipboardProbe, SystemClipboardProbe, WaylandClipboardProbe};
pub use reader::read_current;
