// PlatformEvent 只描述「事实」，不描述「意图」
// ✅ ClipboardChanged
// ❌ SaveClipboardRequested

use ct_core::clipboard::ClipboardSnapshot;

#[derive(Debug, Clone)]
pub enum PlatformEvent {
    /// 本地剪切板发生变化 (content differs from the previous observed read)
    ClipboardChanged { snapshot: ClipboardSnapshot },
}
