mod service;

pub use service::ClipboardHistoryService;
