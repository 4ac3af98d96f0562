pub mod app_data_dir;
pub mod blob_store;

pub use blob_store::FsBlobStore;
