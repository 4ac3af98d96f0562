use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::ids::BlobRef;

#[async_trait]
pub trait BlobStorePort: Send + Sync {
    /// Persist image bytes and return an opaque handle to them.
    async fn save(&self, bytes: &[u8]) -> Result<BlobRef>;

    async fn read(&self, blob: &BlobRef) -> Result<Vec<u8>>;

    /// Remove the blob. Removing an already missing blob succeeds.
    async fn delete(&self, blob: &BlobRef) -> Result<()>;

    /// Every blob currently held, referenced or not.
    async fn list(&self) -> Result<Vec<BlobRef>>;
}

#[async_trait]
impl<T: BlobStorePort + ?Sized> BlobStorePort for Arc<T> {
    async fn save(&self, bytes: &[u8]) -> Result<BlobRef> {
        (**self).save(bytes).await
    }

    async fn read(&self, blob: &BlobRef) -> Result<Vec<u8>> {
        (**self).read(blob).await
    }

    async fn delete(&self, blob: &BlobRef) -> Result<()> {
        (**self).delete(blob).await
    }

    async fn list(&self) -> Result<Vec<BlobRef>> {
        (**self).list().await
    }
}
