use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use ct_core::ids::BlobRef;
use ct_core::ports::BlobStorePort;
use tokio::fs;
use tracing::debug;

const FALLBACK_EXTENSION: &str = "bin";

/// Blob store keeping each image as one file: `<root>/<uuid>.<ext>`.
///
/// The extension comes from sniffing the image bytes (`png`, `jpg`, `bmp`, ...)
/// and falls back to `bin` for unrecognised data.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_of(&self, blob: &BlobRef) -> Result<PathBuf> {
        validate_blob_ref(blob)?;
        Ok(self.root.join(blob.as_str()))
    }
}

fn extension_for(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .ok()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or(FALLBACK_EXTENSION)
}

/// Blob refs are `<uuid>.<ext>`; anything else (e.g. path separators) is rejected.
fn validate_blob_ref(blob: &BlobRef) -> Result<()> {
    let Some((stem, ext)) = blob.as_str().split_once('.') else {
        bail!("malformed blob ref: {}", blob);
    };
    uuid::Uuid::parse_str(stem).with_context(|| format!("malformed blob ref: {}", blob))?;
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        bail!("malformed blob ref: {}", blob);
    }
    Ok(())
}

#[async_trait]
impl BlobStorePort for FsBlobStore {
    async fn save(&self, bytes: &[u8]) -> Result<BlobRef> {
        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("create blob dir failed: {}", self.root.display()))?;

        let blob = BlobRef::from(format!(
            "{}.{}",
            uuid::Uuid::new_v4(),
            extension_for(bytes)
        ));
        let path = self.root.join(blob.as_str());
        fs::write(&path, bytes)
            .await
            .with_context(|| format!("write blob failed: {}", path.display()))?;

        debug!(blob = %blob, size_bytes = bytes.len(), "Saved blob");
        Ok(blob)
    }

    async fn read(&self, blob: &BlobRef) -> Result<Vec<u8>> {
        let path = self.path_of(blob)?;
        fs::read(&path)
            .await
            .with_context(|| format!("read blob failed: {}", path.display()))
    }

    async fn delete(&self, blob: &BlobRef) -> Result<()> {
        let path = self.path_of(blob)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(blob = %blob, "Deleted blob");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("delete blob failed: {}", path.display()))
            }
        }
    }

    async fn list(&self) -> Result<Vec<BlobRef>> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("list blob dir failed: {}", self.root.display()))
            }
        };

        let mut blobs = Vec::new();
        while let Some(item) = dir.next_entry().await? {
            let Some(name) = item.file_name().to_str().map(BlobRef::from) else {
                continue;
            };
            // Foreign files in the directory are left alone.
            if validate_blob_ref(&name).is_ok() {
                blobs.push(name);
            }
        }
        Ok(blobs)
    }
}
