//! Product image storage.

use crate::dto::ImageUpload;
use async_trait::async_trait;
use shopsmart_config::StorageConfig;
use shopsmart_core::{Interface, ShopError, ShopResult};
use std::path::PathBuf;
use std::io::ErrorKind;
use tracing::{debug, info};
use uuid::Uuid;

/// Stores uploaded images and returns their public URL.
#[async_trait]
pub trait ImageStorage: Interface + Send + Sync {
    async fn store(&self, upload: ImageUpload) -> ShopResult<String>;

    /// Deletes an image previously returned by [`ImageStorage::store`].
    /// Unknown URLs are ignored.
    async fn remove(&self, url: &str) -> ShopResult<()>;
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// Writes images to a local directory served under a public base URL.
#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    upload_dir: PathBuf,
    public_base_url: String,
    allowed_content_types: Vec<String>,
}

impl LocalImageStorage {
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            upload_dir: PathBuf::from(&config.upload_dir),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            allowed_content_types: config.allowed_content_types.clone(),
        }
    }

    fn validate(&self, upload: &ImageUpload) -> ShopResult<&'static str> {
        if upload.bytes.is_empty() {
            return Err(ShopError::validation("image: file is empty"));
        }
        if !self.allowed_content_types.iter().any(|t| t == &upload.content_type) {
            return Err(ShopError::validation(format!(
                "image: unsupported content type '{}'",
                upload.content_type
            )));
        }
        extension_for(&upload.content_type).ok_or_else(|| {
            ShopError::validation(format!("image: unsupported content type '{}'", upload.content_type))
        })
    }

    /// Local path of a URL issued by this storage, if it is one.
    fn path_for(&self, url: &str) -> Option<PathBuf> {
        let file_name = url.strip_prefix(&self.public_base_url)?.strip_prefix('/')?;
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            return None;
        }
        Some(self.upload_dir.join(file_name))
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn store(&self, upload: ImageUpload) -> ShopResult<String> {
        let extension = self.validate(&upload)?;
        let file_name = format!("{}.{extension}", Uuid::now_v7());

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| ShopError::external("storage", format!("Failed to create upload dir: {e}")))?;
        tokio::fs::write(self.upload_dir.join(&file_name), &upload.bytes)
            .await
            .map_err(|e| ShopError::external("storage", format!("Failed to write image: {e}")))?;

        debug!("Stored upload '{}' as {}", upload.file_name, file_name);
        info!("Image stored: {} ({} bytes)", file_name, upload.bytes.len());
        Ok(format!("{}/{file_name}", self.public_base_url))
    }

    async fn remove(&self, url: &str) -> ShopResult<()> {
        let Some(path) = self.path_for(url) else {
            return Ok(());
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Image removed: {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ShopError::external("storage", format!("Failed to remove image: {e}"))),
        }
    }
}
