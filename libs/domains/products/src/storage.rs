//! Blob storage for product images.
//!
//! Keys look like `products/1718000000_3f2a9c1e_mouse.png`: upload time,
//! eight random hex characters and the sanitized client file name with
//! the extension of the detected image type. A replacement upload
//! therefore never reuses the key of the image it replaces.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::image::ImageKind;

/// Directory every product image key lives under
pub const IMAGE_DIRECTORY: &str = "products";

const MAX_STEM_CHARS: usize = 64;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Public URL of a stored image
pub fn image_url(key: &str, public_base_url: &str) -> String {
    format!(
        "{}/{}",
        public_base_url.trim_end_matches('/'),
        key.trim_start_matches('/')
    )
}

/// Keep a cleaned, capped stem of the client name and append the extension of the sniffed type
fn sanitize_file_name(file_name: &str, kind: ImageKind) -> String {
    // Browsers on Windows may send a full path
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();

    let stem = match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    };

    let stem: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_STEM_CHARS)
        .collect();
    let stem = stem.trim_matches('.');
    let stem = if stem.is_empty() { "image" } else { stem };

    format!("{}.{}", stem, kind.extension())
}

/// Generate a fresh key for an upload
pub fn generate_key(file_name: Option<&str>, kind: ImageKind) -> String {
    let unix_seconds = chrono::Utc::now().timestamp();
    let random = uuid::Uuid::new_v4().simple().to_string();
    let name = sanitize_file_name(file_name.unwrap_or_default(), kind);

    format!("{}/{}_{}_{}", IMAGE_DIRECTORY, unix_seconds, &random[..8], name)
}

/// Reject keys that could escape the storage root
fn checked_relative_path(key: &str) -> StorageResult<&Path> {
    let path = Path::new(key);
    let safe = !key.is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

    if safe {
        Ok(path)
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Store `bytes` and return the generated key
    async fn save(&self, bytes: &[u8], file_name: Option<&str>, kind: ImageKind)
    -> StorageResult<String>;

    /// Remove a stored image. Missing keys are not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Base URL that keys are resolved against
    fn public_base_url(&self) -> &str;

    fn url_for(&self, key: &str) -> String {
        image_url(key, self.public_base_url())
    }
}

/// Images on the local filesystem, served by the API under `/storage`
#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalImageStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        Ok(self.root.join(checked_relative_path(key)?))
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn save(
        &self,
        bytes: &[u8],
        file_name: Option<&str>,
        kind: ImageKind,
    ) -> StorageResult<String> {
        let key = generate_key(file_name, kind);
        let path = self.path_for(&key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(image_key = %key, size = bytes.len(), "Stored product image");
        Ok(key)
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(image_key = %key, "Deleted product image");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.path_for(key)?;
        Ok(tokio::fs::try_exists(path).await?)
    }

    fn public_base_url(&self) -> &str {
        &self.public_base_url
    }
}

/// In-memory image storage (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryImageStorage {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    public_base_url: String,
}

impl InMemoryImageStorage {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            blobs: Arc::new(RwLock::new(HashMap::new())),
            public_base_url: public_base_url.into(),
        }
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.read().await.get(key).cloned()
    }
}

#[async_trait]
impl ImageStorage for InMemoryImageStorage {
    async fn save(
        &self,
        bytes: &[u8],
        file_name: Option<&str>,
        kind: ImageKind,
    ) -> StorageResult<String> {
        let key = generate_key(file_name, kind);
        self.blobs.write().await.insert(key.clone(), bytes.to_vec());
        Ok(key)
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        checked_relative_path(key)?;
        self.blobs.write().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.blobs.read().await.contains_key(key))
    }

    fn public_base_url(&self) -> &str {
        &self.public_base_url
    }
}
