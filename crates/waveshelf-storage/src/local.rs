//! Local filesystem blob storage backend.
//!
//! Development/self-hosted backend. Signed URLs carry an expiry stamp in the
//! query string but a plain filesystem cannot enforce it; real enforcement
//! needs the HTTP backend.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::traits::{BlobStore, SignedUrl, StorageError, StorageResult};

/// Blob store rooted at a base directory.
#[derive(Clone)]
pub struct LocalBlobStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalBlobStore {
    /// Create a new store.
    ///
    /// # Arguments
    /// * `base_path` - Root directory for blobs (created if missing)
    /// * `base_url` - Base URL the signed URLs are formed under
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalBlobStore {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Convert an object key to a filesystem path, rejecting traversal
    /// sequences that could escape the base directory.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(key))
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, _content_type: &str, data: Bytes) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        // create_new keeps the non-overwrite guarantee atomic at the fs level
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists(key.to_string()));
            }
            Err(e) => {
                return Err(StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local blob write successful"
        );

        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn issue_signed_url(&self, key: &str, ttl: Duration) -> StorageResult<SignedUrl> {
        if !self.exists(key).await? {
            return Err(StorageError::NotFound(key.to_string()));
        }
        let expires_at = Utc::now()
            + chrono::Duration::from_std(ttl)
                .map_err(|e| StorageError::SignFailed(e.to_string()))?;
        Ok(SignedUrl {
            url: format!("{}/{}?expires={}", self.base_url, key, expires_at.timestamp()),
            expires_at,
        })
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, LocalBlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost:9000/audio".to_string())
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_put_and_remove_roundtrip() {
        let (_dir, store) = store().await;
        store
            .put("u1/1-a.mp3", "audio/mpeg", Bytes::from_static(b"abc"))
            .await
            .unwrap();
        assert!(store.exists("u1/1-a.mp3").await.unwrap());
        store.remove("u1/1-a.mp3").await.unwrap();
        assert!(!store.exists("u1/1-a.mp3").await.unwrap());
    }

    #[tokio::test]
    async fn test_put_fails_on_existing_key() {
        let (_dir, store) = store().await;
        store
            .put("u1/1-a.mp3", "audio/mpeg", Bytes::from_static(b"abc"))
            .await
            .unwrap();
        assert!(matches!(
            store
                .put("u1/1-a.mp3", "audio/mpeg", Bytes::from_static(b"xyz"))
                .await
                .unwrap_err(),
            StorageError::AlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_traversal_keys_rejected() {
        let (_dir, store) = store().await;
        assert!(matches!(
            store
                .put("../escape.mp3", "audio/mpeg", Bytes::from_static(b"x"))
                .await
                .unwrap_err(),
            StorageError::InvalidKey(_)
        ));
    }

    #[tokio::test]
    async fn test_signed_url_under_base_url() {
        let (_dir, store) = store().await;
        store
            .put("u1/1-a.mp3", "audio/mpeg", Bytes::from_static(b"abc"))
            .await
            .unwrap();
        let signed = store
            .issue_signed_url("u1/1-a.mp3", Duration::from_secs(3600))
            .await
            .unwrap();
        assert!(signed.url.starts_with("http://localhost:9000/audio/u1/1-a.mp3"));
        assert!(!signed.is_expired());
    }
}
