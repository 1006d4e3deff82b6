//! In-memory blob storage backend.
//!
//! Used in tests and for offline development. Signed URLs are minted with a
//! random token and a real expiry timestamp, so stale-URL behavior can be
//! exercised without a network.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::traits::{BlobStore, SignedUrl, StorageError, StorageResult};

#[derive(Debug, Clone)]
struct StoredBlob {
    content_type: String,
    data: Bytes,
}

/// Blob store backed by a process-local map.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, StoredBlob>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(key)
    }

    /// Stored bytes for `key`, if present. Test helper.
    pub fn data(&self, key: &str) -> Option<Bytes> {
        self.blobs.lock().unwrap().get(key).map(|b| b.data.clone())
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.blobs
            .lock()
            .unwrap()
            .get(key)
            .map(|b| b.content_type.clone())
    }

    fn validate_key(key: &str) -> StorageResult<()> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<()> {
        Self::validate_key(key)?;
        let mut blobs = self.blobs.lock().unwrap();
        if blobs.contains_key(key) {
            return Err(StorageError::AlreadyExists(key.to_string()));
        }
        blobs.insert(
            key.to_string(),
            StoredBlob {
                content_type: content_type.to_string(),
                data,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let mut blobs = self.blobs.lock().unwrap();
        blobs
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn issue_signed_url(&self, key: &str, ttl: Duration) -> StorageResult<SignedUrl> {
        let blobs = self.blobs.lock().unwrap();
        if !blobs.contains_key(key) {
            return Err(StorageError::NotFound(key.to_string()));
        }
        let expires_at = Utc::now()
            + chrono::Duration::from_std(ttl)
                .map_err(|e| StorageError::SignFailed(e.to_string()))?;
        Ok(SignedUrl {
            url: format!("memory://{}?token={}", key, Uuid::new_v4()),
            expires_at,
        })
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.blobs.lock().unwrap().contains_key(key))
    }
}
