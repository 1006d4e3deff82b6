//! Blob storage abstraction trait
//!
//! All storage backends (Supabase-compatible HTTP, local filesystem,
//! in-memory) implement [`BlobStore`]. The rest of the system works against
//! the trait and never sees backend details.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;
use waveshelf_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Non-overwriting `put` found the key already taken.
    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Signed URL request failed: {0}")]
    SignFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("Object not found: {}", key)),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A time-limited, capability-bearing URL granting read access to one blob.
///
/// Backends are not asked to refresh these; a consumer holding an expired
/// one has to re-resolve through the record it came from.
#[derive(Debug, Clone)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

impl SignedUrl {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Object storage collaborator.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write a blob at `key`. Never overwrites: if the key is already taken
    /// the backend must fail with [`StorageError::AlreadyExists`] rather
    /// than silently replace.
    async fn put(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<()>;

    /// Delete the blob at `key`. Used both for explicit deletes and for the
    /// upload pipeline's compensating delete after a failed metadata insert.
    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// Issue a read-access URL for `key`, valid for `ttl`.
    async fn issue_signed_url(&self, key: &str, ttl: Duration) -> StorageResult<SignedUrl>;

    async fn exists(&self, key: &str) -> StorageResult<bool>;
}
