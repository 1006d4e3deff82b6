#![allow(dead_code)]

//! Shared fakes for the client integration tests: call-counting wrappers
//! around the in-memory backends, failure-injecting variants, and fixed
//! probes/elements.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use waveshelf_client::upload::DurationProbe;
use waveshelf_client::{CandidateFile, MediaElement};
use waveshelf_core::traits::RecordStore;
use waveshelf_core::{AppError, AudioFileRecord, NewAudioFile};
use waveshelf_db::MemoryRecordStore;
use waveshelf_storage::{BlobStore, MemoryBlobStore, SignedUrl, StorageError, StorageResult};

pub fn candidate(file_name: &str, mime_type: &str, len: usize) -> CandidateFile {
    CandidateFile {
        file_name: file_name.to_string(),
        mime_type: mime_type.to_string(),
        bytes: Bytes::from(vec![0u8; len]),
    }
}

/// Blob store that counts calls and can be made to fail `remove`.
#[derive(Default)]
pub struct CountingBlobStore {
    inner: MemoryBlobStore,
    pub puts: AtomicUsize,
    pub removes: AtomicUsize,
    pub signs: AtomicUsize,
    fail_removes: AtomicBool,
}

impl CountingBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::SeqCst);
    }

    pub fn blob_count(&self) -> usize {
        self.inner.blob_count()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains(key)
    }
}

#[async_trait]
impl BlobStore for CountingBlobStore {
    async fn put(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, content_type, data).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed("injected failure".to_string()));
        }
        self.inner.remove(key).await
    }

    async fn issue_signed_url(&self, key: &str, ttl: Duration) -> StorageResult<SignedUrl> {
        self.signs.fetch_add(1, Ordering::SeqCst);
        self.inner.issue_signed_url(key, ttl).await
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.inner.exists(key).await
    }
}

/// Record store that counts calls and can be made to fail `insert`.
#[derive(Default)]
pub struct CountingRecordStore {
    inner: MemoryRecordStore,
    pub inserts: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
    fail_inserts: AtomicBool,
}

impl CountingRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn record_count(&self) -> usize {
        self.inner.record_count()
    }
}

#[async_trait]
impl RecordStore for CountingRecordStore {
    async fn insert(&self, file: NewAudioFile) -> Result<AudioFileRecord, AppError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Database("injected insert failure".to_string()));
        }
        self.inner.insert(file).await
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<AudioFileRecord>, AppError> {
        self.inner.list_for_user(user_id).await
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<AudioFileRecord>, AppError> {
        self.inner.get(id, user_id).await
    }

    async fn update_file_name(
        &self,
        id: Uuid,
        user_id: Uuid,
        file_name: &str,
    ) -> Result<(), AppError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_file_name(id, user_id, file_name).await
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(id, user_id).await
    }
}

/// Probe returning a fixed duration regardless of input.
pub struct FixedDurationProbe(pub f64);

#[async_trait]
impl DurationProbe for FixedDurationProbe {
    async fn probe_seconds(&self, _data: Bytes) -> Result<f64, AppError> {
        Ok(self.0)
    }
}

/// Probe that always fails, as on unparseable bytes.
pub struct FailingProbe;

#[async_trait]
impl DurationProbe for FailingProbe {
    async fn probe_seconds(&self, _data: Bytes) -> Result<f64, AppError> {
        Err(AppError::Internal("injected probe failure".to_string()))
    }
}

/// Media element that accepts every command and remembers nothing.
#[derive(Debug, Default)]
pub struct NullElement;

impl MediaElement for NullElement {
    fn bind(&mut self, _url: &str) -> Result<(), AppError> {
        Ok(())
    }
    fn unbind(&mut self) {}
    fn play(&mut self) -> Result<(), AppError> {
        Ok(())
    }
    fn pause(&mut self) -> Result<(), AppError> {
        Ok(())
    }
    fn seek(&mut self, _position: f64) -> Result<(), AppError> {
        Ok(())
    }
    fn set_volume(&mut self, _volume: f64) -> Result<(), AppError> {
        Ok(())
    }
}
