//! The library view: one user's record set, with rename/delete/search.
//!
//! Owns a cached copy of the user's records (refreshed from the record
//! store) and mediates the mutations around them. Rename validation runs
//! against the cache, so a bad target is rejected with zero backend calls.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use waveshelf_core::traits::RecordStore;
use waveshelf_core::{validation, AppError, AudioFileRecord, SIGNED_URL_TTL};
use waveshelf_storage::{BlobStore, SignedUrl};

pub struct AudioLibrary {
    blobs: Arc<dyn BlobStore>,
    records: Arc<dyn RecordStore>,
    user_id: Uuid,
    files: Vec<AudioFileRecord>,
}

impl AudioLibrary {
    /// A library scoped to one user. Starts empty; call
    /// [`refresh`](Self::refresh) to populate.
    pub fn new(blobs: Arc<dyn BlobStore>, records: Arc<dyn RecordStore>, user_id: Uuid) -> Self {
        Self {
            blobs,
            records,
            user_id,
            files: Vec::new(),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Cached records, newest first.
    pub fn files(&self) -> &[AudioFileRecord] {
        &self.files
    }

    pub fn get(&self, id: Uuid) -> Option<&AudioFileRecord> {
        self.files.iter().find(|f| f.id == id)
    }

    /// Re-fetch the record set from the store.
    pub async fn refresh(&mut self) -> Result<(), AppError> {
        self.files = self.records.list_for_user(self.user_id).await?;
        Ok(())
    }

    /// Case-insensitive substring search over cached display names.
    pub fn search(&self, query: &str) -> Vec<&AudioFileRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.files.iter().collect();
        }
        self.files
            .iter()
            .filter(|f| f.file_name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Rename a record's display name.
    ///
    /// The target is normalized first (trimmed, original extension appended
    /// when the new name has no `.`); an empty target is rejected before any
    /// store call. `file_path` and the blob are untouched.
    pub async fn rename(&mut self, id: Uuid, new_name: &str) -> Result<AudioFileRecord, AppError> {
        let current = self
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("No audio file with id {}", id)))?;
        let normalized = validation::normalize_rename(new_name, &current.file_name)?;

        self.records
            .update_file_name(id, self.user_id, &normalized)
            .await?;

        let file = self
            .files
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| AppError::NotFound(format!("No audio file with id {}", id)))?;
        file.file_name = normalized;
        tracing::info!(id = %id, file_name = %file.file_name, "Renamed audio file");
        Ok(file.clone())
    }

    /// Delete a record and its blob. The blob goes first; a record without
    /// a blob is a dead row, the reverse is an invisible orphan.
    ///
    /// Returns the deleted record so callers can release anything still
    /// referencing it (e.g. an active playback session).
    pub async fn delete(&mut self, id: Uuid) -> Result<AudioFileRecord, AppError> {
        let record = self
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("No audio file with id {}", id)))?
            .clone();

        self.blobs.remove(&record.file_path).await?;
        self.records.delete(id, self.user_id).await?;

        self.files.retain(|f| f.id != id);
        tracing::info!(id = %id, file_path = %record.file_path, "Deleted audio file");
        Ok(record)
    }

    /// Resolve a playback URL for one cached record.
    pub async fn resolve_playback_url(&self, id: Uuid) -> Result<SignedUrl, AppError> {
        let record = self
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("No audio file with id {}", id)))?;
        self.signed_url_for(record, SIGNED_URL_TTL).await
    }

    pub(crate) async fn signed_url_for(
        &self,
        record: &AudioFileRecord,
        ttl: Duration,
    ) -> Result<SignedUrl, AppError> {
        Ok(self.blobs.issue_signed_url(&record.file_path, ttl).await?)
    }
}
